//! Payload decoders for the three telemetry streams.
//!
//! All functions in this module are pure and fail softly: a malformed
//! payload yields `None` ("no update") rather than an error, so one bad
//! sample can never take down a live dashboard.  The typed `&[f64]` boundary
//! already rules out non-array input; length and range checks below handle
//! the rest.
//!
//! | Function | Stream | Minimum length | Layout |
//! |---|---|---|---|
//! | [`parse_device`] | `dev` | 3 | `[battery, signal, sensor_0…, quality]` |
//! | [`parse_band_power`] | `pow` | 5 | `[theta, alpha, betaL, betaH, gamma]` |
//! | [`parse_metrics`] | `met` | 6 | `[engagement, excitement, stress, relaxation, interest, focus]` |

use crate::protocol::{DEVICE_FULL_LEN, DEVICE_MIN_LEN, ELECTRODE_COUNT};
use crate::types::{BandPower, DeviceUpdate, EmotionAxes, Metric, MetricsReading, SensorQuality};

// ── Device stream ─────────────────────────────────────────────────────────────

/// Parse a `dev` payload into battery, signal, contact codes, and overall
/// EEG quality.
///
/// Expected layout: `[battery, signal, sensor_0..sensor_{N-1}, quality]`.
/// Sensor slots map positionally onto the 14-electrode enumeration
/// ([`crate::protocol::ELECTRODE_NAMES`]); slots beyond the enumeration are
/// ignored.
///
/// The final element is treated as an overall quality percentage only when
/// the payload is long enough to have carried every per-sensor slot first
/// (≥ [`DEVICE_FULL_LEN`] elements) *and* the value lies in 0–100.  In a
/// shorter payload the trailing elements are per-sensor 0–4 contact codes,
/// so a code like `3` is never misreported as "3 % quality".
///
/// Returns `None` for payloads shorter than 3 elements, leaving prior
/// device state untouched.
///
/// # Example
///
/// ```
/// # use mindstream::parse::parse_device;
/// let mut payload = vec![82.0, 4.0];
/// payload.extend(std::iter::repeat(4.0).take(14)); // all contacts excellent
/// payload.push(93.0); // overall quality
/// let update = parse_device(&payload).unwrap();
/// assert_eq!(update.battery_percent, 82);
/// assert_eq!(update.signal_strength, 4);
/// assert_eq!(update.eeg_quality_percent, Some(93));
/// ```
pub fn parse_device(payload: &[f64]) -> Option<DeviceUpdate> {
    if payload.len() < DEVICE_MIN_LEN {
        return None;
    }

    let battery_percent = payload[0].round().clamp(0.0, 100.0) as u8;
    let signal_strength = payload[1].round().clamp(0.0, 5.0) as u8;

    // Full payloads reserve the final slot for overall quality; anything
    // shorter is all sensor codes after battery/signal.
    let (sensor_slots, quality_slot) = if payload.len() >= DEVICE_FULL_LEN {
        (&payload[2..payload.len() - 1], Some(payload[payload.len() - 1]))
    } else {
        (&payload[2..], None)
    };

    let eeg_quality_percent = quality_slot
        .filter(|q| (0.0..=100.0).contains(q))
        .map(|q| q.round() as u8);

    let sensors = if sensor_slots.is_empty() {
        None
    } else {
        let mut codes = [0u8; ELECTRODE_COUNT];
        for (slot, &value) in sensor_slots.iter().take(ELECTRODE_COUNT).enumerate() {
            codes[slot] = value.round().clamp(0.0, 4.0) as u8;
        }
        Some(SensorQuality::from_codes(codes))
    };

    Some(DeviceUpdate {
        battery_percent,
        signal_strength,
        eeg_quality_percent,
        sensors,
    })
}

// ── Band-power stream ─────────────────────────────────────────────────────────

/// Parse a `pow` payload into a [`BandPower`] reading.
///
/// The wire carries five bands — `[theta, alpha, betaL, betaH, gamma]` —
/// and no delta; delta is always reported as 0.  Negative values are
/// clamped to 0 to keep the non-negativity invariant.
///
/// Returns `None` for payloads shorter than 5 elements.
pub fn parse_band_power(payload: &[f64]) -> Option<BandPower> {
    if payload.len() < 5 {
        return None;
    }
    Some(BandPower {
        theta: payload[0].max(0.0),
        alpha: payload[1].max(0.0),
        beta_l: payload[2].max(0.0),
        beta_h: payload[3].max(0.0),
        gamma: payload[4].max(0.0),
        delta: 0.0,
    })
}

// ── Metrics stream ────────────────────────────────────────────────────────────

/// Parse a `met` payload into derived emotion axes plus a ranked top-3 list.
///
/// Wire order: `[engagement, excitement, stress, relaxation, interest, focus]`.
///
/// Derivations:
/// * `valence = (relaxation − stress + interest − 0.5) × 2`, clamped to −1…1
/// * `arousal = (excitement + engagement) / 2` — not clamped
/// * `control = (focus + relaxation) / 2` — not clamped
///
/// Arousal and control are deliberately left unclamped even though their
/// nominal range is 0–1; only valence gets the clamp.
///
/// The top-3 list ranks all six metrics by raw score descending; equal
/// scores keep wire order (stable sort).
///
/// Returns `None` for payloads shorter than 6 elements.
pub fn parse_metrics(payload: &[f64]) -> Option<MetricsReading> {
    if payload.len() < 6 {
        return None;
    }
    let [engagement, excitement, stress, relaxation, interest, focus] =
        [payload[0], payload[1], payload[2], payload[3], payload[4], payload[5]];

    let axes = EmotionAxes {
        valence: ((relaxation - stress + interest - 0.5) * 2.0).clamp(-1.0, 1.0),
        arousal: (excitement + engagement) / 2.0,
        control: (focus + relaxation) / 2.0,
    };

    let mut ranked: Vec<(Metric, f64)> = Metric::ALL
        .into_iter()
        .zip([engagement, excitement, stress, relaxation, interest, focus])
        .collect();
    // sort_by is stable, so ties keep wire order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(3);

    Some(MetricsReading { axes, top: ranked })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
