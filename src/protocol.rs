//! Stream names, electrode/band/metric tables, and the engine's numeric
//! thresholds.
//!
//! Everything here is a plain constant so that the wire layout and the
//! temporal behaviour of the engine are documented in one place.  The
//! [`crate::session::EngineConfig`] defaults are all drawn from this module.

// ── Stream names ──────────────────────────────────────────────────────────────

/// Device/housekeeping stream: battery, signal strength, per-electrode
/// contact quality, overall EEG quality.  Notified ~1 Hz.
pub const STREAM_DEVICE: &str = "dev";

/// Relative band-power stream: `[theta, alpha, betaL, betaH, gamma]`.
pub const STREAM_BAND_POWER: &str = "pow";

/// Derived performance-metrics stream:
/// `[engagement, excitement, stress, relaxation, interest, focus]`.
pub const STREAM_METRICS: &str = "met";

// ── Electrodes ────────────────────────────────────────────────────────────────

/// Number of electrodes on the 14-channel headset.
pub const ELECTRODE_COUNT: usize = 14;

/// Electrode names in device-stream slot order (10–20 system):
///
/// | Slot | Name | Slot | Name |
/// |------|------|------|------|
/// | 0    | AF3  | 7    | O2   |
/// | 1    | F7   | 8    | P8   |
/// | 2    | F3   | 9    | T8   |
/// | 3    | FC5  | 10   | FC6  |
/// | 4    | T7   | 11   | F4   |
/// | 5    | P7   | 12   | F8   |
/// | 6    | O1   | 13   | AF4  |
pub const ELECTRODE_NAMES: [&str; ELECTRODE_COUNT] = [
    "AF3", "F7", "F3", "FC5", "T7", "P7", "O1", "O2", "P8", "T8", "FC6", "F4", "F8", "AF4",
];

/// Contact-quality code meaning "no contact".
pub const CONTACT_NONE: u8 = 0;

/// Highest contact-quality code ("excellent").
pub const CONTACT_EXCELLENT: u8 = 4;

/// A sensor with a contact code at or below this counts as "bad".
pub const CONTACT_BAD_MAX: u8 = 1;

// ── Device wire layout ────────────────────────────────────────────────────────

/// Minimum device-stream payload length: `[battery, signal, …]` plus at
/// least one trailing element.
pub const DEVICE_MIN_LEN: usize = 3;

/// Full device-stream payload length:
/// `[battery, signal, sensor_0..sensor_13, overallQuality]`.
///
/// Only payloads at least this long carry an overall-quality percentage in
/// their final slot; in shorter payloads every trailing element is a
/// per-sensor 0–4 contact code and must not be mistaken for a percentage.
pub const DEVICE_FULL_LEN: usize = 2 + ELECTRODE_COUNT + 1;

// ── Smoothing ─────────────────────────────────────────────────────────────────

/// EMA coefficient for band power (faster-reacting).
pub const BAND_POWER_ALPHA: f64 = 0.2;

/// EMA coefficient for the derived emotion axes (slower, steadier).
pub const EMOTION_ALPHA: f64 = 0.15;

// ── Connection hysteresis ─────────────────────────────────────────────────────

/// Consecutive agreeing proposals required before the visible connection
/// state actually switches.
pub const HYSTERESIS_TICKS: u32 = 5;

/// Packet age at or below which the tick path targets `Connected`.
pub const CONN_FRESH_MS: f64 = 2_000.0;

/// Packet age at or below which the tick path targets `Degraded`.
pub const CONN_DEGRADED_MS: f64 = 6_000.0;

/// Packet age at or below which the tick path targets `Stale`; older
/// targets `Disconnected`.
pub const CONN_STALE_MS: f64 = 15_000.0;

// ── Staleness ─────────────────────────────────────────────────────────────────

/// Band-power and emotion readings older than this are flagged stale.
pub const DATA_STALE_MS: f64 = 3_000.0;

// ── Mind-state confirmation ───────────────────────────────────────────────────

/// Minimum time after an *accepted* mind-state transition before another
/// identity change is allowed through.
pub const STATE_COOLDOWN_MS: f64 = 4_000.0;

// ── Label helper ──────────────────────────────────────────────────────────────

/// Humanize a snake_case mind-state identifier for display.
///
/// Rich per-state metadata (descriptions, icons) lives outside the engine;
/// this only provides a readable fallback label.
///
/// # Example
///
/// ```
/// # use mindstream::protocol::humanize_state_id;
/// assert_eq!(humanize_state_id("deep_focus"), "Deep Focus");
/// assert_eq!(humanize_state_id("calm"), "Calm");
/// ```
pub fn humanize_state_id(id: &str) -> String {
    id.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
