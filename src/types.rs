use serde::{Deserialize, Serialize};

use crate::protocol::{
    humanize_state_id, CONTACT_BAD_MAX, CONTACT_EXCELLENT, ELECTRODE_COUNT, ELECTRODE_NAMES,
};

// ── Frequency bands ───────────────────────────────────────────────────────────

/// The six relative band-power bands reported by the headset.
///
/// Delta is part of the data model but is not carried on the `pow` wire
/// format; it is always 0 in parsed readings and is excluded from
/// dominant-band selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    Theta,
    Alpha,
    BetaL,
    BetaH,
    Gamma,
    Delta,
}

impl Band {
    /// Display name, e.g. `"betaL"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Theta => "theta",
            Self::Alpha => "alpha",
            Self::BetaL => "betaL",
            Self::BetaH => "betaH",
            Self::Gamma => "gamma",
            Self::Delta => "delta",
        }
    }
}

/// One relative band-power reading: six non-negative values.
///
/// Two copies live in the session aggregate: `raw` (latest parsed, exactly
/// as received) and `smoothed` (EMA-filtered, what consumers should render).
/// Smoothed values are seeded to the first raw sample received, so there is
/// no artificial ramp-up from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandPower {
    pub theta: f64,
    pub alpha: f64,
    pub beta_l: f64,
    pub beta_h: f64,
    pub gamma: f64,
    /// Not carried on the `pow` wire format; always 0 in parsed readings.
    pub delta: f64,
}

// ── Emotion axes ──────────────────────────────────────────────────────────────

/// Three scalars derived from the performance-metrics stream.
///
/// | Axis | Range | Derivation |
/// |---|---|---|
/// | `valence` | −1 … 1 (clamped) | `(relaxation − stress + interest − 0.5) × 2` |
/// | `arousal` | 0 … 1 (nominal, not clamped) | `(excitement + engagement) / 2` |
/// | `control` | 0 … 1 (nominal, not clamped) | `(focus + relaxation) / 2` |
///
/// Only valence is clamped; arousal and control pass through their raw
/// derivation.  The asymmetry is intentional: consumers that need a hard
/// 0–1 range clamp at the rendering edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAxes {
    pub valence: f64,
    pub arousal: f64,
    pub control: f64,
}

// ── Performance metrics ───────────────────────────────────────────────────────

/// The six named performance metrics on the `met` stream, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Engagement,
    Excitement,
    Stress,
    Relaxation,
    Interest,
    Focus,
}

impl Metric {
    /// All metrics in wire order (`met` payload slot order).
    pub const ALL: [Metric; 6] = [
        Self::Engagement,
        Self::Excitement,
        Self::Stress,
        Self::Relaxation,
        Self::Interest,
        Self::Focus,
    ];

    /// Display name, e.g. `"relaxation"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Engagement => "engagement",
            Self::Excitement => "excitement",
            Self::Stress => "stress",
            Self::Relaxation => "relaxation",
            Self::Interest => "interest",
            Self::Focus => "focus",
        }
    }
}

/// A fully parsed `met` payload: the derived emotion axes plus the top three
/// metrics ranked by raw score descending (stable on ties).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReading {
    pub axes: EmotionAxes,
    /// `(metric, raw score)` pairs, highest first, exactly three entries.
    pub top: Vec<(Metric, f64)>,
}

// ── Device info ───────────────────────────────────────────────────────────────

/// Battery, radio, and overall-quality housekeeping data.
///
/// Fields merge rather than replace: not every device packet carries every
/// field in every firmware era, so an absent field leaves the previous value
/// untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Battery state-of-charge in percent (0–100).
    pub battery_percent: u8,
    /// Wireless signal strength, 0 (none) to 5 (full).
    pub signal_strength: u8,
    /// Overall EEG quality in percent, when the device reports one.
    pub eeg_quality_percent: Option<u8>,
}

/// The subset of a device packet that was actually present, produced by
/// [`crate::parse::parse_device`] and merged into [`DeviceInfo`] /
/// [`SensorQuality`] by the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUpdate {
    /// Rounded battery percentage, clamped to 0–100.
    pub battery_percent: u8,
    /// Rounded signal strength, clamped to 0–5.
    pub signal_strength: u8,
    /// Overall EEG quality percentage, absent when the payload was too short
    /// to carry one or the value was out of range.
    pub eeg_quality_percent: Option<u8>,
    /// Per-electrode contact codes, present only when the payload carried at
    /// least one sensor slot.
    pub sensors: Option<SensorQuality>,
}

// ── Sensor quality ────────────────────────────────────────────────────────────

/// Per-electrode contact quality: one 0–4 code per electrode in
/// [`ELECTRODE_NAMES`] order (0 = no contact, 4 = excellent).
///
/// Replaced wholesale — never merged — and only when a payload containing
/// per-sensor data parses successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorQuality {
    codes: [u8; ELECTRODE_COUNT],
}

impl Default for SensorQuality {
    /// All electrodes at code 0 (no contact).
    fn default() -> Self {
        Self {
            codes: [0; ELECTRODE_COUNT],
        }
    }
}

impl SensorQuality {
    /// Build from raw contact codes; values are clamped to the 0–4 range.
    pub fn from_codes(codes: [u8; ELECTRODE_COUNT]) -> Self {
        Self {
            codes: codes.map(|c| c.min(CONTACT_EXCELLENT)),
        }
    }

    /// Contact code for an electrode slot (panics if `slot >= 14`).
    pub fn code(&self, slot: usize) -> u8 {
        self.codes[slot]
    }

    /// `(electrode name, contact code)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        ELECTRODE_NAMES.iter().copied().zip(self.codes)
    }

    /// Number of electrodes with a contact code of 1 or less.
    pub fn bad_count(&self) -> usize {
        self.codes.iter().filter(|&&c| c <= CONTACT_BAD_MAX).count()
    }

    /// Number of electrodes with an excellent (4) contact code.
    pub fn good_count(&self) -> usize {
        self.codes
            .iter()
            .filter(|&&c| c >= CONTACT_EXCELLENT)
            .count()
    }
}

// ── Mind state ────────────────────────────────────────────────────────────────

/// Confidence tier of a mind-state classification, ordered by ascending
/// certainty: `Detected < Candidate < Confirmed < Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateTier {
    Detected,
    Candidate,
    Confirmed,
    Locked,
}

impl StateTier {
    /// Display name, e.g. `"confirmed"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Detected => "detected",
            Self::Candidate => "candidate",
            Self::Confirmed => "confirmed",
            Self::Locked => "locked",
        }
    }
}

/// A freshly classified mind state as handed in by the external classifier.
///
/// Carries no timestamps — the confirmation engine stamps `entered_at` /
/// `tier_changed_at` when it accepts or refines the reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCandidate {
    /// State identifier, e.g. `"deep_focus"`.
    pub id: String,
    /// Classifier confidence, 0–100.
    pub confidence: u8,
    pub tier: StateTier,
    /// Bands driving this classification, strongest first.
    pub dominant_bands: Vec<Band>,
}

/// The currently held mind state, as confirmed by
/// [`crate::mindstate::StateConfirmer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindState {
    /// State identifier, e.g. `"deep_focus"`.
    pub id: String,
    /// Classifier confidence, 0–100.
    pub confidence: u8,
    pub tier: StateTier,
    /// When the state *identity* last changed (ms since epoch).
    pub entered_at: f64,
    /// When the tier last changed (ms since epoch).
    pub tier_changed_at: f64,
    /// Bands driving this classification, strongest first.
    pub dominant_bands: Vec<Band>,
}

impl MindState {
    /// Human-readable fallback label derived from the identifier.
    pub fn label(&self) -> String {
        humanize_state_id(&self.id)
    }
}

// ── Connection state ──────────────────────────────────────────────────────────

/// Externally visible connection health.
///
/// | State | Meaning |
/// |---|---|
/// | `Disconnected` | no session, or no packets for > 15 s |
/// | `Connecting` | session started, waiting for first confirmed data |
/// | `Connected` | packets within the last 2 s |
/// | `Degraded` | last packet 2–6 s ago |
/// | `Stale` | last packet 6–15 s ago |
///
/// Transitions are debounced by [`crate::connection::ConnectionTracker`];
/// the hysteresis bookkeeping is internal to the tracker and never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Degraded,
    Stale,
}

impl ConnectionState {
    /// Human-readable label paired with the state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Degraded => "Signal degraded",
            Self::Stale => "Signal stale",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_ascends_with_certainty() {
        assert!(StateTier::Detected < StateTier::Candidate);
        assert!(StateTier::Candidate < StateTier::Confirmed);
        assert!(StateTier::Confirmed < StateTier::Locked);
    }

    #[test]
    fn sensor_quality_counts() {
        let mut codes = [4u8; ELECTRODE_COUNT];
        codes[0] = 0;
        codes[1] = 1;
        codes[2] = 2;
        let q = SensorQuality::from_codes(codes);
        assert_eq!(q.bad_count(), 2);
        assert_eq!(q.good_count(), ELECTRODE_COUNT - 3);
    }

    #[test]
    fn sensor_quality_clamps_out_of_range_codes() {
        let mut codes = [0u8; ELECTRODE_COUNT];
        codes[5] = 9;
        let q = SensorQuality::from_codes(codes);
        assert_eq!(q.code(5), 4);
        assert_eq!(q.good_count(), 1);
    }

    #[test]
    fn sensor_quality_iter_pairs_names_with_codes() {
        let q = SensorQuality::default();
        let pairs: Vec<_> = q.iter().collect();
        assert_eq!(pairs.len(), ELECTRODE_COUNT);
        assert_eq!(pairs[0], ("AF3", 0));
        assert_eq!(pairs[13], ("AF4", 0));
    }

    #[test]
    fn state_label_humanizes_id() {
        let s = MindState {
            id: "deep_focus".into(),
            confidence: 80,
            tier: StateTier::Confirmed,
            entered_at: 0.0,
            tier_changed_at: 0.0,
            dominant_bands: vec![Band::BetaH],
        };
        assert_eq!(s.label(), "Deep Focus");
    }
}
