//! The session aggregate: the single mutable root every other component
//! writes through and every consumer reads from.
//!
//! One [`SessionEngine`] instance owns the current interpreted values for
//! one session.  It is an explicitly owned value — no global singleton —
//! so tests and multi-session hosts can hold as many independent engines as
//! they like.  All mutation entry points are synchronous and expect a
//! single writer at a time; the engine never spawns tasks or blocks.
//!
//! Time is injected: every mutation takes `now_ms` (milliseconds since the
//! Unix epoch, see [`now_ms`]) so the temporal behaviour is fully
//! deterministic under test.  An external scheduler is expected to call
//! [`SessionEngine::tick`] periodically (every 500 ms works well) and the
//! transport to call [`SessionEngine::handle_event`] per packet.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use serde::Serialize;

use crate::connection::ConnectionTracker;
use crate::mindstate::{Confirmation, StateConfirmer};
use crate::parse::{parse_band_power, parse_device, parse_metrics};
use crate::protocol::{
    BAND_POWER_ALPHA, CONN_DEGRADED_MS, CONN_FRESH_MS, CONN_STALE_MS, DATA_STALE_MS,
    EMOTION_ALPHA, HYSTERESIS_TICKS, STATE_COOLDOWN_MS, STREAM_BAND_POWER, STREAM_DEVICE,
    STREAM_METRICS,
};
use crate::smoothing::{dominant_band, smooth_band_power, smooth_emotions};
use crate::types::{
    Band, BandPower, ConnectionState, DeviceInfo, EmotionAxes, Metric, MindState, SensorQuality,
    StateCandidate,
};

// ── Timestamp helper ──────────────────────────────────────────────────────────

/// Milliseconds since the Unix epoch, as the engine's time unit.
pub fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before Unix epoch")
        .as_secs_f64()
        * 1000.0
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Every numeric threshold the engine uses, with the defaults documented in
/// [`crate::protocol`].  Override individual fields to tune behaviour per
/// deployment; tests shorten the windows to keep scenarios fast.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// EMA coefficient for band power.  Default: 0.2.
    pub band_power_alpha: f64,
    /// EMA coefficient for the emotion axes.  Default: 0.15.
    pub emotion_alpha: f64,
    /// Consecutive agreeing observations before the visible connection
    /// state switches.  Default: 5.
    pub hysteresis_ticks: u32,
    /// Packet age boundary for the `Connected` tick target.  Default: 2 s.
    pub conn_fresh_ms: f64,
    /// Packet age boundary for the `Degraded` tick target.  Default: 6 s.
    pub conn_degraded_ms: f64,
    /// Packet age boundary for the `Stale` tick target.  Default: 15 s.
    pub conn_stale_ms: f64,
    /// Freshness window for band-power and emotion staleness.  Default: 3 s.
    pub data_stale_ms: f64,
    /// Cooldown after an accepted mind-state transition.  Default: 4 s.
    pub state_cooldown_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            band_power_alpha: BAND_POWER_ALPHA,
            emotion_alpha: EMOTION_ALPHA,
            hysteresis_ticks: HYSTERESIS_TICKS,
            conn_fresh_ms: CONN_FRESH_MS,
            conn_degraded_ms: CONN_DEGRADED_MS,
            conn_stale_ms: CONN_STALE_MS,
            data_stale_ms: DATA_STALE_MS,
            state_cooldown_ms: STATE_COOLDOWN_MS,
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// A point-in-time, immutable view of the whole interpreted session.
///
/// Produced by [`SessionEngine::snapshot`]; owned and serializable so UI
/// layers can render or ship it without holding any reference into the
/// engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    // ── Connection / lifecycle ────────────────────────────────────────────
    pub connection: ConnectionState,
    pub connection_label: &'static str,
    pub active: bool,
    /// Incoming packets per second, measured over the last tick interval.
    pub packet_rate: f64,
    /// When the session was started (ms since epoch), if it is running.
    pub started_at: Option<f64>,
    /// When the mind state last changed identity.
    pub last_state_change_at: Option<f64>,

    // ── Device ────────────────────────────────────────────────────────────
    pub device: DeviceInfo,

    // ── Band power ────────────────────────────────────────────────────────
    /// Latest parsed reading, unsmoothed.
    pub band_power_raw: BandPower,
    /// EMA-filtered reading — what consumers should render.
    pub band_power: BandPower,
    pub band_power_stale: bool,
    /// Strongest smoothed band, or `None` before any signal.
    pub dominant_band: Option<Band>,

    // ── Emotions ──────────────────────────────────────────────────────────
    pub emotions_raw: EmotionAxes,
    pub emotions: EmotionAxes,
    pub emotions_stale: bool,
    /// Top three performance metrics from the latest `met` packet.
    pub top_metrics: Vec<(Metric, f64)>,

    // ── Mind state ────────────────────────────────────────────────────────
    pub mind_state: Option<MindState>,
    /// Human-readable label for the current state.
    pub mind_state_label: Option<String>,
    pub challenger: Option<StateCandidate>,
    /// True while the latest classifier proposal sits rejected in cooldown.
    pub state_change_blocked: bool,

    // ── Sensors ───────────────────────────────────────────────────────────
    pub sensor_quality: SensorQuality,
    pub bad_sensors: usize,
    pub good_sensors: usize,
}

// ── SessionEngine ─────────────────────────────────────────────────────────────

/// The real-time interpretation engine for one telemetry session.
///
/// # Lifecycle
///
/// ```
/// use mindstream::prelude::*;
///
/// let mut engine = SessionEngine::new(EngineConfig::default());
/// engine.set_active(true, 0.0);
/// engine.handle_event("pow", &[0.2, 0.6, 0.1, 0.1, 0.05], 100.0);
/// engine.tick(500.0);
///
/// let snap = engine.snapshot();
/// assert!(snap.active);
/// assert_eq!(snap.band_power.alpha, 0.6); // first sample seeds the EMA
/// ```
///
/// Stopping the session (or [`SessionEngine::reset`]) returns the aggregate
/// to its pristine initial form; packets and ticks that race in after a
/// stop are ignored rather than mutating a torn-down session.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    config: EngineConfig,

    // Lifecycle
    active: bool,
    started_at: Option<f64>,
    last_state_change_at: Option<f64>,

    // Connection
    connection: ConnectionTracker,
    /// Last accepted packet, seeded to session start so the tick path can
    /// age out a session that never produces data.
    last_packet_at: Option<f64>,
    packets_since_tick: u64,
    last_tick_at: Option<f64>,
    packet_rate: f64,

    // Device
    device: DeviceInfo,
    sensors: SensorQuality,

    // Band power
    band_raw: BandPower,
    band_smoothed: BandPower,
    band_updated_at: Option<f64>,
    band_stale: bool,

    // Emotions
    emotions_raw: EmotionAxes,
    emotions_smoothed: EmotionAxes,
    emotions_updated_at: Option<f64>,
    emotions_stale: bool,
    top_metrics: Vec<(Metric, f64)>,

    // Mind state
    confirmer: StateConfirmer,
}

impl SessionEngine {
    /// New engine in the pristine initial form: inactive, `Disconnected`,
    /// all staleness flags raised, no mind state.
    pub fn new(config: EngineConfig) -> Self {
        let connection = ConnectionTracker::new(
            config.hysteresis_ticks,
            config.conn_fresh_ms,
            config.conn_degraded_ms,
            config.conn_stale_ms,
        );
        let confirmer = StateConfirmer::new(config.state_cooldown_ms);
        Self {
            config,
            active: false,
            started_at: None,
            last_state_change_at: None,
            connection,
            last_packet_at: None,
            packets_since_tick: 0,
            last_tick_at: None,
            packet_rate: 0.0,
            device: DeviceInfo::default(),
            sensors: SensorQuality::default(),
            band_raw: BandPower::default(),
            band_smoothed: BandPower::default(),
            band_updated_at: None,
            band_stale: true,
            emotions_raw: EmotionAxes::default(),
            emotions_smoothed: EmotionAxes::default(),
            emotions_updated_at: None,
            emotions_stale: true,
            top_metrics: Vec::new(),
            confirmer,
        }
    }

    /// Whether a session is currently running.
    pub fn active(&self) -> bool {
        self.active
    }

    /// The externally visible connection state.
    pub fn connection(&self) -> ConnectionState {
        self.connection.state()
    }

    // ── Mutation: lifecycle ───────────────────────────────────────────────

    /// Start or stop the session.
    ///
    /// Starting puts the connection into `Connecting` and anchors the
    /// packet-age clock to `now_ms`, so a session that never receives data
    /// ages down through `Degraded`/`Stale`/`Disconnected` like one that
    /// went quiet.  Stopping resets the aggregate to its initial form
    /// (connection `Disconnected`); any tick or packet callback still in
    /// flight afterwards is ignored.
    pub fn set_active(&mut self, active: bool, now_ms: f64) {
        if active == self.active {
            return;
        }
        if active {
            info!("session started");
            self.active = true;
            self.started_at = Some(now_ms);
            self.last_packet_at = Some(now_ms);
            self.last_tick_at = Some(now_ms);
            self.connection.force(ConnectionState::Connecting, now_ms);
        } else {
            info!("session stopped");
            self.reset();
        }
    }

    /// Return the aggregate to its documented initial values: inactive,
    /// connection `Disconnected`, all staleness flags true, no mind state,
    /// zeroed readings.  The configuration is retained.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    // ── Mutation: packets ─────────────────────────────────────────────────

    /// Ingest one `(stream, payload)` pair from the transport.
    ///
    /// Streams: `"dev"`, `"pow"`, `"met"`.  Unknown stream names and
    /// malformed payloads are ignored without error, leaving prior state
    /// untouched; only a successfully parsed payload counts as packet
    /// acceptance for connection health.  No-op while the session is
    /// inactive.
    pub fn handle_event(&mut self, stream: &str, payload: &[f64], now_ms: f64) {
        if !self.active {
            debug!("ignoring '{stream}' packet: session inactive");
            return;
        }
        match stream {
            STREAM_DEVICE => {
                let Some(update) = parse_device(payload) else {
                    debug!("malformed dev payload ({} elements)", payload.len());
                    return;
                };
                // Fields merge: a packet without a quality figure leaves the
                // previous one standing.
                self.device.battery_percent = update.battery_percent;
                self.device.signal_strength = update.signal_strength;
                if update.eeg_quality_percent.is_some() {
                    self.device.eeg_quality_percent = update.eeg_quality_percent;
                }
                // Sensor quality replaces wholesale, never merges.
                if let Some(sensors) = update.sensors {
                    self.sensors = sensors;
                }
                self.accept_packet(now_ms);
            }
            STREAM_BAND_POWER => {
                let Some(raw) = parse_band_power(payload) else {
                    debug!("malformed pow payload ({} elements)", payload.len());
                    return;
                };
                self.band_smoothed =
                    smooth_band_power(&self.band_smoothed, &raw, self.config.band_power_alpha);
                self.band_raw = raw;
                self.band_updated_at = Some(now_ms);
                self.accept_packet(now_ms);
            }
            STREAM_METRICS => {
                let Some(reading) = parse_metrics(payload) else {
                    debug!("malformed met payload ({} elements)", payload.len());
                    return;
                };
                self.emotions_smoothed = smooth_emotions(
                    &self.emotions_smoothed,
                    &reading.axes,
                    self.config.emotion_alpha,
                );
                self.emotions_raw = reading.axes;
                self.top_metrics = reading.top;
                self.emotions_updated_at = Some(now_ms);
                self.accept_packet(now_ms);
            }
            other => debug!("ignoring unknown stream '{other}'"),
        }
    }

    /// Bookkeeping shared by every successfully parsed payload.
    fn accept_packet(&mut self, now_ms: f64) {
        self.last_packet_at = Some(now_ms);
        self.packets_since_tick += 1;
        self.connection.on_packet(now_ms);
    }

    // ── Mutation: mind state ──────────────────────────────────────────────

    /// Feed one classifier reading through the confirmation policy.
    ///
    /// Returns what the confirmer did with it; `Accepted` also stamps the
    /// aggregate's last-state-change marker.  No-op (`Blocked` is *not*
    /// raised) while the session is inactive.
    pub fn update_mind_state(
        &mut self,
        candidate: StateCandidate,
        challenger: Option<StateCandidate>,
        now_ms: f64,
    ) -> Option<Confirmation> {
        if !self.active {
            debug!("ignoring mind-state update: session inactive");
            return None;
        }
        let outcome = self.confirmer.apply(candidate, challenger, now_ms);
        if outcome == Confirmation::Accepted {
            self.last_state_change_at = Some(now_ms);
        }
        Some(outcome)
    }

    // ── Mutation: tick ────────────────────────────────────────────────────

    /// Periodic maintenance: packet rate, connection aging, staleness.
    ///
    /// Idempotent and safe to invoke redundantly — re-evaluating unchanged
    /// state writes nothing.  No-op while the session is inactive.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.active {
            return;
        }

        // Packet rate over the elapsed tick interval.
        if let Some(last) = self.last_tick_at {
            let dt_ms = now_ms - last;
            if dt_ms > 0.0 {
                self.packet_rate = self.packets_since_tick as f64 * 1000.0 / dt_ms;
            }
        }
        self.packets_since_tick = 0;
        self.last_tick_at = Some(now_ms);

        // Connection aging (hysteresis-gated inside the tracker).
        let age = self.last_packet_at.map(|t| now_ms - t);
        self.connection.on_tick(age, now_ms);

        // Staleness: no hysteresis, but only write flags that changed.
        let band_stale = self
            .band_updated_at
            .is_none_or(|t| now_ms - t > self.config.data_stale_ms);
        if band_stale != self.band_stale {
            debug!("band power staleness: {} -> {band_stale}", self.band_stale);
            self.band_stale = band_stale;
        }
        let emotions_stale = self
            .emotions_updated_at
            .is_none_or(|t| now_ms - t > self.config.data_stale_ms);
        if emotions_stale != self.emotions_stale {
            debug!(
                "emotion staleness: {} -> {emotions_stale}",
                self.emotions_stale
            );
            self.emotions_stale = emotions_stale;
        }
    }

    // ── Read surface ──────────────────────────────────────────────────────

    /// A point-in-time immutable view of the whole aggregate.
    pub fn snapshot(&self) -> Snapshot {
        let mind_state = self.confirmer.current().cloned();
        Snapshot {
            connection: self.connection.state(),
            connection_label: self.connection.state().label(),
            active: self.active,
            packet_rate: self.packet_rate,
            started_at: self.started_at,
            last_state_change_at: self.last_state_change_at,
            device: self.device,
            band_power_raw: self.band_raw,
            band_power: self.band_smoothed,
            band_power_stale: self.band_stale,
            dominant_band: dominant_band(&self.band_smoothed),
            emotions_raw: self.emotions_raw,
            emotions: self.emotions_smoothed,
            emotions_stale: self.emotions_stale,
            top_metrics: self.top_metrics.clone(),
            mind_state_label: mind_state.as_ref().map(MindState::label),
            mind_state,
            challenger: self.confirmer.challenger().cloned(),
            state_change_blocked: self.confirmer.blocked(),
            sensor_quality: self.sensors,
            bad_sensors: self.sensors.bad_count(),
            good_sensors: self.sensors.good_count(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateTier;

    const POW: [f64; 5] = [0.2, 0.6, 0.1, 0.1, 0.05];
    const MET: [f64; 6] = [0.6, 0.8, 0.2, 0.7, 0.5, 0.9];

    fn engine() -> SessionEngine {
        let mut e = SessionEngine::new(EngineConfig::default());
        e.set_active(true, 0.0);
        e
    }

    fn candidate(id: &str) -> StateCandidate {
        StateCandidate {
            id: id.into(),
            confidence: 70,
            tier: StateTier::Detected,
            dominant_bands: vec![Band::Alpha],
        }
    }

    #[test]
    fn initial_aggregate_matches_documented_values() {
        let snap = SessionEngine::new(EngineConfig::default()).snapshot();
        assert!(!snap.active);
        assert_eq!(snap.connection, ConnectionState::Disconnected);
        assert!(snap.band_power_stale);
        assert!(snap.emotions_stale);
        assert!(snap.mind_state.is_none());
        assert!(snap.challenger.is_none());
        assert!(!snap.state_change_blocked);
        assert_eq!(snap.band_power, BandPower::default());
        assert_eq!(snap.dominant_band, None);
        assert_eq!(snap.packet_rate, 0.0);
        assert_eq!(snap.bad_sensors, 14); // all contacts at 0
        assert_eq!(snap.good_sensors, 0);
    }

    #[test]
    fn reset_returns_to_initial_aggregate() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        e.handle_event("met", &MET, 100.0);
        e.update_mind_state(candidate("calm"), None, 100.0);
        e.tick(500.0);
        e.reset();

        let snap = e.snapshot();
        assert!(!snap.active);
        assert_eq!(snap.connection, ConnectionState::Disconnected);
        assert!(snap.band_power_stale);
        assert!(snap.emotions_stale);
        assert!(snap.mind_state.is_none());
        assert_eq!(snap.band_power, BandPower::default());
    }

    #[test]
    fn stopping_ignores_in_flight_callbacks() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        e.set_active(false, 200.0);

        // Late callbacks from a detached transport/timer must not mutate
        // the torn-down aggregate.
        e.handle_event("pow", &POW, 250.0);
        e.tick(300.0);
        assert!(e.update_mind_state(candidate("calm"), None, 300.0).is_none());

        let snap = e.snapshot();
        assert!(!snap.active);
        assert_eq!(snap.band_power, BandPower::default());
        assert!(snap.mind_state.is_none());
    }

    #[test]
    fn first_pow_packet_seeds_smoothed_values() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        let snap = e.snapshot();
        assert_eq!(snap.band_power_raw, snap.band_power);
        assert_eq!(snap.dominant_band, Some(Band::Alpha));
    }

    #[test]
    fn later_pow_packets_blend() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        e.handle_event("pow", &[0.2, 1.0, 0.1, 0.1, 0.05], 200.0);
        let snap = e.snapshot();
        // 0.2·1.0 + 0.8·0.6 = 0.68
        assert!((snap.band_power.alpha - 0.68).abs() < 1e-12);
        assert_eq!(snap.band_power_raw.alpha, 1.0);
    }

    #[test]
    fn staleness_clears_on_tick_after_data_and_returns_when_quiet() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        e.handle_event("met", &MET, 100.0);
        e.tick(500.0);
        let snap = e.snapshot();
        assert!(!snap.band_power_stale);
        assert!(!snap.emotions_stale);

        // 3 s window: still fresh at 3.0 s since update, stale beyond it.
        e.tick(3_100.0);
        assert!(!e.snapshot().band_power_stale);
        e.tick(3_200.0);
        assert!(e.snapshot().band_power_stale);
        assert!(e.snapshot().emotions_stale);
    }

    #[test]
    fn device_fields_merge_and_sensors_replace() {
        let mut e = engine();
        let mut full = vec![80.0, 4.0];
        full.extend(std::iter::repeat(4.0).take(14));
        full.push(90.0);
        e.handle_event("dev", &full, 100.0);
        let snap = e.snapshot();
        assert_eq!(snap.device.eeg_quality_percent, Some(90));
        assert_eq!(snap.good_sensors, 14);

        // Short payload: no quality figure, fewer sensor slots.  Quality
        // merges (previous value stands); sensors replace wholesale.
        e.handle_event("dev", &[60.0, 3.0, 4.0, 4.0], 200.0);
        let snap = e.snapshot();
        assert_eq!(snap.device.battery_percent, 60);
        assert_eq!(snap.device.eeg_quality_percent, Some(90));
        assert_eq!(snap.good_sensors, 2);
        assert_eq!(snap.bad_sensors, 12);
    }

    #[test]
    fn malformed_payloads_leave_prior_state_untouched() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        e.handle_event("pow", &[0.9, 0.9], 200.0); // too short
        assert_eq!(e.snapshot().band_power_raw.theta, 0.2);

        e.handle_event("dev", &[50.0], 200.0); // too short
        assert_eq!(e.snapshot().device.battery_percent, 0);
    }

    #[test]
    fn unknown_streams_do_not_count_as_packet_acceptance() {
        let mut e = engine();
        for i in 0..10 {
            e.handle_event("eeg", &[1.0, 2.0, 3.0], f64::from(i) * 100.0);
        }
        // Still Connecting: nothing was accepted, so the packet path never
        // proposed Connected.
        assert_eq!(e.connection(), ConnectionState::Connecting);
    }

    #[test]
    fn five_accepted_packets_connect() {
        let mut e = engine();
        for i in 0..5 {
            e.handle_event("pow", &POW, f64::from(i) * 100.0);
        }
        assert_eq!(e.connection(), ConnectionState::Connected);
    }

    #[test]
    fn silent_session_walks_down_to_disconnected() {
        let mut e = engine();
        let mut seen = vec![e.connection()];
        // Tick every 500 ms for 18 s with no packets at all.
        for i in 1..=36 {
            e.tick(f64::from(i) * 500.0);
            if *seen.last().unwrap() != e.connection() {
                seen.push(e.connection());
            }
        }
        assert_eq!(
            seen,
            [
                ConnectionState::Connecting,
                ConnectionState::Degraded,
                ConnectionState::Stale,
                ConnectionState::Disconnected,
            ]
        );
    }

    #[test]
    fn packet_rate_measured_per_tick_interval() {
        let mut e = engine();
        for i in 0..8 {
            e.handle_event("pow", &POW, f64::from(i) * 50.0);
        }
        e.tick(500.0); // 8 packets in 500 ms → 16 /s
        assert!((e.snapshot().packet_rate - 16.0).abs() < 1e-9);

        e.tick(1_000.0); // quiet interval → 0 /s
        assert_eq!(e.snapshot().packet_rate, 0.0);
    }

    #[test]
    fn mind_state_cooldown_surfaces_in_snapshot() {
        let mut e = engine();
        assert_eq!(
            e.update_mind_state(candidate("calm"), None, 1_000.0),
            Some(Confirmation::Accepted)
        );
        assert_eq!(
            e.update_mind_state(candidate("deep_focus"), None, 1_100.0),
            Some(Confirmation::Blocked)
        );
        let snap = e.snapshot();
        assert!(snap.state_change_blocked);
        assert_eq!(snap.mind_state.as_ref().unwrap().id, "calm");
        assert_eq!(snap.mind_state_label.as_deref(), Some("Calm"));
        assert_eq!(snap.last_state_change_at, Some(1_000.0));

        assert_eq!(
            e.update_mind_state(candidate("deep_focus"), None, 5_000.0),
            Some(Confirmation::Accepted)
        );
        let snap = e.snapshot();
        assert!(!snap.state_change_blocked);
        assert_eq!(snap.last_state_change_at, Some(5_000.0));
    }

    #[test]
    fn redundant_ticks_are_no_ops() {
        let mut e = engine();
        e.handle_event("pow", &POW, 100.0);
        e.tick(500.0);
        let a = e.snapshot();
        e.tick(500.0);
        e.tick(500.0);
        let b = e.snapshot();
        assert_eq!(a.band_power_stale, b.band_power_stale);
        assert_eq!(a.connection, b.connection);
        assert_eq!(a.band_power, b.band_power);
    }

    #[test]
    fn recovery_after_gap_needs_five_packets() {
        let mut e = engine();
        for i in 0..5 {
            e.handle_event("pow", &POW, f64::from(i) * 100.0);
        }
        assert_eq!(e.connection(), ConnectionState::Connected);

        // Go quiet long enough to degrade.
        for i in 1..=10 {
            e.tick(400.0 + f64::from(i) * 500.0);
        }
        assert_eq!(e.connection(), ConnectionState::Degraded);

        // Recovery is confirmed by presence: five fresh packets.
        for i in 0..4 {
            e.handle_event("pow", &POW, 6_000.0 + f64::from(i) * 100.0);
            assert_eq!(e.connection(), ConnectionState::Degraded);
        }
        e.handle_event("pow", &POW, 6_400.0);
        assert_eq!(e.connection(), ConnectionState::Connected);
    }
}
