//! Debounced connection-health state machine.
//!
//! Two independent proposal paths feed the same hysteresis gate:
//!
//! * **packet path** — every accepted payload proposes `Connected`, so
//!   recovery is confirmed by presence;
//! * **tick path** — the periodic tick classifies the age of the last
//!   accepted packet (fresh → `Connected`, then `Degraded`, `Stale`,
//!   `Disconnected`), so degradation is detected by absence.
//!
//! Either way, the externally visible state only switches after
//! [`crate::protocol::HYSTERESIS_TICKS`] consecutive proposals agree on the
//! same target; a single disagreeing observation restarts the count.  This
//! keeps one-off BLE jitter or a briefly busy event loop from flapping the
//! indicator.  The target/counter bookkeeping is internal and never appears
//! in snapshots.

use log::debug;

use crate::types::ConnectionState;

/// Hysteresis-gated connection state tracker.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    /// Externally visible state.
    state: ConnectionState,
    /// State the most recent proposals agree on.
    target: ConnectionState,
    /// Consecutive proposals agreeing with `target`.
    agree: u32,
    /// When `state` last changed (ms since epoch).
    changed_at: f64,
    threshold: u32,
    fresh_ms: f64,
    degraded_ms: f64,
    stale_ms: f64,
}

impl ConnectionTracker {
    /// New tracker in `Disconnected` with the given hysteresis threshold and
    /// tick-path age boundaries.
    pub fn new(threshold: u32, fresh_ms: f64, degraded_ms: f64, stale_ms: f64) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            target: ConnectionState::Disconnected,
            agree: 0,
            changed_at: 0.0,
            threshold,
            fresh_ms,
            degraded_ms,
            stale_ms,
        }
    }

    /// The externally visible connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Set the state immediately, bypassing hysteresis.
    ///
    /// Used for session lifecycle edges (`Connecting` on start,
    /// `Disconnected` on stop) where debouncing would only delay an already
    /// certain fact.
    pub fn force(&mut self, state: ConnectionState, now_ms: f64) {
        if self.state != state {
            debug!("connection: {:?} -> {:?} (forced)", self.state, state);
            self.changed_at = now_ms;
        }
        self.state = state;
        self.target = state;
        self.agree = 0;
    }

    /// Packet path: an accepted payload proposes `Connected`.
    pub fn on_packet(&mut self, now_ms: f64) {
        self.propose(ConnectionState::Connected, now_ms);
    }

    /// Tick path: classify the time since the last accepted packet and
    /// propose the matching target.
    ///
    /// `age_ms` is `None` when no reference time exists at all (no session
    /// ever started), which classifies as `Disconnected`.
    pub fn on_tick(&mut self, age_ms: Option<f64>, now_ms: f64) {
        let target = match age_ms {
            Some(age) if age <= self.fresh_ms => ConnectionState::Connected,
            Some(age) if age <= self.degraded_ms => ConnectionState::Degraded,
            Some(age) if age <= self.stale_ms => ConnectionState::Stale,
            _ => ConnectionState::Disconnected,
        };
        self.propose(target, now_ms);
    }

    /// Accumulate one proposal; switch the visible state once `threshold`
    /// consecutive proposals agree on a target that differs from it.
    fn propose(&mut self, target: ConnectionState, now_ms: f64) {
        if target == self.target {
            self.agree = self.agree.saturating_add(1);
        } else {
            self.target = target;
            self.agree = 1;
        }
        if self.target != self.state && self.agree >= self.threshold {
            debug!(
                "connection: {:?} -> {:?} after {} agreeing proposals",
                self.state, self.target, self.agree
            );
            self.state = self.target;
            self.changed_at = now_ms;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CONN_DEGRADED_MS, CONN_FRESH_MS, CONN_STALE_MS, HYSTERESIS_TICKS};

    fn tracker() -> ConnectionTracker {
        ConnectionTracker::new(HYSTERESIS_TICKS, CONN_FRESH_MS, CONN_DEGRADED_MS, CONN_STALE_MS)
    }

    #[test]
    fn five_agreeing_packets_switch_to_connected() {
        let mut t = tracker();
        t.force(ConnectionState::Connecting, 0.0);
        for i in 0..4 {
            t.on_packet(f64::from(i) * 100.0);
            assert_eq!(t.state(), ConnectionState::Connecting, "after packet {}", i + 1);
        }
        t.on_packet(400.0);
        assert_eq!(t.state(), ConnectionState::Connected);
    }

    #[test]
    fn a_disagreeing_event_restarts_the_count() {
        let mut t = tracker();
        t.force(ConnectionState::Connecting, 0.0);
        for i in 0..4 {
            t.on_packet(f64::from(i) * 100.0);
        }
        // Disagreeing tick (no packet for 3 s → Degraded target).
        t.on_tick(Some(3_000.0), 400.0);
        assert_eq!(t.state(), ConnectionState::Connecting);
        // Four more packets still must not switch — the count restarted.
        for i in 0..4 {
            t.on_packet(500.0 + f64::from(i) * 100.0);
            assert_eq!(t.state(), ConnectionState::Connecting);
        }
        t.on_packet(900.0);
        assert_eq!(t.state(), ConnectionState::Connected);
    }

    #[test]
    fn tick_path_walks_down_through_degraded_and_stale() {
        let mut t = tracker();
        t.force(ConnectionState::Connecting, 0.0);
        let mut saw = vec![];
        // Tick every 500 ms with no packets; age grows from 500 ms.
        for i in 1..=40 {
            let now = f64::from(i) * 500.0;
            t.on_tick(Some(now), now);
            if saw.last() != Some(&t.state()) {
                saw.push(t.state());
            }
        }
        assert_eq!(
            saw,
            [
                ConnectionState::Connecting,
                ConnectionState::Degraded,
                ConnectionState::Stale,
                ConnectionState::Disconnected,
            ]
        );
    }

    #[test]
    fn unknown_age_classifies_as_disconnected() {
        let mut t = tracker();
        t.force(ConnectionState::Connecting, 0.0);
        for i in 0..5 {
            t.on_tick(None, f64::from(i) * 500.0);
        }
        assert_eq!(t.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn fresh_ticks_and_packets_agree_on_connected() {
        let mut t = tracker();
        t.force(ConnectionState::Connecting, 0.0);
        // Mixed packet + fresh-tick proposals all target Connected.
        t.on_packet(100.0);
        t.on_tick(Some(200.0), 300.0);
        t.on_packet(350.0);
        t.on_tick(Some(100.0), 800.0);
        assert_eq!(t.state(), ConnectionState::Connecting);
        t.on_packet(900.0);
        assert_eq!(t.state(), ConnectionState::Connected);
    }
}
