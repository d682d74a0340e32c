//! Tiered mind-state confirmation with change cooldown.
//!
//! The classifier runs on its own cadence and is noisy: instantaneous
//! readings can disagree from one invocation to the next.  Showing each one
//! directly would make the UI flicker through a transition storm.  The
//! [`StateConfirmer`] therefore holds exactly one *current* state (plus an
//! optional runner-up challenger) and applies a simple policy:
//!
//! * a proposed **identity change** within the cooldown window after the
//!   last *accepted* change is rejected — the current state stays, a sticky
//!   `blocked` flag is raised for observability, and the cooldown is left
//!   alone (rejections never extend or shorten it);
//! * an identity change after the cooldown is accepted and starts a new
//!   cooldown window;
//! * a reading with the **same identity** refines confidence, tier, and
//!   dominant bands in place at any time — no cooldown applies to staying
//!   where we are.

use log::{debug, info};

use crate::types::{MindState, StateCandidate};

/// What [`StateConfirmer::apply`] did with a classifier reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Identity change accepted; a new cooldown window has started.
    Accepted,
    /// Same identity; confidence/tier/bands updated in place.
    Refined,
    /// Identity change rejected because the cooldown has not elapsed.
    Blocked,
}

/// Holds the current confirmed mind state and gates identity changes.
#[derive(Debug, Clone)]
pub struct StateConfirmer {
    cooldown_ms: f64,
    current: Option<MindState>,
    challenger: Option<StateCandidate>,
    blocked: bool,
    /// Timestamp of the last *accepted* transition, `None` before the first.
    last_transition_at: Option<f64>,
}

impl StateConfirmer {
    /// New confirmer with no current state.
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            current: None,
            challenger: None,
            blocked: false,
            last_transition_at: None,
        }
    }

    /// The currently held state, if any reading has been accepted yet.
    pub fn current(&self) -> Option<&MindState> {
        self.current.as_ref()
    }

    /// The runner-up recorded alongside the last applied reading.
    pub fn challenger(&self) -> Option<&StateCandidate> {
        self.challenger.as_ref()
    }

    /// Whether the most recent proposal was rejected by the cooldown.
    /// Sticky until the next accepted or refined reading.
    pub fn blocked(&self) -> bool {
        self.blocked
    }

    /// Apply one classifier reading.
    ///
    /// The very first reading is always accepted — there is no prior
    /// transition for a cooldown to measure from.
    pub fn apply(
        &mut self,
        candidate: StateCandidate,
        challenger: Option<StateCandidate>,
        now_ms: f64,
    ) -> Confirmation {
        // Same identity: refine in place, no cooldown.
        if let Some(cur) = self.current.as_mut() {
            if cur.id == candidate.id {
                cur.confidence = candidate.confidence;
                if cur.tier != candidate.tier {
                    debug!(
                        "mind state '{}': tier {} -> {}",
                        cur.id,
                        cur.tier.name(),
                        candidate.tier.name()
                    );
                    cur.tier = candidate.tier;
                    cur.tier_changed_at = now_ms;
                }
                cur.dominant_bands = candidate.dominant_bands;
                self.challenger = challenger;
                self.blocked = false;
                return Confirmation::Refined;
            }
        }

        // Identity change proposed.
        let in_cooldown = self
            .last_transition_at
            .is_some_and(|t| now_ms - t < self.cooldown_ms);
        if in_cooldown {
            debug!(
                "mind state: transition to '{}' blocked by cooldown",
                candidate.id
            );
            self.blocked = true;
            return Confirmation::Blocked;
        }

        info!(
            "mind state: {} -> '{}' ({} %, {})",
            self.current
                .as_ref()
                .map_or("(none)", |c| c.id.as_str()),
            candidate.id,
            candidate.confidence,
            candidate.tier.name()
        );
        self.current = Some(MindState {
            id: candidate.id,
            confidence: candidate.confidence,
            tier: candidate.tier,
            entered_at: now_ms,
            tier_changed_at: now_ms,
            dominant_bands: candidate.dominant_bands,
        });
        self.challenger = challenger;
        self.blocked = false;
        self.last_transition_at = Some(now_ms);
        Confirmation::Accepted
    }

    /// Return to the pristine initial state: no current state, no
    /// challenger, nothing blocked, no cooldown anchor.
    pub fn reset(&mut self) {
        self.current = None;
        self.challenger = None;
        self.blocked = false;
        self.last_transition_at = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
