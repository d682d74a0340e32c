//! # mindstream
//!
//! Real-time interpretation engine for multi-channel EEG headset telemetry:
//! turns noisy `dev`/`pow`/`met` packets into a stable, UI-consumable
//! session snapshot — smoothed signals, a debounced connection-health
//! indicator, and a flicker-resistant mind-state classification.
//!
//! The engine is deliberately small and synchronous.  It does not talk to
//! hardware, classify states, or persist anything; a transport hands it
//! `(stream, payload)` pairs, a scheduler ticks it periodically, an external
//! classifier hands it candidate states, and consumers read owned
//! [`session::Snapshot`] values.
//!
//! ## Interpretation pipeline
//!
//! | Stage | Behaviour |
//! |---|---|
//! | [`parse`] | defensive payload decoding; malformed input → "no update" |
//! | [`smoothing`] | per-field EMA (band power α = 0.2, emotions α = 0.15), seeded to the first sample |
//! | [`connection`] | hysteresis state machine: 5 agreeing observations before the indicator moves |
//! | [`mindstate`] | tiered confirmation with a 4 s cooldown between accepted identity changes |
//! | [`session`] | the owned aggregate tying it all together, plus staleness flags and packet rate |
//!
//! ## Quick start
//!
//! ```
//! use mindstream::prelude::*;
//!
//! let mut engine = SessionEngine::new(EngineConfig::default());
//! engine.set_active(true, now_ms());
//!
//! // Transport callback:
//! engine.handle_event("pow", &[0.2, 0.6, 0.1, 0.1, 0.05], now_ms());
//!
//! // Scheduler callback (every ~500 ms):
//! engine.tick(now_ms());
//!
//! // UI reads an immutable snapshot whenever it likes:
//! let snap = engine.snapshot();
//! println!("{} — alpha {:.2}", snap.connection_label, snap.band_power.alpha);
//! ```
//!
//! ## Failure model
//!
//! There are no fatal errors inside the engine.  Malformed payloads are
//! discarded, late classifier proposals surface as a `blocked` flag, and
//! aging data surfaces as staleness booleans — a live biosignal dashboard
//! must never go blank because of one bad sample.
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`prelude`] | One-line glob import of the commonly needed types |
//! | [`session`] | [`session::SessionEngine`], [`session::EngineConfig`], [`session::Snapshot`] |
//! | [`types`] | The interpreted data model (band power, emotions, device, mind state) |
//! | [`protocol`] | Stream names, electrode table, and every numeric threshold |
//! | [`parse`] | Pure payload decoders for the three streams |
//! | [`smoothing`] | EMA filtering and dominant-band selection |
//! | [`connection`] | Debounced connection-health tracking |
//! | [`mindstate`] | Mind-state confirmation with change cooldown |

pub mod connection;
pub mod mindstate;
pub mod parse;
pub mod protocol;
pub mod session;
pub mod smoothing;
pub mod types;

// ── Prelude ───────────────────────────────────────────────────────────────────

/// Convenience re-exports for downstream crates.
///
/// A single glob import covers driving the engine and reading its output:
///
/// ```
/// use mindstream::prelude::*;
///
/// let mut engine = SessionEngine::new(EngineConfig::default());
/// engine.set_active(true, 0.0);
/// engine.handle_event("met", &[0.6, 0.8, 0.2, 0.7, 0.5, 0.9], 10.0);
/// assert!(engine.snapshot().emotions.arousal > 0.0);
/// ```
pub mod prelude {
    // ── Engine ────────────────────────────────────────────────────────────────
    pub use crate::session::{now_ms, EngineConfig, SessionEngine, Snapshot};

    // ── Data model ────────────────────────────────────────────────────────────
    pub use crate::types::{
        Band, BandPower, ConnectionState, DeviceInfo, EmotionAxes, Metric, MindState,
        SensorQuality, StateCandidate, StateTier,
    };

    // ── Confirmation outcome ──────────────────────────────────────────────────
    pub use crate::mindstate::Confirmation;

    // ── Protocol constants ────────────────────────────────────────────────────
    pub use crate::protocol::{
        ELECTRODE_COUNT, ELECTRODE_NAMES, STREAM_BAND_POWER, STREAM_DEVICE, STREAM_METRICS,
    };
}
