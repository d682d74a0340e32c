//! Hardware-free demo: drives the interpretation engine with simulated
//! headset telemetry and logs the interpreted session once per second.
//!
//! Usage:
//!   cargo run                       # info-level summary lines
//!   RUST_LOG=mindstream=debug cargo run   # show engine internals too
//!
//! The simulator emits `dev`/`pow`/`met` packets from slow sine waves, with
//! a recurring transmission dropout (seconds 20–28 of every 40 s cycle) so
//! the connection indicator can be watched walking through
//! degraded → stale and recovering.  A toy threshold classifier feeds the
//! mind-state confirmation engine to exercise the transition cooldown.

use std::f64::consts::TAU;
use std::time::Duration;

use anyhow::Result;
use log::info;

use mindstream::prelude::*;

// ── Simulated telemetry ───────────────────────────────────────────────────────

/// Seconds of each 40 s cycle during which the "headset" goes silent.
const DROPOUT: std::ops::Range<f64> = 20.0..28.0;

fn in_dropout(elapsed_secs: f64) -> bool {
    DROPOUT.contains(&(elapsed_secs % 40.0))
}

/// Band power drifting between alpha-dominant (relaxed) and
/// betaH-dominant (focused) over a 30 s cycle.
fn pow_payload(t: f64) -> Vec<f64> {
    let drift = (TAU * t / 30.0).sin(); // −1 relaxed … +1 focused
    vec![
        0.25 + 0.05 * (TAU * t / 7.0).sin(),  // theta
        0.45 - 0.25 * drift,                  // alpha
        0.20 + 0.05 * (TAU * t / 11.0).sin(), // betaL
        0.30 + 0.25 * drift,                  // betaH
        0.10 + 0.04 * (TAU * t / 5.0).sin(),  // gamma
    ]
}

/// Performance metrics on the same 30 s drift.
fn met_payload(t: f64) -> Vec<f64> {
    let drift = (TAU * t / 30.0).sin();
    vec![
        0.55 + 0.20 * drift,                 // engagement
        0.40 + 0.10 * (TAU * t / 13.0).sin(), // excitement
        0.30 - 0.15 * drift,                 // stress
        0.55 - 0.20 * drift,                 // relaxation
        0.50 + 0.10 * (TAU * t / 17.0).sin(), // interest
        0.50 + 0.30 * drift,                 // focus
    ]
}

/// Device housekeeping: battery draining slowly, one flaky temporal
/// electrode, ~90 % overall quality.
fn dev_payload(t: f64) -> Vec<f64> {
    let mut p = vec![(95.0 - t / 60.0).max(5.0), 4.0];
    for slot in 0..ELECTRODE_COUNT {
        // T7 (slot 4) wobbles between poor and good contact.
        if slot == 4 {
            p.push(if (TAU * t / 9.0).sin() > 0.0 { 2.0 } else { 4.0 });
        } else {
            p.push(4.0);
        }
    }
    p.push(88.0 + 4.0 * (TAU * t / 21.0).sin());
    p
}

// ── Toy classifier ────────────────────────────────────────────────────────────

/// Threshold classifier over the smoothed emotion axes.  Deliberately
/// jumpy — the whole point is to let the confirmation cooldown do the
/// stabilising.
fn classify(snap: &Snapshot) -> (StateCandidate, Option<StateCandidate>) {
    let e = &snap.emotions;
    let scored = [
        ("deep_focus", e.control),
        ("relaxed", (e.valence + 1.0) / 2.0),
        ("neutral", 0.5),
    ];
    let mut ranked = scored.to_vec();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let to_candidate = |(id, score): (&str, f64)| {
        let confidence = (score * 100.0).clamp(0.0, 100.0) as u8;
        StateCandidate {
            id: id.to_string(),
            confidence,
            tier: match confidence {
                0..=59 => StateTier::Detected,
                60..=74 => StateTier::Candidate,
                75..=89 => StateTier::Confirmed,
                _ => StateTier::Locked,
            },
            dominant_bands: snap.dominant_band.into_iter().collect(),
        }
    };

    (to_candidate(ranked[0]), Some(to_candidate(ranked[1])))
}

// ── Main loop ─────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging ───────────────────────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine = SessionEngine::new(EngineConfig::default());
    let start = now_ms();
    engine.set_active(true, start);
    info!("session started — Ctrl-C to stop");

    let mut pow_timer = tokio::time::interval(Duration::from_millis(125));
    let mut met_timer = tokio::time::interval(Duration::from_millis(200));
    let mut dev_timer = tokio::time::interval(Duration::from_millis(1_000));
    let mut tick_timer = tokio::time::interval(Duration::from_millis(500));
    let mut classify_timer = tokio::time::interval(Duration::from_millis(1_000));
    let mut report_timer = tokio::time::interval(Duration::from_millis(1_000));

    loop {
        let now = now_ms();
        let elapsed = (now - start) / 1000.0;

        tokio::select! {
            _ = pow_timer.tick() => {
                if !in_dropout(elapsed) {
                    engine.handle_event(STREAM_BAND_POWER, &pow_payload(elapsed), now);
                }
            }
            _ = met_timer.tick() => {
                if !in_dropout(elapsed) {
                    engine.handle_event(STREAM_METRICS, &met_payload(elapsed), now);
                }
            }
            _ = dev_timer.tick() => {
                if !in_dropout(elapsed) {
                    engine.handle_event(STREAM_DEVICE, &dev_payload(elapsed), now);
                }
            }
            _ = tick_timer.tick() => {
                engine.tick(now);
            }
            _ = classify_timer.tick() => {
                let (candidate, challenger) = classify(&engine.snapshot());
                engine.update_mind_state(candidate, challenger, now);
            }
            _ = report_timer.tick() => {
                let snap = engine.snapshot();
                info!(
                    "{:<15} {:>5.1} pkt/s | α {:.2} βH {:.2} dom {:<5} | \
                     val {:+.2} aro {:.2} ctl {:.2}{} | state {}{} | bad sensors {}",
                    snap.connection_label,
                    snap.packet_rate,
                    snap.band_power.alpha,
                    snap.band_power.beta_h,
                    snap.dominant_band.map_or("none", Band::name),
                    snap.emotions.valence,
                    snap.emotions.arousal,
                    snap.emotions.control,
                    if snap.band_power_stale || snap.emotions_stale { " (stale)" } else { "" },
                    snap.mind_state_label.as_deref().unwrap_or("(none)"),
                    if snap.state_change_blocked { " [blocked]" } else { "" },
                    snap.bad_sensors,
                );
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    // Final snapshot in the same JSON shape a UI consumer would receive.
    let snap = engine.snapshot();
    info!("final snapshot: {}", serde_json::to_string_pretty(&snap)?);

    engine.set_active(false, now_ms());
    info!("session stopped");
    Ok(())
}
