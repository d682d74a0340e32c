//! Exponential-moving-average filtering for band power and emotion axes,
//! plus dominant-band selection.
//!
//! One EMA pole per field: `smoothed = α·raw + (1 − α)·smoothed_old`, with
//! [`crate::protocol::BAND_POWER_ALPHA`] for band power (faster-reacting)
//! and [`crate::protocol::EMOTION_ALPHA`] for the emotion axes (steadier).
//!
//! A smoothed field that still holds the zero initial sentinel is seeded to
//! the incoming raw value verbatim — without this, every session would
//! start with a slow crawl up from zero instead of the first real sample.

use crate::types::{Band, BandPower, EmotionAxes};

/// One EMA step for a single scalar.
///
/// A `prev` of exactly `0.0` is the unseeded sentinel and returns `raw`
/// unblended.
///
/// # Example
///
/// ```
/// # use mindstream::smoothing::ema;
/// assert_eq!(ema(0.0, 0.8, 0.25), 0.8);          // first sample seeds
/// assert_eq!(ema(0.5, 1.0, 0.25), 0.625);        // 0.25·1.0 + 0.75·0.5
/// ```
pub fn ema(prev: f64, raw: f64, alpha: f64) -> f64 {
    if prev == 0.0 {
        raw
    } else {
        alpha * raw + (1.0 - alpha) * prev
    }
}

/// Blend a raw band-power reading into the smoothed copy, field by field.
pub fn smooth_band_power(prev: &BandPower, raw: &BandPower, alpha: f64) -> BandPower {
    BandPower {
        theta: ema(prev.theta, raw.theta, alpha),
        alpha: ema(prev.alpha, raw.alpha, alpha),
        beta_l: ema(prev.beta_l, raw.beta_l, alpha),
        beta_h: ema(prev.beta_h, raw.beta_h, alpha),
        gamma: ema(prev.gamma, raw.gamma, alpha),
        delta: ema(prev.delta, raw.delta, alpha),
    }
}

/// Blend raw emotion axes into the smoothed copy, field by field.
pub fn smooth_emotions(prev: &EmotionAxes, raw: &EmotionAxes, alpha: f64) -> EmotionAxes {
    EmotionAxes {
        valence: ema(prev.valence, raw.valence, alpha),
        arousal: ema(prev.arousal, raw.arousal, alpha),
        control: ema(prev.control, raw.control, alpha),
    }
}

/// The strongest band among theta/alpha/betaL/betaH/gamma.
///
/// Delta is excluded (it is never carried on the `pow` wire).  An all-zero
/// reading yields `None` rather than an arbitrary band name; ties go to the
/// first band in wire order.
pub fn dominant_band(power: &BandPower) -> Option<Band> {
    let candidates = [
        (Band::Theta, power.theta),
        (Band::Alpha, power.alpha),
        (Band::BetaL, power.beta_l),
        (Band::BetaH, power.beta_h),
        (Band::Gamma, power.gamma),
    ];
    let mut best = candidates[0];
    for &c in &candidates[1..] {
        if c.1 > best.1 {
            best = c;
        }
    }
    (best.1 > 0.0).then_some(best.0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_without_blending() {
        let raw = BandPower {
            theta: 0.3,
            alpha: 0.6,
            beta_l: 0.1,
            beta_h: 0.2,
            gamma: 0.05,
            delta: 0.0,
        };
        let smoothed = smooth_band_power(&BandPower::default(), &raw, 0.2);
        assert_eq!(smoothed, raw);
    }

    #[test]
    fn constant_input_converges_to_the_raw_value() {
        let raw = BandPower {
            theta: 0.3,
            alpha: 0.6,
            beta_l: 0.1,
            beta_h: 0.2,
            gamma: 0.05,
            delta: 0.0,
        };
        // Perturb away from the seed, then feed the same raw vector many
        // times: the EMA is a fixed point under constant input.
        let mut smoothed = smooth_band_power(&BandPower::default(), &raw, 0.2);
        smoothed.alpha = 0.9;
        for _ in 0..200 {
            smoothed = smooth_band_power(&smoothed, &raw, 0.2);
        }
        assert!((smoothed.alpha - raw.alpha).abs() < 1e-9);
        assert!((smoothed.theta - raw.theta).abs() < 1e-9);
    }

    #[test]
    fn emotion_axes_blend_per_field() {
        let prev = EmotionAxes {
            valence: 0.4,
            arousal: 0.6,
            control: 0.5,
        };
        let raw = EmotionAxes {
            valence: 0.8,
            arousal: 0.6,
            control: 0.1,
        };
        let out = smooth_emotions(&prev, &raw, 0.15);
        assert!((out.valence - (0.15 * 0.8 + 0.85 * 0.4)).abs() < 1e-12);
        assert!((out.arousal - 0.6).abs() < 1e-12);
        assert!((out.control - (0.15 * 0.1 + 0.85 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn dominant_band_picks_the_maximum() {
        let p = BandPower {
            theta: 0.1,
            alpha: 0.5,
            beta_l: 0.2,
            beta_h: 0.4,
            gamma: 0.3,
            delta: 0.0,
        };
        assert_eq!(dominant_band(&p), Some(Band::Alpha));
    }

    #[test]
    fn dominant_band_ignores_delta() {
        let p = BandPower {
            theta: 0.1,
            alpha: 0.0,
            beta_l: 0.0,
            beta_h: 0.0,
            gamma: 0.0,
            delta: 9.0,
        };
        assert_eq!(dominant_band(&p), Some(Band::Theta));
    }

    #[test]
    fn all_zero_reading_has_no_dominant_band() {
        assert_eq!(dominant_band(&BandPower::default()), None);
    }

    #[test]
    fn dominant_band_tie_goes_to_wire_order() {
        let p = BandPower {
            theta: 0.5,
            alpha: 0.5,
            beta_l: 0.5,
            beta_h: 0.5,
            gamma: 0.5,
            delta: 0.0,
        };
        assert_eq!(dominant_band(&p), Some(Band::Theta));
    }
}
