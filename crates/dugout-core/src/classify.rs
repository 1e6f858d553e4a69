//! Four-band classification of average game durations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default band boundaries in minutes: the 30th percentile, the league
/// average and the 70th percentile of recent game lengths.
pub const DEFAULT_FAST_BELOW: f64 = 168.0;
pub const DEFAULT_NORMAL_BELOW: f64 = 182.7;
pub const DEFAULT_LONG_FROM: f64 = 194.0;

/// Band boundaries `t1 < t2 < t3`, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
}

impl Thresholds {
    pub fn new(t1: f64, t2: f64, t3: f64) -> Result<Self> {
        let finite = t1.is_finite() && t2.is_finite() && t3.is_finite();
        if !finite || !(t1 < t2 && t2 < t3) {
            return Err(Error::Config(format!(
                "duration thresholds must be increasing, got {} / {} / {}",
                t1, t2, t3
            )));
        }
        Ok(Self { t1, t2, t3 })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            t1: DEFAULT_FAST_BELOW,
            t2: DEFAULT_NORMAL_BELOW,
            t3: DEFAULT_LONG_FROM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBand {
    Fast,
    Normal,
    SlightlyLong,
    Long,
}

impl DurationBand {
    /// Style tag used by the hour page.
    pub fn css_class(&self) -> &'static str {
        match self {
            DurationBand::Fast => "fast",
            DurationBand::Normal => "normal",
            DurationBand::SlightlyLong => "bit-long",
            DurationBand::Long => "long",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DurationBand::Fast => "빠르게 끝나는 경기입니다",
            DurationBand::Normal => "일반적인 경기 소요 시간입니다",
            DurationBand::SlightlyLong => "조금 긴 편이에요",
            DurationBand::Long => "시간 오래 걸리는 매치업입니다",
        }
    }
}

/// Classify `minutes` into half-open bands closed on the lower end:
/// `[0, t1)` fast, `[t1, t2)` normal, `[t2, t3)` slightly long, `[t3, ..)` long.
pub fn classify_duration(minutes: f64, thresholds: &Thresholds) -> DurationBand {
    if minutes < thresholds.t1 {
        DurationBand::Fast
    } else if minutes < thresholds.t2 {
        DurationBand::Normal
    } else if minutes < thresholds.t3 {
        DurationBand::SlightlyLong
    } else {
        DurationBand::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let t = Thresholds::default();
        assert_eq!(classify_duration(0.0, &t), DurationBand::Fast);
        assert_eq!(classify_duration(167.9, &t), DurationBand::Fast);
        assert_eq!(classify_duration(180.0, &t), DurationBand::Normal);
        assert_eq!(classify_duration(190.0, &t), DurationBand::SlightlyLong);
        assert_eq!(classify_duration(250.0, &t), DurationBand::Long);
    }

    #[test]
    fn test_boundaries_are_closed_below() {
        let t = Thresholds::default();
        assert_eq!(classify_duration(168.0, &t), DurationBand::Normal);
        assert_eq!(classify_duration(182.7, &t), DurationBand::SlightlyLong);
        assert_eq!(classify_duration(194.0, &t), DurationBand::Long);
    }

    #[test]
    fn test_every_input_gets_exactly_one_band() {
        let t = Thresholds::default();
        let mut minutes = 0.0;
        while minutes < 300.0 {
            let band = classify_duration(minutes, &t);
            let expected = [
                minutes < t.t1,
                minutes >= t.t1 && minutes < t.t2,
                minutes >= t.t2 && minutes < t.t3,
                minutes >= t.t3,
            ];
            assert_eq!(expected.iter().filter(|&&hit| hit).count(), 1);
            let index = expected.iter().position(|&hit| hit).unwrap();
            let bands = [
                DurationBand::Fast,
                DurationBand::Normal,
                DurationBand::SlightlyLong,
                DurationBand::Long,
            ];
            assert_eq!(band, bands[index], "minutes = {}", minutes);
            minutes += 0.1;
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let t = Thresholds::new(150.0, 160.0, 170.0).unwrap();
        assert_eq!(classify_duration(165.0, &t), DurationBand::SlightlyLong);
        assert_eq!(classify_duration(180.0, &t).css_class(), "long");
    }

    #[test]
    fn test_rejects_non_increasing_thresholds() {
        assert!(Thresholds::new(180.0, 170.0, 190.0).is_err());
        assert!(Thresholds::new(170.0, 170.0, 190.0).is_err());
        assert!(Thresholds::new(f64::NAN, 170.0, 190.0).is_err());
    }
}
