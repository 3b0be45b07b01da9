use crate::model::PriceBar;
use std::fmt;

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    /// Bullish only when the short average is strictly above the long one.
    /// Any NaN input compares false and reads Bearish.
    pub fn from_averages(short: f64, long: f64) -> Self {
        if short > long {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnicalSnapshot {
    pub last_close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub trend: Trend,
}

impl TechnicalSnapshot {
    /// `None` for an empty history. Averages with too few bars are NaN.
    pub fn from_bars(bars: &[PriceBar]) -> Option<Self> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let last_close = *closes.last()?;
        let sma_short = latest_sma(&closes, SHORT_WINDOW);
        let sma_long = latest_sma(&closes, LONG_WINDOW);

        Some(Self {
            last_close,
            sma_short,
            sma_long,
            trend: Trend::from_averages(sma_short, sma_long),
        })
    }
}

/// Mean of the trailing `window` values, NaN when fewer are available.
pub fn latest_sma(values: &[f64], window: usize) -> f64 {
    if window == 0 || values.len() < window {
        return f64::NAN;
    }
    values[values.len() - window..].iter().sum::<f64>() / window as f64
}

/// Rolling mean aligned to `values`; `None` until the window fills.
pub fn rolling_sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::bars;

    #[test]
    fn latest_sma_uses_trailing_window() {
        assert_eq!(latest_sma(&[1.0, 2.0, 3.0, 4.0], 2), 3.5);
        assert!(latest_sma(&[1.0, 2.0], 3).is_nan());
    }

    #[test]
    fn rolling_sma_is_aligned() {
        let sma = rolling_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(sma, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn rising_series_is_bullish() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let snapshot = TechnicalSnapshot::from_bars(&bars(&closes)).unwrap();

        assert_eq!(snapshot.last_close, 349.0);
        assert_eq!(snapshot.sma_short, 324.5);
        assert_eq!(snapshot.sma_long, 249.5);
        assert_eq!(snapshot.trend, Trend::Bullish);
    }

    #[test]
    fn falling_series_is_bearish() {
        let closes: Vec<f64> = (0..250).map(|i| 400.0 - i as f64).collect();
        let snapshot = TechnicalSnapshot::from_bars(&bars(&closes)).unwrap();
        assert_eq!(snapshot.trend, Trend::Bearish);
    }

    #[test]
    fn equal_averages_are_bearish() {
        assert_eq!(Trend::from_averages(10.0, 10.0), Trend::Bearish);
        assert_eq!(Trend::from_averages(10.5, 10.0), Trend::Bullish);
    }

    #[test]
    fn six_months_of_bars_leave_long_average_undefined() {
        let closes: Vec<f64> = (0..126).map(|i| 50.0 + i as f64).collect();
        let snapshot = TechnicalSnapshot::from_bars(&bars(&closes)).unwrap();

        assert!(!snapshot.sma_short.is_nan());
        assert!(snapshot.sma_long.is_nan());
        assert_eq!(snapshot.trend, Trend::Bearish);
        assert_eq!(snapshot.trend.to_string(), "Bearish");
    }

    #[test]
    fn empty_history_has_no_snapshot() {
        assert!(TechnicalSnapshot::from_bars(&[]).is_none());
    }
}
