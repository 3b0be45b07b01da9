use crate::analyzer::indicators::{rolling_sma, LONG_WINDOW, SHORT_WINDOW};
use crate::model::PriceBar;

/// Candles plus the two moving-average series, index-aligned with the candles.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub candles: Vec<PriceBar>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
}

/// A single row of the chart: the candle and the averages on that day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRow<'a> {
    pub candle: &'a PriceBar,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}

impl ChartSet {
    pub fn prepare(history: &[PriceBar]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }
        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
        Some(Self {
            candles: history.to_vec(),
            sma_short: rolling_sma(&closes, SHORT_WINDOW),
            sma_long: rolling_sma(&closes, LONG_WINDOW),
        })
    }

    /// The last `n` rows, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ChartRow<'_>> {
        let start = self.candles.len().saturating_sub(n);
        (start..self.candles.len())
            .map(|i| ChartRow {
                candle: &self.candles[i],
                sma_short: self.sma_short[i],
                sma_long: self.sma_long[i],
            })
            .collect()
    }

    pub fn price_range(&self) -> (f64, f64) {
        self.candles.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            (lo.min(b.low), hi.max(b.high))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::bars;

    #[test]
    fn series_align_with_candles() {
        let closes: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let charts = ChartSet::prepare(&bars(&closes)).unwrap();

        assert_eq!(charts.candles.len(), 60);
        assert_eq!(charts.sma_short.len(), 60);
        assert_eq!(charts.sma_long.len(), 60);
        assert_eq!(charts.sma_short[48], None);
        assert_eq!(charts.sma_short[49], Some(24.5));
        assert!(charts.sma_long.iter().all(Option::is_none));
    }

    #[test]
    fn recent_rows_take_the_tail() {
        let charts = ChartSet::prepare(&bars(&[10.0, 11.0, 12.0])).unwrap();
        let rows = charts.recent(2);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].candle.close, 11.0);
        assert_eq!(rows[1].candle.close, 12.0);
        assert_eq!(charts.recent(10).len(), 3);
        assert_eq!(charts.price_range(), (8.0, 14.0));
    }

    #[test]
    fn empty_history_has_no_charts() {
        assert!(ChartSet::prepare(&[]).is_none());
    }
}
