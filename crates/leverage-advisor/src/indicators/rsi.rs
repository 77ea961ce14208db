//! Relative Strength Index
//!
//! Simple-moving-average variant: the mean gain and mean loss over the last
//! `period` price deltas, then `RSI = 100 - 100 / (1 + gain / loss)`.

/// Returned whenever the RSI cannot be computed
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI of the most recent window, in `[0, 100]`.
///
/// Returns [`NEUTRAL_RSI`] when there are fewer than `period + 1` prices or
/// when the window holds no losses (the ratio is undefined there).
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &prices[prices.len() - period - 1..];
    let (gains, losses) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l - delta)
        }
    });

    #[allow(clippy::cast_precision_loss)]
    let period_f = period as f64;
    let avg_gain = gains / period_f;
    let avg_loss = losses / period_f;

    if avg_loss == 0.0 {
        return NEUTRAL_RSI;
    }

    let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
    if rsi.is_finite() {
        rsi.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RSI
    }
}

/// Zone label used in rationales
pub fn zone(rsi: f64) -> &'static str {
    if rsi < 30.0 {
        "oversold"
    } else if rsi > 70.0 {
        "overbought"
    } else {
        "neutral"
    }
}
