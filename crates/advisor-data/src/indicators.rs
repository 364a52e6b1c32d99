//! Technical indicator computation over daily closing prices

use crate::error::{DataError, Result};
use advisor_core::IndicatorTable;
use ta::Next;
use ta::indicators::{ExponentialMovingAverage, RelativeStrengthIndex, SimpleMovingAverage};

/// Compute the standard indicator set over a close-price series
///
/// Produces one table with RSI-14, SMA-50, SMA-200, EMA-12/26 and the MACD
/// line, each with its latest value and a one-word interpretation. The
/// series must be in chronological order; short series still produce values
/// (the rolling indicators warm up over whatever history is available).
pub fn technical_indicator_table(closes: &[f64]) -> Result<IndicatorTable> {
    if closes.is_empty() {
        return Err(DataError::Indicator(
            "no closing prices to compute indicators from".to_string(),
        ));
    }
    let current_price = closes[closes.len() - 1];

    let rsi = last_value(RelativeStrengthIndex::new(14), closes)?;
    let sma_50 = last_value(SimpleMovingAverage::new(50), closes)?;
    let sma_200 = last_value(SimpleMovingAverage::new(200), closes)?;
    let ema_12 = last_value(ExponentialMovingAverage::new(12), closes)?;
    let ema_26 = last_value(ExponentialMovingAverage::new(26), closes)?;
    let macd = ema_12 - ema_26;

    let mut table = IndicatorTable::new(
        "Technical indicators",
        vec![
            "indicator".to_string(),
            "value".to_string(),
            "interpretation".to_string(),
        ],
    );
    table.push_row(vec![
        "RSI_14".to_string(),
        format!("{rsi:.2}"),
        interpret_rsi(rsi).to_string(),
    ]);
    table.push_row(vec![
        "SMA_50".to_string(),
        format!("{sma_50:.2}"),
        price_vs_average(current_price, sma_50).to_string(),
    ]);
    table.push_row(vec![
        "SMA_200".to_string(),
        format!("{sma_200:.2}"),
        price_vs_average(current_price, sma_200).to_string(),
    ]);
    table.push_row(vec![
        "EMA_12".to_string(),
        format!("{ema_12:.2}"),
        price_vs_average(current_price, ema_12).to_string(),
    ]);
    table.push_row(vec![
        "MACD_12_26".to_string(),
        format!("{macd:.4}"),
        if macd > 0.0 { "bullish" } else { "bearish" }.to_string(),
    ]);
    Ok(table)
}

fn last_value<I>(indicator: std::result::Result<I, impl std::fmt::Display>, closes: &[f64]) -> Result<f64>
where
    I: Next<f64, Output = f64>,
{
    let mut indicator = indicator.map_err(|e| DataError::Indicator(e.to_string()))?;
    let mut value = 0.0;
    for &close in closes {
        value = indicator.next(close);
    }
    Ok(value)
}

fn interpret_rsi(rsi: f64) -> &'static str {
    if rsi >= 70.0 {
        "overbought"
    } else if rsi <= 30.0 {
        "oversold"
    } else {
        "neutral"
    }
}

fn price_vs_average(price: f64, average: f64) -> &'static str {
    if price > average { "above" } else { "below" }
}
