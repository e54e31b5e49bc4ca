//! Per-SKU demand aggregation and forecasting.
//!
//! The forecaster is a stationary-mean estimator: no trend or seasonality
//! fitting, so every figure stays explainable from the series itself.

use crate::models::{DemandSeries, ForecastEstimate, SalesFact};

/// Window used for the demand-trend comparison in the explanation text.
pub const TREND_WINDOW_DAYS: usize = 14;

/// Build a SKU's daily demand series spanning its earliest to latest
/// observed date. Days without a fact are zero-demand days; facts sharing a
/// date are summed.
pub fn build_series(sku: &str, facts: &[SalesFact]) -> Option<DemandSeries> {
    let start = facts.iter().map(|f| f.date).min()?;
    let end = facts.iter().map(|f| f.date).max()?;

    let len = (end - start).num_days() as usize + 1;
    let mut daily_units = vec![0.0; len];
    for fact in facts {
        let idx = (fact.date - start).num_days() as usize;
        daily_units[idx] += fact.units_sold;
    }

    Some(DemandSeries {
        sku: sku.to_string(),
        start,
        daily_units,
    })
}

/// Estimate daily demand from a series and project it over the horizon.
///
/// The average runs over the whole observed series, zero days included, so
/// intermittently-selling SKUs are not overstated. A one-day series
/// degrades to that day's value with zero deviation.
pub fn forecast(series: &DemandSeries, horizon_days: u32) -> ForecastEstimate {
    let n = series.daily_units.len() as f64;
    if n == 0.0 {
        return ForecastEstimate::zero_demand();
    }

    let avg = series.daily_units.iter().sum::<f64>() / n;
    let variance = series
        .daily_units
        .iter()
        .map(|units| (units - avg).powi(2))
        .sum::<f64>()
        / n;

    ForecastEstimate {
        avg_daily_sales: avg,
        std_dev_daily_sales: variance.sqrt(),
        forecast_horizon_units: avg * horizon_days as f64,
        trend_pct: trend_pct(&series.daily_units),
    }
}

/// Mean daily demand over the trailing two weeks versus the two weeks
/// before that, as a percentage change.
fn trend_pct(daily: &[f64]) -> Option<f64> {
    let recent_start = daily.len().saturating_sub(TREND_WINDOW_DAYS);
    let prior_start = daily.len().saturating_sub(2 * TREND_WINDOW_DAYS);
    let recent = &daily[recent_start..];
    let prior = &daily[prior_start..recent_start];
    if recent.is_empty() || prior.is_empty() {
        return None;
    }

    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;
    let prior_mean = prior.iter().sum::<f64>() / prior.len() as f64;
    if prior_mean <= 0.0 {
        return None;
    }
    Some((recent_mean - prior_mean) / prior_mean * 100.0)
}
