//! Typed sales/inventory facts and per-SKU demand statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One validated sales observation: units sold for a SKU on a calendar day.
///
/// Multiple facts for the same (sku, date) are additive when the daily
/// series is built, never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesFact {
    pub sku: String,
    pub date: NaiveDate,
    pub units_sold: f64,
}

/// Replenishment parameters for a SKU, carried forward from its most
/// recent valid row (last observation wins; optional fields keep the last
/// value that was actually present).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuSnapshot {
    pub sku: String,
    pub on_hand: f64,
    pub lead_time_days: u32,
    pub moq: Option<u32>,
    pub unit_cost: Option<f64>,
}

/// Daily demand from the earliest to the latest observed date, inclusive.
///
/// Days inside the range with no sales fact are real zero-demand days, not
/// missing data.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSeries {
    pub sku: String,
    pub start: NaiveDate,
    pub daily_units: Vec<f64>,
}

impl DemandSeries {
    pub fn len(&self) -> usize {
        self.daily_units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_units.is_empty()
    }

    /// Last observed date covered by the series.
    pub fn end(&self) -> NaiveDate {
        self.start + chrono::Days::new(self.daily_units.len().saturating_sub(1) as u64)
    }
}

/// Demand statistics projected over the requested horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEstimate {
    pub avg_daily_sales: f64,
    pub std_dev_daily_sales: f64,
    pub forecast_horizon_units: f64,
    /// Percentage change of the trailing two weeks of demand versus the two
    /// weeks before that; None when the series is too short or the prior
    /// window saw no sales.
    pub trend_pct: Option<f64>,
}

impl ForecastEstimate {
    /// Estimate for a SKU with no measurable demand.
    pub fn zero_demand() -> Self {
        Self {
            avg_daily_sales: 0.0,
            std_dev_daily_sales: 0.0,
            forecast_horizon_units: 0.0,
            trend_pct: None,
        }
    }
}
