//! Output records: recommendations, warnings, and list ordering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stock risk level for a SKU.
///
/// RED: stock runs out before a new order could arrive even if placed
/// today. AMBER: cover is inside the buffer zone above the lead time.
/// GREEN: comfortable cover, or no measurable demand at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    Red,
    Amber,
    Green,
}

impl StockStatus {
    /// Sort key for urgency ordering; lower is more urgent.
    pub fn severity_rank(self) -> u8 {
        match self {
            StockStatus::Red => 0,
            StockStatus::Amber => 1,
            StockStatus::Green => 2,
        }
    }
}

/// Reorder recommendation for a single SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub sku: String,
    pub current_stock: f64,
    pub avg_daily_sales: f64,
    pub forecast_horizon_units: f64,
    pub reorder_qty: f64,
    /// Latest date to place the order; None when there is no measurable
    /// demand to derive urgency from.
    pub reorder_by_date: Option<NaiveDate>,
    pub lead_time_days: u32,
    pub moq: Option<u32>,
    pub unit_cost: Option<f64>,
    pub status: StockStatus,
    pub reason: String,
}

/// Category of a row-level or SKU-level diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    InvalidDate,
    InvalidNumeric,
    NoValidSnapshot,
}

/// Diagnostic for a quarantined row or a dropped SKU. Quarantined rows are
/// excluded from aggregation; processing continues for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RowWarning {
    pub kind: WarningKind,
    /// 1-based line in the uploaded file (the header is line 1); None for
    /// SKU-level diagnostics.
    pub line: Option<u64>,
    pub sku: Option<String>,
    pub message: String,
}

impl RowWarning {
    pub fn row(kind: WarningKind, line: u64, sku: Option<String>, message: String) -> Self {
        Self {
            kind,
            line: Some(line),
            sku,
            message,
        }
    }

    pub fn sku(kind: WarningKind, sku: &str, message: String) -> Self {
        Self {
            kind,
            line: None,
            sku: Some(sku.to_string()),
            message,
        }
    }
}

/// Output ordering of the recommendation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// First-seen SKU order from the input (the default).
    #[default]
    FirstSeen,
    /// Status severity first (RED, AMBER, GREEN), then reorder quantity
    /// descending; ties keep first-seen order.
    Urgency,
}

/// Full result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Analysis {
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<RowWarning>,
}
