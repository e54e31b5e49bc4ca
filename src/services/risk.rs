//! Risk classification and plain-language justification.
//!
//! The reason text is composed from already-computed figures only, so it
//! can never contradict the numeric output.

use crate::models::{ForecastEstimate, SkuSnapshot, StockStatus};
use crate::services::policy::PolicyDecision;

/// Days-of-cover multiple of the lead time below which a SKU is AMBER.
pub const AMBER_BUFFER_FACTOR: f64 = 1.5;

/// Minimum relative demand change (percent) before the trend is mentioned.
const TREND_NOTE_THRESHOLD_PCT: f64 = 10.0;

/// RED: exhausted before a new order could arrive even if placed today.
/// AMBER: cover inside the buffer zone above the lead time. GREEN:
/// comfortable cover, or no measurable demand.
pub fn classify(avg_daily_sales: f64, days_of_cover: f64, lead_time_days: u32) -> StockStatus {
    if avg_daily_sales <= 0.0 {
        return StockStatus::Green;
    }
    let lead = lead_time_days as f64;
    if days_of_cover < lead {
        StockStatus::Red
    } else if days_of_cover < lead * AMBER_BUFFER_FACTOR {
        StockStatus::Amber
    } else {
        StockStatus::Green
    }
}

/// Template-composed justification for one SKU's recommendation.
pub fn explain(
    forecast: &ForecastEstimate,
    decision: &PolicyDecision,
    snapshot: &SkuSnapshot,
    horizon_days: u32,
) -> String {
    if forecast.avg_daily_sales <= 0.0 {
        return "No recent sales detected; no reorder recommendation.".to_string();
    }

    let mut reason = format!(
        "Average daily sales is {:.1} units; current stock covers {:.1} days, versus a {}-day lead time.",
        forecast.avg_daily_sales, decision.days_of_cover, snapshot.lead_time_days
    );

    if decision.reorder_qty > 0.0 {
        match decision.reorder_by_date {
            Some(date) => reason.push_str(&format!(
                " Recommended reorder: {:.0} units by {}.",
                decision.reorder_qty, date
            )),
            None => reason.push_str(&format!(
                " Recommended reorder: {:.0} units as soon as possible.",
                decision.reorder_qty
            )),
        }
    } else {
        reason.push_str(&format!(
            " Stock on hand covers the {horizon_days}-day forecast; no reorder needed."
        ));
    }

    if let Some(pct) = forecast.trend_pct {
        if pct.abs() >= TREND_NOTE_THRESHOLD_PCT {
            reason.push_str(&format!(" Demand changed ~{pct:.0}% vs prior 2 weeks."));
        }
    }

    reason
}
