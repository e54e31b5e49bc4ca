//! Reorder policy: safety stock, reorder point, and order sizing.

use chrono::{Days, NaiveDate};

use crate::models::{ForecastEstimate, SkuSnapshot};

/// Service-level constant for safety stock; z = 1.65 targets roughly a 95%
/// single-period service level.
pub const SERVICE_LEVEL_Z: f64 = 1.65;

/// Everything the policy derives for one SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDecision {
    pub safety_stock: f64,
    pub reorder_point: f64,
    /// How many days current stock lasts at the estimated velocity;
    /// infinite when there is no measurable demand.
    pub days_of_cover: f64,
    pub reorder_qty: f64,
    pub reorder_by_date: Option<NaiveDate>,
}

/// Size the order to cover the forecast horizon plus safety buffer, net of
/// stock on hand — not merely to refill the reorder point, so one order can
/// cover the whole horizon.
pub fn decide(
    forecast: &ForecastEstimate,
    snapshot: &SkuSnapshot,
    today: NaiveDate,
) -> PolicyDecision {
    let avg = forecast.avg_daily_sales;
    let lead = snapshot.lead_time_days as f64;
    let stock = snapshot.on_hand;

    let safety_stock = if forecast.std_dev_daily_sales == 0.0 {
        0.0
    } else {
        SERVICE_LEVEL_Z * forecast.std_dev_daily_sales * lead.sqrt()
    };
    let reorder_point = avg * lead + safety_stock;

    let days_of_cover = if avg > 0.0 { stock / avg } else { f64::INFINITY };

    let raw_shortfall = (forecast.forecast_horizon_units + safety_stock - stock).max(0.0);
    let reorder_qty = round_up_to_moq(raw_shortfall, snapshot.moq);

    let reorder_by_date = if avg > 0.0 {
        // Clamped to today: an already-overdue SKU should be ordered now.
        let days_until_order = (days_of_cover - lead).floor().max(0.0);
        today.checked_add_days(Days::new(days_until_order as u64))
    } else {
        None
    };

    PolicyDecision {
        safety_stock,
        reorder_point,
        days_of_cover,
        reorder_qty,
        reorder_by_date,
    }
}

/// Round a positive shortfall up to the supplier's batch size. A shortfall
/// of 1 unit with an MOQ of 50 becomes an order of 50; without an MOQ the
/// shortfall is rounded up to whole units.
pub fn round_up_to_moq(raw_shortfall: f64, moq: Option<u32>) -> f64 {
    if raw_shortfall <= 0.0 {
        return 0.0;
    }
    match moq {
        Some(moq) if moq > 0 => {
            let batch = moq as f64;
            (raw_shortfall / batch).ceil() * batch
        }
        _ => raw_shortfall.ceil(),
    }
}
