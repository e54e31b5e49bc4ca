//! Pipeline assembly: run the per-SKU stages and order the final list.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::errors::SchemaError;
use crate::models::{Analysis, RawTable, Recommendation, SortOrder};
use crate::services::ingest::{self, SkuBatch};
use crate::services::{demand, policy, risk};

/// Run the whole pipeline over an already-decoded table.
///
/// `today` is supplied by the caller so one run works against one
/// consistent date; everything downstream of it is deterministic.
pub fn compute_recommendations(
    table: &RawTable,
    horizon_days: u32,
    today: NaiveDate,
    sort: SortOrder,
) -> Result<Analysis, SchemaError> {
    let ingest::IngestOutput { batches, warnings } = ingest::ingest(table)?;

    // SKUs never read each other's data, so the per-SKU stages fan out;
    // collect() rejoins them in input order, keeping output deterministic.
    let mut recommendations: Vec<Recommendation> = batches
        .par_iter()
        .map(|batch| recommend(batch, horizon_days, today))
        .collect();

    if sort == SortOrder::Urgency {
        sort_by_urgency(&mut recommendations);
    }

    Ok(Analysis {
        recommendations,
        warnings,
    })
}

fn recommend(batch: &SkuBatch, horizon_days: u32, today: NaiveDate) -> Recommendation {
    let snapshot = &batch.snapshot;

    let forecast = match demand::build_series(&snapshot.sku, &batch.facts) {
        Some(series) => demand::forecast(&series, horizon_days),
        None => crate::models::ForecastEstimate::zero_demand(),
    };
    let decision = policy::decide(&forecast, snapshot, today);
    let status = risk::classify(
        forecast.avg_daily_sales,
        decision.days_of_cover,
        snapshot.lead_time_days,
    );
    let reason = risk::explain(&forecast, &decision, snapshot, horizon_days);

    Recommendation {
        sku: snapshot.sku.clone(),
        current_stock: snapshot.on_hand,
        avg_daily_sales: forecast.avg_daily_sales,
        forecast_horizon_units: forecast.forecast_horizon_units,
        reorder_qty: decision.reorder_qty,
        reorder_by_date: decision.reorder_by_date,
        lead_time_days: snapshot.lead_time_days,
        moq: snapshot.moq,
        unit_cost: snapshot.unit_cost,
        status,
        reason,
    }
}

/// Most urgent first: status severity, then order size descending. The
/// sort is stable, so ties keep the input's first-seen order.
fn sort_by_urgency(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        a.status
            .severity_rank()
            .cmp(&b.status.severity_rank())
            .then_with(|| {
                b.reorder_qty
                    .partial_cmp(&a.reorder_qty)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
}
