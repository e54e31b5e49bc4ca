//! End-to-end pipeline tests: CSV in, recommendation list out.

use chrono::NaiveDate;
use replenish_api::models::{SortOrder, StockStatus, WarningKind};
use replenish_api::services::ingest::table_from_csv;
use replenish_api::services::recommendations::compute_recommendations;

const TODAY: &str = "2025-06-15";

fn today() -> NaiveDate {
    TODAY.parse().unwrap()
}

/// 30 days of history for one SKU at a constant daily rate, starting
/// 2025-05-01.
fn constant_history(sku: &str, units_per_day: f64, on_hand: f64, lead: u32, moq: &str) -> String {
    let mut csv = String::from("SKU,Date,UnitsSold,OnHand,LeadTimeDays,MOQ\n");
    for day in 1..=30 {
        csv.push_str(&format!(
            "{sku},2025-05-{day:02},{units_per_day},{on_hand},{lead},{moq}\n"
        ));
    }
    csv
}

#[test]
fn steady_seller_below_lead_time_goes_red() {
    let table = table_from_csv(constant_history("A1", 2.0, 10.0, 7, "").as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    assert!(analysis.warnings.is_empty());
    assert_eq!(analysis.recommendations.len(), 1);
    let rec = &analysis.recommendations[0];
    assert_eq!(rec.sku, "A1");
    assert_eq!(rec.current_stock, 10.0);
    assert_eq!(rec.avg_daily_sales, 2.0);
    assert_eq!(rec.forecast_horizon_units, 60.0);
    // Zero variance: the shortfall is 60 - 10 with no safety buffer.
    assert_eq!(rec.reorder_qty, 50.0);
    assert_eq!(rec.status, StockStatus::Red);
    // 5 days of cover against a 7-day lead time: already overdue.
    assert_eq!(rec.reorder_by_date, Some(today()));
    assert!(rec.reason.contains("Average daily sales is 2.0 units"));
    assert!(rec.reason.contains("50 units"));
}

#[test]
fn moq_rounds_the_same_scenario_up() {
    let table = table_from_csv(constant_history("A1", 2.0, 10.0, 7, "40").as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    let rec = &analysis.recommendations[0];
    assert_eq!(rec.moq, Some(40));
    // Raw shortfall 50 rounds up to the next multiple of 40.
    assert_eq!(rec.reorder_qty, 80.0);
}

#[test]
fn sku_without_sales_is_green_with_no_urgency() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays\n\
               B2,2025-05-01,0,5,7\n\
               B2,2025-05-02,0,5,7\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    let rec = &analysis.recommendations[0];
    assert_eq!(rec.avg_daily_sales, 0.0);
    assert_eq!(rec.status, StockStatus::Green);
    assert_eq!(rec.reorder_qty, 0.0);
    assert_eq!(rec.reorder_by_date, None);
    assert_eq!(
        rec.reason,
        "No recent sales detected; no reorder recommendation."
    );
}

#[test]
fn missing_required_column_fails_without_partial_output() {
    let csv = "SKU,Date,UnitsSold,OnHand\nA1,2025-05-01,2,10\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let err = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap_err();
    assert_eq!(err.missing, vec!["LeadTimeDays".to_string()]);
}

#[test]
fn day_first_and_iso_dates_land_on_the_same_day() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays\n\
               A1,1/12/2025,3,10,7\n\
               A1,2025-12-01,4,10,7\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    // Both rows fall on 1 December 2025: a one-day series of 7 units.
    let rec = &analysis.recommendations[0];
    assert_eq!(rec.avg_daily_sales, 7.0);
    assert!(analysis.warnings.is_empty());
}

#[test]
fn malformed_rows_warn_but_do_not_block_other_skus() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays\n\
               A1,2025-05-01,2,10,7\n\
               A1,13/13/2025,2,10,7\n\
               C3,2025-05-01,-1,4,3\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    assert_eq!(analysis.recommendations.len(), 1);
    assert_eq!(analysis.recommendations[0].sku, "A1");

    let kinds: Vec<WarningKind> = analysis.warnings.iter().map(|w| w.kind).collect();
    assert!(kinds.contains(&WarningKind::InvalidDate));
    assert!(kinds.contains(&WarningKind::InvalidNumeric));
    // C3 only ever appeared on a malformed row.
    assert!(kinds.contains(&WarningKind::NoValidSnapshot));
}

#[test]
fn default_ordering_is_first_seen() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays\n\
               Z9,2025-05-01,1,100,3\n\
               A1,2025-05-01,5,2,7\n\
               M5,2025-05-01,2,50,5\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    let skus: Vec<&str> = analysis
        .recommendations
        .iter()
        .map(|r| r.sku.as_str())
        .collect();
    assert_eq!(skus, vec!["Z9", "A1", "M5"]);
}

#[test]
fn urgency_ordering_puts_red_first() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays\n\
               GREEN1,2025-05-01,1,100,3\n\
               RED1,2025-05-01,5,2,7\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::Urgency).unwrap();

    assert_eq!(analysis.recommendations[0].sku, "RED1");
    assert_eq!(analysis.recommendations[0].status, StockStatus::Red);
    assert_eq!(analysis.recommendations[1].sku, "GREEN1");
}

#[test]
fn unit_cost_passes_through_from_the_latest_row() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays,MOQ,Cost\n\
               A1,2025-05-01,2,10,7,25,1.10\n\
               A1,2025-05-02,2,8,7,,1.25\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    let rec = &analysis.recommendations[0];
    assert_eq!(rec.unit_cost, Some(1.25));
    // MOQ was only present on the earlier row and carries forward.
    assert_eq!(rec.moq, Some(25));
}

#[test]
fn growing_demand_is_mentioned_in_the_reason() {
    let mut csv = String::from("SKU,Date,UnitsSold,OnHand,LeadTimeDays\n");
    for day in 1..=14 {
        csv.push_str(&format!("A1,2025-05-{day:02},2,10,7\n"));
    }
    for day in 15..=28 {
        csv.push_str(&format!("A1,2025-05-{day:02},4,10,7\n"));
    }
    let table = table_from_csv(csv.as_bytes()).unwrap();
    let analysis = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();

    let rec = &analysis.recommendations[0];
    assert!(
        rec.reason.contains("Demand changed ~100% vs prior 2 weeks."),
        "reason was: {}",
        rec.reason
    );
}

#[test]
fn pipeline_is_idempotent() {
    let csv = "SKU,Date,UnitsSold,OnHand,LeadTimeDays,MOQ,Cost\n\
               A1,2025-05-01,2,10,7,25,1.10\n\
               B2,2025-05-03,0,5,3,,\n\
               C3,7/5/2025,9,40,14,100,0.45\n";
    let table = table_from_csv(csv.as_bytes()).unwrap();

    let first = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();
    let second = compute_recommendations(&table, 30, today(), SortOrder::FirstSeen).unwrap();
    assert_eq!(first, second);
}
