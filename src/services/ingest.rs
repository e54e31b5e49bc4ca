//! Record parsing and validation.
//!
//! Turns raw uploaded rows into typed sales facts plus one carried-forward
//! snapshot per SKU. A missing required column fails the whole upload; a
//! malformed row is quarantined with a warning and processing continues.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::errors::{ApiError, SchemaError};
use crate::models::{
    RawTable, RowWarning, SalesFact, SkuSnapshot, WarningKind, OPTIONAL_COLUMNS, REQUIRED_COLUMNS,
};

/// Everything the downstream stages need for one SKU, in input first-seen
/// order.
#[derive(Debug, Clone)]
pub struct SkuBatch {
    pub snapshot: SkuSnapshot,
    pub facts: Vec<SalesFact>,
}

#[derive(Debug, Default)]
pub struct IngestOutput {
    pub batches: Vec<SkuBatch>,
    pub warnings: Vec<RowWarning>,
}

/// Decode an uploaded CSV file into a raw table.
///
/// Structural failures (undecodable bytes, broken quoting) reject the
/// upload; value-level validation happens later, row by row.
pub fn table_from_csv(bytes: &[u8]) -> Result<RawTable, ApiError> {
    // A UTF-8 BOM would otherwise end up glued onto the first header.
    let bytes = bytes.strip_prefix("\u{feff}".as_bytes()).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ApiError::InvalidUpload(format!("unreadable CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ApiError::InvalidUpload(format!("unreadable CSV record: {e}")))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, records })
}

/// Resolved positions of the recognized columns in one table.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    sku: usize,
    date: usize,
    units_sold: usize,
    on_hand: usize,
    lead_time_days: usize,
    moq: Option<usize>,
    cost: Option<usize>,
}

fn resolve_columns(table: &RawTable) -> Result<ColumnIndex, SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError { missing });
    }

    // Required lookups cannot fail past this point.
    let index = |name: &str| table.column_index(name).unwrap_or_default();
    Ok(ColumnIndex {
        sku: index(REQUIRED_COLUMNS[0]),
        date: index(REQUIRED_COLUMNS[1]),
        units_sold: index(REQUIRED_COLUMNS[2]),
        on_hand: index(REQUIRED_COLUMNS[3]),
        lead_time_days: index(REQUIRED_COLUMNS[4]),
        moq: table.column_index(OPTIONAL_COLUMNS[0]),
        cost: table.column_index(OPTIONAL_COLUMNS[1]),
    })
}

/// One fully validated row.
#[derive(Debug, Clone)]
struct ParsedRow {
    sku: String,
    date: NaiveDate,
    units_sold: f64,
    on_hand: f64,
    lead_time_days: u32,
    moq: Option<u32>,
    unit_cost: Option<f64>,
}

struct RowError {
    kind: WarningKind,
    sku: Option<String>,
    message: String,
}

/// Validate every row, quarantine the malformed ones, and fold each SKU's
/// valid rows into facts plus a latest-observation snapshot.
pub fn ingest(table: &RawTable) -> Result<IngestOutput, SchemaError> {
    let columns = resolve_columns(table)?;

    struct SkuAccum {
        sku: String,
        facts: Vec<SalesFact>,
        rows: Vec<(NaiveDate, ParsedRow)>,
    }

    let mut order: Vec<String> = Vec::new();
    let mut by_sku: HashMap<String, SkuAccum> = HashMap::new();
    let mut warnings: Vec<RowWarning> = Vec::new();

    for (i, record) in table.records.iter().enumerate() {
        // The header occupies line 1 of the file.
        let line = i as u64 + 2;
        match parse_row(record, &columns) {
            Ok(row) => {
                let accum = by_sku.entry(row.sku.clone()).or_insert_with(|| {
                    order.push(row.sku.clone());
                    SkuAccum {
                        sku: row.sku.clone(),
                        facts: Vec::new(),
                        rows: Vec::new(),
                    }
                });
                accum.facts.push(SalesFact {
                    sku: row.sku.clone(),
                    date: row.date,
                    units_sold: row.units_sold,
                });
                accum.rows.push((row.date, row));
            }
            Err(err) => {
                if let Some(sku) = &err.sku {
                    if !by_sku.contains_key(sku) {
                        order.push(sku.clone());
                        by_sku.insert(
                            sku.clone(),
                            SkuAccum {
                                sku: sku.clone(),
                                facts: Vec::new(),
                                rows: Vec::new(),
                            },
                        );
                    }
                }
                warnings.push(RowWarning::row(err.kind, line, err.sku, err.message));
            }
        }
    }

    let mut batches = Vec::with_capacity(order.len());
    for sku in &order {
        let Some(accum) = by_sku.remove(sku) else {
            continue;
        };
        if accum.rows.is_empty() {
            // Only quarantined rows ever mentioned this SKU.
            warnings.push(RowWarning::sku(
                WarningKind::NoValidSnapshot,
                &accum.sku,
                format!("SKU {} has no valid rows and was dropped", accum.sku),
            ));
            continue;
        }
        batches.push(SkuBatch {
            snapshot: fold_snapshot(&accum.sku, accum.rows),
            facts: accum.facts,
        });
    }

    Ok(IngestOutput { batches, warnings })
}

/// Last observation wins: replay valid rows in date order (input order on
/// ties) and carry the optional fields forward across rows that omit them.
fn fold_snapshot(sku: &str, mut rows: Vec<(NaiveDate, ParsedRow)>) -> SkuSnapshot {
    rows.sort_by_key(|(date, _)| *date);

    let mut snapshot = SkuSnapshot {
        sku: sku.to_string(),
        on_hand: 0.0,
        lead_time_days: 1,
        moq: None,
        unit_cost: None,
    };
    for (_, row) in rows {
        snapshot.on_hand = row.on_hand;
        snapshot.lead_time_days = row.lead_time_days;
        if row.moq.is_some() {
            snapshot.moq = row.moq;
        }
        if row.unit_cost.is_some() {
            snapshot.unit_cost = row.unit_cost;
        }
    }
    snapshot
}

fn parse_row(record: &[String], columns: &ColumnIndex) -> Result<ParsedRow, RowError> {
    let cell = |idx: usize| record.get(idx).map(String::as_str).unwrap_or("");
    let optional_cell =
        |idx: Option<usize>| idx.map(|i| cell(i).trim()).filter(|s| !s.is_empty());

    let sku = cell(columns.sku).trim().to_string();
    if sku.is_empty() {
        return Err(RowError {
            kind: WarningKind::InvalidNumeric,
            sku: None,
            message: "SKU is empty".to_string(),
        });
    }

    let row_error = |kind: WarningKind, message: String| RowError {
        kind,
        sku: Some(sku.clone()),
        message,
    };

    let date = parse_history_date(cell(columns.date))
        .map_err(|msg| row_error(WarningKind::InvalidDate, msg))?;
    let units_sold = parse_non_negative(cell(columns.units_sold), "UnitsSold")
        .map_err(|msg| row_error(WarningKind::InvalidNumeric, msg))?;
    let on_hand = parse_non_negative(cell(columns.on_hand), "OnHand")
        .map_err(|msg| row_error(WarningKind::InvalidNumeric, msg))?;
    let lead_time_days = parse_positive_int(cell(columns.lead_time_days), "LeadTimeDays")
        .map_err(|msg| row_error(WarningKind::InvalidNumeric, msg))?;

    let moq = match optional_cell(columns.moq) {
        Some(raw) => Some(
            parse_positive_int(raw, "MOQ")
                .map_err(|msg| row_error(WarningKind::InvalidNumeric, msg))?,
        ),
        None => None,
    };
    let unit_cost = match optional_cell(columns.cost) {
        Some(raw) => Some(
            parse_non_negative(raw, "Cost")
                .map_err(|msg| row_error(WarningKind::InvalidNumeric, msg))?,
        ),
        None => None,
    };

    Ok(ParsedRow {
        sku,
        date,
        units_sold,
        on_hand,
        lead_time_days,
        moq,
        unit_cost,
    })
}

/// Parse a history date: ISO `YYYY-MM-DD`, otherwise day-first `D/M/YYYY`.
///
/// A day-first month above 12 is rejected outright, never reinterpreted as
/// month-first.
pub(crate) fn parse_history_date(raw: &str) -> Result<NaiveDate, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err("Date is empty".to_string());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3 {
        return Err(format!("unrecognized date format: {raw}"));
    }
    let day: u32 = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("invalid day in date: {raw}"))?;
    let month: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid month in date: {raw}"))?;
    let year_str = parts[2].trim();
    if year_str.len() != 4 {
        return Err(format!("expected a 4-digit year in date: {raw}"));
    }
    let year: i32 = year_str
        .parse()
        .map_err(|_| format!("invalid year in date: {raw}"))?;

    if month > 12 {
        return Err(format!("month {month} out of range in date: {raw}"));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| format!("no such calendar date: {raw}"))
}

fn parse_non_negative(raw: &str, field: &str) -> Result<f64, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(format!("{field} is empty"));
    }
    let value: f64 = s
        .parse()
        .map_err(|_| format!("{field} is not a number: {raw}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} must be a non-negative number: {raw}"));
    }
    Ok(value)
}

fn parse_positive_int(raw: &str, field: &str) -> Result<u32, String> {
    let value = parse_non_negative(raw, field)?;
    if value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
        return Err(format!("{field} must be a positive integer: {raw}"));
    }
    Ok(value as u32)
}
