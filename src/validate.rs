use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::debug;

use crate::models::{Dataset, MonthlyRecord};

pub const MONTH_COLUMN: &str = "Month";
pub const REVENUE_COLUMN: &str = "Revenue";
pub const ORDERS_COLUMN: &str = "Orders";

/// Reasons an input table is rejected. Rows are 1-based data rows.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("column `{column}` row {row}: `{value}` is not a valid number")]
    NonNumericField {
        column: &'static str,
        row: usize,
        value: String,
    },
    #[error("column `{column}` row {row}: negative value {value}")]
    NegativeValue {
        column: &'static str,
        row: usize,
        value: f64,
    },
    #[error("input contains no data rows")]
    EmptyInput,
    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),
}

struct ColumnIndex {
    month: usize,
    revenue: usize,
    orders: usize,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord) -> Result<Self, ValidationError> {
        if headers.iter().all(|header| header.is_empty()) {
            return Err(ValidationError::EmptyInput);
        }
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or(ValidationError::MissingColumn(name))
        };

        Ok(Self {
            month: find(MONTH_COLUMN)?,
            revenue: find(REVENUE_COLUMN)?,
            orders: find(ORDERS_COLUMN)?,
        })
    }
}

pub fn from_reader<R: Read>(input: R) -> Result<Vec<MonthlyRecord>, ValidationError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let columns = ColumnIndex::locate(reader.headers()?)?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let raw = result?;
        let field = |position: usize| raw.get(position).unwrap_or_default();

        records.push(MonthlyRecord {
            month: field(columns.month).to_string(),
            revenue: parse_revenue(field(columns.revenue), row)?,
            orders: parse_orders(field(columns.orders), row)?,
        });
    }

    if records.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    debug!(rows = records.len(), "validated input table");
    Ok(records)
}

pub fn from_path(path: &Path) -> Result<Vec<MonthlyRecord>, ValidationError> {
    let file = File::open(path).map_err(csv::Error::from)?;
    from_reader(file)
}

pub fn load_dataset(path: &Path) -> Result<Dataset, ValidationError> {
    let records = from_path(path)?;
    Ok(Dataset::new(path.display().to_string(), records))
}

fn parse_number(column: &'static str, value: &str, row: usize) -> Result<f64, ValidationError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ValidationError::NonNumericField {
            column,
            row,
            value: value.to_string(),
        }),
    }
}

fn parse_revenue(value: &str, row: usize) -> Result<f64, ValidationError> {
    let revenue = parse_number(REVENUE_COLUMN, value, row)?;
    if revenue < 0.0 {
        return Err(ValidationError::NegativeValue {
            column: REVENUE_COLUMN,
            row,
            value: revenue,
        });
    }
    Ok(revenue)
}

fn parse_orders(value: &str, row: usize) -> Result<u64, ValidationError> {
    if let Ok(orders) = value.parse::<u64>() {
        return Ok(orders);
    }

    // Spreadsheet exports often write counts as `110.0`.
    let orders = parse_number(ORDERS_COLUMN, value, row)?;
    if orders < 0.0 {
        return Err(ValidationError::NegativeValue {
            column: ORDERS_COLUMN,
            row,
            value: orders,
        });
    }
    if orders.fract() != 0.0 || orders > u64::MAX as f64 {
        return Err(ValidationError::NonNumericField {
            column: ORDERS_COLUMN,
            row,
            value: value.to_string(),
        });
    }
    Ok(orders as u64)
}
