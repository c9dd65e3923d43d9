use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::models::MonthlyRecord;

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Month")]
    month: &'a str,
    #[serde(rename = "Revenue")]
    revenue: f64,
    #[serde(rename = "Orders")]
    orders: u64,
}

/// A year of plausible trading with a soft patch in the autumn.
pub fn sample_records() -> Vec<MonthlyRecord> {
    let rows = [
        ("Jan-2024", 48_200.0, 1_210),
        ("Feb-2024", 50_150.0, 1_245),
        ("Mar-2024", 53_900.0, 1_320),
        ("Apr-2024", 52_400.0, 1_300),
        ("May-2024", 56_750.0, 1_385),
        ("Jun-2024", 58_300.0, 1_410),
        ("Jul-2024", 57_100.0, 1_402),
        ("Aug-2024", 59_800.0, 1_455),
        ("Sep-2024", 55_200.0, 1_398),
        ("Oct-2024", 49_600.0, 1_290),
        ("Nov-2024", 51_300.0, 1_335),
        ("Dec-2024", 60_450.0, 1_470),
    ];

    rows.into_iter()
        .map(|(month, revenue, orders)| MonthlyRecord {
            month: month.to_string(),
            revenue,
            orders,
        })
        .collect()
}

pub fn write_sample<W: Write>(output: W, records: &[MonthlyRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    for record in records {
        writer.serialize(CsvRow {
            month: &record.month,
            revenue: record.revenue,
            orders: record.orders,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_sample_file(path: &Path) -> anyhow::Result<usize> {
    let records = sample_records();
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_sample(file, &records)?;
    Ok(records.len())
}
