use std::fmt::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use uuid::Uuid;

use crate::forecast::MIN_TREND_POINTS;
use crate::models::{Dashboard, KpiSummary, ProjectionResult};
use crate::pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
}

impl ReportMeta {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
        }
    }
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    meta: &'a ReportMeta,
    summary: Option<KpiSummary>,
    dashboard: &'a Dashboard,
}

pub fn render(
    format: ReportFormat,
    meta: &ReportMeta,
    dashboard: &Dashboard,
) -> serde_json::Result<String> {
    match format {
        ReportFormat::Markdown => Ok(build_report(meta, dashboard)),
        ReportFormat::Json => serde_json::to_string_pretty(&JsonReport {
            meta,
            summary: pipeline::summarize(dashboard),
            dashboard,
        }),
    }
}

pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:+.2}%"),
        None => "n/a".to_string(),
    }
}

pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("${value:.2}"),
        None => "n/a".to_string(),
    }
}

/// Plain-text KPI cards for the terminal.
pub fn render_summary(summary: &KpiSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "KPI summary for {}:", summary.month);
    let _ = writeln!(
        output,
        "- Current revenue: {} ({})",
        format_money(Some(summary.revenue)),
        format_pct(summary.revenue_change_pct)
    );
    let _ = writeln!(
        output,
        "- Current orders: {} ({})",
        summary.orders,
        format_pct(summary.orders_change_pct)
    );
    let _ = writeln!(
        output,
        "- Average order value: {} ({})",
        format_money(summary.aov),
        format_pct(summary.aov_change_pct)
    );
    let _ = writeln!(output, "- Risk score: {}", summary.risk_score);
    let _ = writeln!(output);
    let _ = writeln!(output, "Risk level: {}", summary.risk_headline);
    let _ = writeln!(output, "{}", summary.risk_message);
    let _ = writeln!(output, "Diagnosis: {}", summary.diagnosis);
    let _ = writeln!(output, "Commentary: {}", summary.commentary);

    match summary.forecast_revenue {
        Some(revenue) => {
            let _ = writeln!(output, "Projected next month revenue: ${revenue:.0}");
        }
        None => {
            let _ = writeln!(output, "Projected next month revenue: insufficient data");
        }
    }

    output
}

pub fn build_report(meta: &ReportMeta, dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Executive KPI Report");
    let _ = writeln!(
        output,
        "Generated {} for {} (report {})",
        meta.generated_at.format("%Y-%m-%d %H:%M UTC"),
        dashboard.source,
        meta.id
    );

    let Some(summary) = pipeline::summarize(dashboard) else {
        let _ = writeln!(output);
        let _ = writeln!(output, "No periods recorded in this dataset.");
        return output;
    };

    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Period ({})", summary.month);
    let _ = writeln!(
        output,
        "- Revenue: {} ({})",
        format_money(Some(summary.revenue)),
        format_pct(summary.revenue_change_pct)
    );
    let _ = writeln!(
        output,
        "- Orders: {} ({})",
        summary.orders,
        format_pct(summary.orders_change_pct)
    );
    let _ = writeln!(
        output,
        "- Average order value: {} ({})",
        format_money(summary.aov),
        format_pct(summary.aov_change_pct)
    );
    let _ = writeln!(output, "- Risk score: {}", summary.risk_score);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Risk Assessment");
    let _ = writeln!(output, "**{}**: {}", summary.risk_headline, summary.risk_message);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Diagnosis");
    let _ = writeln!(output, "{}", summary.diagnosis);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Executive Commentary");
    let _ = writeln!(output, "{}", summary.commentary);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Monthly KPIs");
    let _ = writeln!(
        output,
        "| Month | Revenue | Revenue MoM | Orders | Orders MoM | AOV | AOV MoM | Risk Score | Risk Level |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|");
    for record in dashboard.records.iter() {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            record.month,
            format_money(Some(record.revenue)),
            format_pct(record.revenue_change_pct),
            record.orders,
            format_pct(record.orders_change_pct),
            format_money(record.aov),
            format_pct(record.aov_change_pct),
            record.risk_score,
            record.risk_category.as_str()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Revenue Trend & Forecast");
    match &dashboard.projection {
        ProjectionResult::InsufficientData { points } => {
            let _ = writeln!(
                output,
                "Insufficient data for a trend forecast ({} period(s) available, {} required).",
                points, MIN_TREND_POINTS
            );
        }
        ProjectionResult::Projected(trend) => {
            let _ = writeln!(
                output,
                "Linear trend: {:+.2} per period (r² {:.3})",
                trend.slope, trend.r_squared
            );
            let _ = writeln!(output);
            let _ = writeln!(output, "| Period | Actual Revenue | Trend Forecast |");
            let _ = writeln!(output, "|---|---|---|");
            for (record, fitted) in dashboard.records.iter().zip(trend.fitted.iter()) {
                let _ = writeln!(
                    output,
                    "| {} | {} | {} |",
                    record.month,
                    format_money(Some(record.revenue)),
                    format_money(Some(*fitted))
                );
            }
            for point in trend.points.iter() {
                let _ = writeln!(
                    output,
                    "| {} | | {} |",
                    point.label,
                    format_money(Some(point.revenue))
                );
            }
            if let Some(next) = trend.points.first() {
                let _ = writeln!(output);
                let _ = writeln!(
                    output,
                    "Projected next month revenue ({}): ${:.0}",
                    next.label,
                    next.revenue.round()
                );
            }
        }
    }

    output
}
