use tracing::info;

use crate::commentary;
use crate::config::DashboardConfig;
use crate::forecast;
use crate::kpi;
use crate::models::{Dashboard, Dataset, KpiSummary};

/// Runs derive, score and project over one validated dataset.
pub fn compute(dataset: &Dataset, config: &DashboardConfig) -> Dashboard {
    let records = kpi::derive_records(&dataset.records, &config.risk);
    let projection = forecast::project(&dataset.records, config.forecast_horizon);

    info!(
        source = %dataset.source,
        periods = records.len(),
        forecast = ?projection.next_revenue(),
        "computed dashboard"
    );

    Dashboard {
        source: dataset.source.clone(),
        records,
        projection,
    }
}

/// Latest-period cards. `None` only for a dashboard with no periods.
pub fn summarize(dashboard: &Dashboard) -> Option<KpiSummary> {
    let latest = dashboard.latest()?;

    Some(KpiSummary {
        month: latest.month.clone(),
        revenue: latest.revenue,
        revenue_change_pct: latest.revenue_change_pct,
        orders: latest.orders,
        orders_change_pct: latest.orders_change_pct,
        aov: latest.aov,
        aov_change_pct: latest.aov_change_pct,
        risk_score: latest.risk_score,
        risk_category: latest.risk_category,
        risk_headline: commentary::risk_headline(latest.risk_category),
        risk_message: commentary::risk_message(latest.risk_category),
        diagnosis: commentary::diagnosis(latest.revenue_change_pct, latest.orders_change_pct),
        commentary: commentary::executive_commentary(latest),
        forecast_revenue: dashboard.projection.next_revenue().map(f64::round),
    })
}
