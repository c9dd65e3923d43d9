use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    pub month: String,
    pub revenue: f64,
    pub orders: u64,
}

/// Validated input for one pipeline run. Built once per file and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: String,
    pub records: Vec<MonthlyRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<String>, records: Vec<MonthlyRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub month: String,
    pub revenue: f64,
    pub orders: u64,
    pub aov: Option<f64>,
    pub revenue_change_pct: Option<f64>,
    pub orders_change_pct: Option<f64>,
    pub aov_change_pct: Option<f64>,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub label: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendProjection {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Trend line evaluated at every historical period.
    pub fitted: Vec<f64>,
    pub points: Vec<ProjectedPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectionResult {
    InsufficientData { points: usize },
    Projected(TrendProjection),
}

impl ProjectionResult {
    pub fn next_revenue(&self) -> Option<f64> {
        match self {
            ProjectionResult::Projected(trend) => trend.points.first().map(|p| p.revenue),
            ProjectionResult::InsufficientData { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub source: String,
    pub records: Vec<DerivedRecord>,
    pub projection: ProjectionResult,
}

impl Dashboard {
    pub fn latest(&self) -> Option<&DerivedRecord> {
        self.records.last()
    }
}

/// Latest-period KPI cards plus the text that accompanies them.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSummary {
    pub month: String,
    pub revenue: f64,
    pub revenue_change_pct: Option<f64>,
    pub orders: u64,
    pub orders_change_pct: Option<f64>,
    pub aov: Option<f64>,
    pub aov_change_pct: Option<f64>,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
    pub risk_headline: &'static str,
    pub risk_message: &'static str,
    pub diagnosis: &'static str,
    pub commentary: &'static str,
    pub forecast_revenue: Option<f64>,
}
