//! Optional TOML configuration for the forecast horizon and risk policy.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::forecast::DEFAULT_HORIZON;
use crate::risk::RiskPolicy;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    #[serde(default = "default_horizon")]
    pub forecast_horizon: usize,

    #[serde(default)]
    pub risk: RiskPolicy,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast_horizon: default_horizon(),
            risk: RiskPolicy::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validated()
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_horizon(mut self, horizon: Option<usize>) -> Self {
        if let Some(horizon) = horizon {
            self.forecast_horizon = horizon;
        }
        self.forecast_horizon = self.forecast_horizon.max(1);
        self
    }

    fn validated(self) -> Result<Self> {
        let risk = &self.risk;
        for (name, weight) in [
            ("revenue_weight", risk.revenue_weight),
            ("orders_weight", risk.orders_weight),
            ("aov_weight", risk.aov_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                bail!("risk.{name} must be a non-negative number, got {weight}");
            }
        }
        if !(0.0..=risk.high_decline_pct).contains(&risk.medium_decline_pct)
            || !risk.high_decline_pct.is_finite()
        {
            bail!(
                "risk thresholds must satisfy 0 <= medium_decline_pct ({}) <= high_decline_pct ({})",
                risk.medium_decline_pct,
                risk.high_decline_pct
            );
        }
        Ok(self.with_horizon(None))
    }
}
