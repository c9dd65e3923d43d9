//! Heuristic risk scoring over month-over-month deltas.
//!
//! The score measures how much a period moved, in either direction. The
//! category only looks at declines.

use serde::Deserialize;

use crate::models::RiskCategory;

pub const REVENUE_WEIGHT: f64 = 2.0;
pub const ORDERS_WEIGHT: f64 = 1.5;
pub const AOV_WEIGHT: f64 = 1.2;
pub const MAX_RISK_SCORE: u8 = 100;

/// Combined revenue + orders decline (in percentage points) at which a period
/// stops being `Low`.
pub const MEDIUM_DECLINE_PCT: f64 = 5.0;
/// Combined decline at which a period becomes `High`.
pub const HIGH_DECLINE_PCT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub revenue_weight: f64,
    pub orders_weight: f64,
    pub aov_weight: f64,
    pub medium_decline_pct: f64,
    pub high_decline_pct: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            revenue_weight: REVENUE_WEIGHT,
            orders_weight: ORDERS_WEIGHT,
            aov_weight: AOV_WEIGHT,
            medium_decline_pct: MEDIUM_DECLINE_PCT,
            high_decline_pct: HIGH_DECLINE_PCT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: u8,
    pub category: RiskCategory,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            score: 0,
            category: RiskCategory::Low,
        }
    }
}

pub fn assess(
    revenue_change_pct: Option<f64>,
    orders_change_pct: Option<f64>,
    policy: &RiskPolicy,
) -> RiskAssessment {
    RiskAssessment {
        score: risk_score(revenue_change_pct, orders_change_pct, policy),
        category: categorize(revenue_change_pct, orders_change_pct, policy),
    }
}

/// AOV change implied by the revenue and orders changes.
pub fn implied_aov_change_pct(
    revenue_change_pct: Option<f64>,
    orders_change_pct: Option<f64>,
) -> Option<f64> {
    let revenue_ratio = 1.0 + revenue_change_pct? / 100.0;
    let orders_ratio = 1.0 + orders_change_pct? / 100.0;
    if orders_ratio == 0.0 {
        return None;
    }
    Some((revenue_ratio / orders_ratio - 1.0) * 100.0)
}

pub fn risk_score(
    revenue_change_pct: Option<f64>,
    orders_change_pct: Option<f64>,
    policy: &RiskPolicy,
) -> u8 {
    let aov_change_pct = implied_aov_change_pct(revenue_change_pct, orders_change_pct);
    let magnitude = |delta: Option<f64>| delta.map(f64::abs).unwrap_or(0.0);

    let raw = magnitude(revenue_change_pct) * policy.revenue_weight
        + magnitude(orders_change_pct) * policy.orders_weight
        + magnitude(aov_change_pct) * policy.aov_weight;

    raw.round().min(MAX_RISK_SCORE as f64).max(0.0) as u8
}

pub fn decline_magnitude(revenue_change_pct: Option<f64>, orders_change_pct: Option<f64>) -> f64 {
    let decline = |delta: Option<f64>| delta.map(|value| (-value).max(0.0)).unwrap_or(0.0);
    decline(revenue_change_pct) + decline(orders_change_pct)
}

pub fn categorize(
    revenue_change_pct: Option<f64>,
    orders_change_pct: Option<f64>,
    policy: &RiskPolicy,
) -> RiskCategory {
    let decline = decline_magnitude(revenue_change_pct, orders_change_pct);
    if decline >= policy.high_decline_pct {
        RiskCategory::High
    } else if decline >= policy.medium_decline_pct {
        RiskCategory::Medium
    } else {
        RiskCategory::Low
    }
}
