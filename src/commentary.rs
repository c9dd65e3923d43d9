//! Templated executive text. Pure functions of already-derived KPIs.

use crate::models::{DerivedRecord, RiskCategory};

pub const NO_HISTORY_COMMENTARY: &str =
    "Not enough history for period-over-period commentary.";

pub fn risk_headline(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::High => "High Risk",
        RiskCategory::Medium => "Medium Risk",
        RiskCategory::Low => "Healthy",
    }
}

pub fn risk_message(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::High => {
            "Significant revenue decline detected. Immediate investigation required."
        }
        RiskCategory::Medium => "Moderate revenue decline. Monitor closely.",
        RiskCategory::Low => "Revenue performance is stable or growing.",
    }
}

pub fn diagnosis(revenue_change_pct: Option<f64>, orders_change_pct: Option<f64>) -> &'static str {
    match (revenue_change_pct, orders_change_pct) {
        (Some(revenue), Some(orders)) if revenue < 0.0 && orders < 0.0 => {
            "Revenue and order volume declined together. Possible demand contraction."
        }
        (Some(revenue), Some(orders)) if revenue < 0.0 && orders >= 0.0 => {
            "Revenue declined while order volume remained stable. Potential pricing issue."
        }
        _ => "No major structural performance issue detected.",
    }
}

pub fn executive_commentary(record: &DerivedRecord) -> &'static str {
    if record.revenue_change_pct.is_none() && record.orders_change_pct.is_none() {
        return NO_HISTORY_COMMENTARY;
    }

    match record.risk_category {
        RiskCategory::High => {
            "Revenue contraction detected alongside order decline. Immediate intervention recommended."
        }
        RiskCategory::Medium => {
            "Early signs of revenue deceleration observed. Close monitoring advised."
        }
        RiskCategory::Low => {
            "Revenue trajectory remains stable with positive order dynamics. No material performance anomaly detected."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(revenue: Option<f64>, orders: Option<f64>, category: RiskCategory) -> DerivedRecord {
        DerivedRecord {
            month: "Feb".to_string(),
            revenue: 900.0,
            orders: 90,
            aov: Some(10.0),
            revenue_change_pct: revenue,
            orders_change_pct: orders,
            aov_change_pct: None,
            risk_score: 0,
            risk_category: category,
        }
    }

    #[test]
    fn diagnosis_separates_demand_from_pricing() {
        assert!(diagnosis(Some(-8.0), Some(-4.0)).contains("demand contraction"));
        assert!(diagnosis(Some(-8.0), Some(0.0)).contains("pricing issue"));
        assert!(diagnosis(Some(3.0), Some(-4.0)).starts_with("No major"));
        assert!(diagnosis(None, None).starts_with("No major"));
    }

    #[test]
    fn commentary_tracks_category() {
        let high = derived(Some(-20.0), Some(-10.0), RiskCategory::High);
        let low = derived(Some(5.0), Some(2.0), RiskCategory::Low);
        assert!(executive_commentary(&high).contains("Immediate intervention"));
        assert!(executive_commentary(&low).contains("No material performance anomaly"));
    }

    #[test]
    fn first_period_has_no_commentary() {
        let first = derived(None, None, RiskCategory::Low);
        assert_eq!(executive_commentary(&first), NO_HISTORY_COMMENTARY);
    }

    #[test]
    fn headlines_and_messages_cover_every_category() {
        assert_eq!(risk_headline(RiskCategory::Low), "Healthy");
        assert_eq!(risk_headline(RiskCategory::High), "High Risk");
        assert!(risk_message(RiskCategory::Medium).contains("Monitor closely"));
    }
}
