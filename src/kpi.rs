use tracing::debug;

use crate::models::{DerivedRecord, MonthlyRecord};
use crate::risk::{self, RiskPolicy};

pub fn average_order_value(revenue: f64, orders: u64) -> Option<f64> {
    if orders == 0 {
        None
    } else {
        Some(revenue / orders as f64)
    }
}

/// Percentage change from `previous` to `current`. `None` when there is no
/// usable prior value.
pub fn percent_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let previous = previous?;
    let current = current?;
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

pub fn derive_records(records: &[MonthlyRecord], policy: &RiskPolicy) -> Vec<DerivedRecord> {
    let mut derived: Vec<DerivedRecord> = Vec::with_capacity(records.len());

    for record in records {
        let aov = average_order_value(record.revenue, record.orders);
        let (revenue_change_pct, orders_change_pct, aov_change_pct) = match derived.last() {
            Some(prior) => (
                percent_change(Some(prior.revenue), Some(record.revenue)),
                percent_change(Some(prior.orders as f64), Some(record.orders as f64)),
                percent_change(prior.aov, aov),
            ),
            None => (None, None, None),
        };
        let assessment = risk::assess(revenue_change_pct, orders_change_pct, policy);

        derived.push(DerivedRecord {
            month: record.month.clone(),
            revenue: record.revenue,
            orders: record.orders,
            aov,
            revenue_change_pct,
            orders_change_pct,
            aov_change_pct,
            risk_score: assessment.score,
            risk_category: assessment.category,
        });
    }

    debug!(records = derived.len(), "derived KPI records");
    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskCategory;
    use proptest::prelude::*;

    fn record(month: &str, revenue: f64, orders: u64) -> MonthlyRecord {
        MonthlyRecord {
            month: month.to_string(),
            revenue,
            orders,
        }
    }

    fn approx(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|value| (value - expected).abs() < 1e-9)
    }

    #[test]
    fn derives_aov_and_changes() {
        let records = vec![record("Jan", 1000.0, 100), record("Feb", 1100.0, 110)];
        let derived = derive_records(&records, &RiskPolicy::default());

        assert_eq!(derived.len(), 2);
        assert!(approx(derived[0].aov, 10.0));
        assert!(approx(derived[1].aov, 10.0));
        assert_eq!(derived[0].revenue_change_pct, None);
        assert_eq!(derived[0].orders_change_pct, None);
        assert_eq!(derived[0].aov_change_pct, None);
        assert!(approx(derived[1].revenue_change_pct, 10.0));
        assert!(approx(derived[1].orders_change_pct, 10.0));
        assert!(approx(derived[1].aov_change_pct, 0.0));
    }

    #[test]
    fn zero_orders_yield_missing_aov() {
        let records = vec![
            record("Jan", 1000.0, 100),
            record("Feb", 1100.0, 110),
            record("Mar", 0.0, 0),
        ];
        let derived = derive_records(&records, &RiskPolicy::default());

        assert_eq!(derived[2].aov, None);
        assert!(approx(derived[2].revenue_change_pct, -100.0));
        assert!(approx(derived[2].orders_change_pct, -100.0));
        assert_eq!(derived[2].aov_change_pct, None);
        assert_eq!(derived[2].risk_category, RiskCategory::High);
        assert_eq!(derived[2].risk_score, 100);
    }

    #[test]
    fn zero_prior_value_is_not_infinite() {
        let records = vec![record("Jan", 0.0, 0), record("Feb", 500.0, 5)];
        let derived = derive_records(&records, &RiskPolicy::default());

        assert_eq!(derived[1].revenue_change_pct, None);
        assert_eq!(derived[1].orders_change_pct, None);
        assert_eq!(derived[1].aov_change_pct, None);
        assert_eq!(derived[1].risk_category, RiskCategory::Low);
    }

    #[test]
    fn first_record_is_neutral() {
        let derived = derive_records(&[record("Jan", 10.0, 1)], &RiskPolicy::default());
        assert_eq!(derived[0].risk_score, 0);
        assert_eq!(derived[0].risk_category, RiskCategory::Low);
    }

    #[test]
    fn percent_change_guards_division() {
        assert_eq!(percent_change(Some(0.0), Some(5.0)), None);
        assert_eq!(percent_change(None, Some(5.0)), None);
        assert_eq!(percent_change(Some(5.0), None), None);
        assert!(approx(percent_change(Some(200.0), Some(150.0)), -25.0));
    }

    proptest! {
        #[test]
        fn derived_sequence_matches_input(
            rows in proptest::collection::vec((0.0f64..1e6, 0u64..10_000), 1..40)
        ) {
            let records: Vec<MonthlyRecord> = rows
                .iter()
                .enumerate()
                .map(|(index, (revenue, orders))| record(&format!("P{index}"), *revenue, *orders))
                .collect();
            let derived = derive_records(&records, &RiskPolicy::default());

            prop_assert_eq!(derived.len(), records.len());
            prop_assert_eq!(derived[0].revenue_change_pct, None);
            prop_assert_eq!(derived[0].orders_change_pct, None);
            prop_assert_eq!(derived[0].aov_change_pct, None);
            for (source, out) in records.iter().zip(derived.iter()) {
                prop_assert_eq!(&source.month, &out.month);
                if source.orders == 0 {
                    prop_assert_eq!(out.aov, None);
                } else {
                    prop_assert_eq!(out.aov, Some(source.revenue / source.orders as f64));
                }
            }
        }
    }
}
