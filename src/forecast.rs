//! Naive revenue forecast: ordinary least squares over period index.

use chrono::{Months, NaiveDate};
use tracing::{debug, warn};

use crate::models::{MonthlyRecord, ProjectedPoint, ProjectionResult, TrendProjection};

pub const MIN_TREND_POINTS: usize = 2;
pub const DEFAULT_HORIZON: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Fits `value = intercept + slope * index`. `None` with fewer than two points.
pub fn fit_trend(values: &[f64]) -> Option<LinearFit> {
    if values.len() < MIN_TREND_POINTS {
        return None;
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_x_squared: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x_squared - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = values.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (intercept + slope * i as f64)).powi(2))
        .sum();
    // A flat series is fitted exactly.
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

pub fn project(history: &[MonthlyRecord], horizon: usize) -> ProjectionResult {
    let revenues: Vec<f64> = history.iter().map(|record| record.revenue).collect();
    let Some(fit) = fit_trend(&revenues) else {
        warn!(points = revenues.len(), "not enough history for a revenue trend");
        return ProjectionResult::InsufficientData {
            points: revenues.len(),
        };
    };

    let horizon = horizon.max(1);
    let labels = forecast_labels(history.last().map(|record| record.month.as_str()), horizon);
    let points = labels
        .into_iter()
        .enumerate()
        .map(|(offset, label)| ProjectedPoint {
            label,
            revenue: fit.at(revenues.len() + offset),
        })
        .collect();

    debug!(
        slope = fit.slope,
        intercept = fit.intercept,
        r_squared = fit.r_squared,
        horizon,
        "fitted revenue trend"
    );

    ProjectionResult::Projected(TrendProjection {
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        fitted: (0..revenues.len()).map(|index| fit.at(index)).collect(),
        points,
    })
}

/// Month label layouts that can be continued into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthFormat {
    YearMonth,
    IsoDate,
    AbbrevDashYear,
    AbbrevSpaceYear,
    FullNameYear,
}

impl MonthFormat {
    const ALL: [MonthFormat; 5] = [
        MonthFormat::YearMonth,
        MonthFormat::IsoDate,
        MonthFormat::AbbrevDashYear,
        MonthFormat::AbbrevSpaceYear,
        MonthFormat::FullNameYear,
    ];

    fn parse(self, label: &str) -> Option<NaiveDate> {
        let parsed = match self {
            MonthFormat::YearMonth => NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d"),
            MonthFormat::IsoDate => NaiveDate::parse_from_str(label, "%Y-%m-%d"),
            MonthFormat::AbbrevDashYear => {
                NaiveDate::parse_from_str(&format!("01-{label}"), "%d-%b-%Y")
            }
            MonthFormat::AbbrevSpaceYear => {
                NaiveDate::parse_from_str(&format!("01 {label}"), "%d %b %Y")
            }
            MonthFormat::FullNameYear => {
                NaiveDate::parse_from_str(&format!("01 {label}"), "%d %B %Y")
            }
        };
        parsed.ok()
    }

    fn render(self, date: NaiveDate) -> String {
        let pattern = match self {
            MonthFormat::YearMonth => "%Y-%m",
            MonthFormat::IsoDate => "%Y-%m-%d",
            MonthFormat::AbbrevDashYear => "%b-%Y",
            MonthFormat::AbbrevSpaceYear => "%b %Y",
            MonthFormat::FullNameYear => "%B %Y",
        };
        date.format(pattern).to_string()
    }
}

fn parse_month(label: &str) -> Option<(MonthFormat, NaiveDate)> {
    MonthFormat::ALL
        .into_iter()
        .find_map(|format| format.parse(label).map(|date| (format, date)))
}

/// Labels for the next `horizon` periods after `last`.
pub fn forecast_labels(last: Option<&str>, horizon: usize) -> Vec<String> {
    if let Some((format, date)) = last.and_then(|label| parse_month(label.trim())) {
        let calendar: Option<Vec<String>> = (1..=horizon)
            .map(|step| {
                date.checked_add_months(Months::new(step as u32))
                    .map(|next| format.render(next))
            })
            .collect();
        if let Some(labels) = calendar {
            return labels;
        }
    }

    if horizon == 1 {
        vec!["Forecast".to_string()]
    } else {
        (1..=horizon).map(|step| format!("Forecast +{step}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(rows: &[(&str, f64)]) -> Vec<MonthlyRecord> {
        rows.iter()
            .map(|(month, revenue)| MonthlyRecord {
                month: month.to_string(),
                revenue: *revenue,
                orders: 1,
            })
            .collect()
    }

    #[test]
    fn fewer_than_two_points_is_insufficient() {
        assert_eq!(
            project(&[], 1),
            ProjectionResult::InsufficientData { points: 0 }
        );
        assert_eq!(
            project(&history(&[("Jan", 10.0)]), 3),
            ProjectionResult::InsufficientData { points: 1 }
        );
        assert_eq!(fit_trend(&[42.0]), None);
    }

    #[test]
    fn fits_exact_line() {
        let fit = fit_trend(&[100.0, 110.0, 120.0, 130.0]).unwrap();
        assert!((fit.slope - 10.0).abs() < 1e-9);
        assert!((fit.intercept - 100.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert!((fit.at(4) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn fits_noisy_series() {
        let fit = fit_trend(&[1000.0, 1100.0, 1050.0]).unwrap();
        assert!((fit.slope - 25.0).abs() < 1e-9);
        assert!((fit.intercept - 1025.0).abs() < 1e-9);
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn flat_series_is_a_perfect_fit() {
        let fit = fit_trend(&[50.0, 50.0, 50.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn projects_next_periods_with_calendar_labels() {
        let result = project(
            &history(&[("2024-11", 100.0), ("2024-12", 110.0), ("2025-01", 120.0)]),
            2,
        );
        let ProjectionResult::Projected(trend) = result else {
            panic!("expected a projection");
        };

        assert_eq!(trend.fitted.len(), 3);
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].label, "2025-02");
        assert_eq!(trend.points[1].label, "2025-03");
        assert!((trend.points[0].revenue - 130.0).abs() < 1e-9);
        assert!((trend.points[1].revenue - 140.0).abs() < 1e-9);
    }

    #[test]
    fn zero_horizon_still_projects_one_period() {
        let result = project(&history(&[("Jan", 1.0), ("Feb", 2.0)]), 0);
        let ProjectionResult::Projected(trend) = result else {
            panic!("expected a projection");
        };
        assert_eq!(trend.points.len(), 1);
        assert_eq!(trend.points[0].label, "Forecast");
    }

    #[test]
    fn continues_each_label_layout() {
        assert_eq!(forecast_labels(Some("Dec-2024"), 2), vec!["Jan-2025", "Feb-2025"]);
        assert_eq!(forecast_labels(Some("Mar 2024"), 1), vec!["Apr 2024"]);
        assert_eq!(forecast_labels(Some("January 2024"), 1), vec!["February 2024"]);
        assert_eq!(forecast_labels(Some("2024-01-31"), 1), vec!["2024-02-29"]);
    }

    #[test]
    fn unknown_labels_fall_back_to_generic_names() {
        assert_eq!(forecast_labels(Some("Q1"), 1), vec!["Forecast"]);
        assert_eq!(forecast_labels(Some("Jan"), 2), vec!["Forecast +1", "Forecast +2"]);
        assert_eq!(forecast_labels(None, 1), vec!["Forecast"]);
    }
}
