//! Bar chart report for a punishment comparison
//!
//! Rendering is pure: the same comparison always produces the same text.

use crate::model::{PunishmentComparison, PunishmentDetail};
use std::cmp::Ordering;
use std::fmt::Write as _;

/// Width of every bar in character cells
pub const BAR_WIDTH: usize = 16;
/// Character used for a filled cell
pub const BAR_CHAR: char = '█';

const USER_LABEL: &str = "- Bạn         ";
const COMPANY_LABEL: &str = "- Công ty  ";
const TOTAL_HEADING: &str = "Tổng cộng:";

/// Render the full report for a comparison
#[must_use]
pub fn format_comparison(data: &PunishmentComparison) -> String {
    let mut result = String::new();

    let _ = writeln!(result, "📊 Tỷ lệ phạt ({}/{})\n", data.month, data.year);

    let _ = writeln!(result, "{TOTAL_HEADING}");
    write_bar_pair(
        &mut result,
        data.total_bar_percentage.user,
        data.total_bar_percentage.company,
    );

    for detail in significant_details(&data.punishment_details) {
        let _ = writeln!(result, "{}:", detail.punishment_type);
        write_bar_pair(
            &mut result,
            detail.user_bar_percentage,
            detail.company_bar_percentage,
        );
    }

    result.trim().to_string()
}

/// Details with a positive user or company share, in display order
///
/// `NoCheckInAndNoCheckOut` always goes last. Everything else is ordered by
/// user share then company share, both descending. The sort is stable.
#[must_use]
pub fn significant_details(details: &[PunishmentDetail]) -> Vec<&PunishmentDetail> {
    let mut significant: Vec<&PunishmentDetail> =
        details.iter().filter(|d| d.is_significant()).collect();
    significant.sort_by(|a, b| compare_details(a, b));
    significant
}

fn compare_details(a: &PunishmentDetail, b: &PunishmentDetail) -> Ordering {
    a.is_no_check_in_and_no_check_out()
        .cmp(&b.is_no_check_in_and_no_check_out())
        .then_with(|| descending(a.user_bar_percentage, b.user_bar_percentage))
        .then_with(|| descending(a.company_bar_percentage, b.company_bar_percentage))
}

fn descending(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

// NaN ranks below every number and -0.0 ties with 0.0
fn sort_key(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Percentage shown next to a bar
#[must_use]
pub fn rounded_percent(value: f64) -> i64 {
    // `as` saturates, and NaN becomes 0
    value.round() as i64
}

/// Number of filled cells for an already rounded percentage, clipped to the bar
#[must_use]
pub fn filled_cells(percent: i64) -> usize {
    let cells = (percent as f64 * BAR_WIDTH as f64 / 100.0).round();
    cells.clamp(0.0, BAR_WIDTH as f64) as usize
}

/// A `BAR_WIDTH` wide bar, filled cells first and padded with spaces
#[must_use]
pub fn render_bar(percent: i64) -> String {
    let filled = filled_cells(percent);
    let mut bar = String::with_capacity(BAR_WIDTH * BAR_CHAR.len_utf8());
    bar.extend(std::iter::repeat_n(BAR_CHAR, filled));
    bar.extend(std::iter::repeat_n(' ', BAR_WIDTH - filled));
    bar
}

fn write_bar_pair(result: &mut String, user: f64, company: f64) {
    write_bar_row(result, USER_LABEL, user);
    write_bar_row(result, COMPANY_LABEL, company);
    let _ = writeln!(result);
}

fn write_bar_row(result: &mut String, label: &str, value: f64) {
    let percent = rounded_percent(value);
    let _ = writeln!(result, "{label}[{}] {percent}%", render_bar(percent));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NO_CHECK_IN_AND_NO_CHECK_OUT, TotalBarPercentage};

    fn detail(kind: &str, user: f64, company: f64) -> PunishmentDetail {
        PunishmentDetail {
            punishment_type: kind.to_string(),
            user_bar_percentage: user,
            company_bar_percentage: company,
        }
    }

    fn comparison(details: Vec<PunishmentDetail>) -> PunishmentComparison {
        PunishmentComparison {
            month: 6,
            year: 2024,
            total_bar_percentage: TotalBarPercentage {
                user: 25.0,
                company: 10.0,
            },
            punishment_details: details,
        }
    }

    fn order(details: &[PunishmentDetail]) -> Vec<&str> {
        significant_details(details)
            .into_iter()
            .map(|d| d.punishment_type.as_str())
            .collect()
    }

    #[test]
    fn test_reference_report() {
        let data = comparison(vec![
            detail("Late", 50.0, 20.0),
            detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 80.0, 5.0),
            detail("Absent", 0.0, 0.0),
        ]);

        let expected = [
            "📊 Tỷ lệ phạt (6/2024)",
            "",
            "Tổng cộng:",
            "- Bạn         [████            ] 25%",
            "- Công ty  [██              ] 10%",
            "",
            "Late:",
            "- Bạn         [████████        ] 50%",
            "- Công ty  [███             ] 20%",
            "",
            "NoCheckInAndNoCheckOut:",
            "- Bạn         [█████████████   ] 80%",
            "- Công ty  [█               ] 5%",
        ]
        .join("\n");

        assert_eq!(format_comparison(&data), expected);
    }

    #[test]
    fn test_only_insignificant_details_renders_totals_only() {
        let data = comparison(vec![
            detail("Absent", 0.0, 0.0),
            detail("Late", -5.0, 0.0),
        ]);
        let report = format_comparison(&data);

        assert!(report.ends_with("- Công ty  [██              ] 10%"));
        assert!(!report.contains("Absent"));
        assert!(!report.contains("Late"));
        assert_eq!(report.lines().count(), 5);
    }

    #[test]
    fn test_empty_details() {
        let report = format_comparison(&comparison(Vec::new()));
        assert!(report.starts_with("📊 Tỷ lệ phạt (6/2024)"));
        assert_eq!(report.lines().count(), 5);
    }

    #[test]
    fn test_no_check_in_sorts_last_regardless_of_magnitude() {
        let details = vec![
            detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 100.0, 100.0),
            detail("Late", 1.0, 0.0),
            detail("EarlyLeave", 0.0, 2.0),
        ];
        assert_eq!(
            order(&details),
            vec!["Late", "EarlyLeave", NO_CHECK_IN_AND_NO_CHECK_OUT]
        );
    }

    #[test]
    fn test_user_then_company_descending() {
        let details = vec![
            detail("A", 10.0, 5.0),
            detail("B", 30.0, 1.0),
            detail("C", 10.0, 40.0),
        ];
        assert_eq!(order(&details), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let details = vec![
            detail("First", 10.0, 10.0),
            detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 5.0, 5.0),
            detail("Second", 10.0, 10.0),
            detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 5.0, 5.0),
        ];
        let sorted = significant_details(&details);
        assert!(std::ptr::eq(sorted[0], &details[0]));
        assert!(std::ptr::eq(sorted[1], &details[2]));
        assert!(std::ptr::eq(sorted[2], &details[1]));
        assert!(std::ptr::eq(sorted[3], &details[3]));
    }

    #[test]
    fn test_two_no_check_in_entries_order_by_user_share() {
        let details = vec![
            detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 5.0, 50.0),
            detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 60.0, 1.0),
        ];
        let sorted = significant_details(&details);
        assert!((sorted[0].user_bar_percentage - 60.0).abs() < f64::EPSILON);
        assert!((sorted[1].user_bar_percentage - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_shares_sort_without_panicking() {
        let mut details: Vec<PunishmentDetail> = (0..64)
            .map(|i| {
                let user = if i % 3 == 0 { f64::NAN } else { f64::from(i) };
                let company = if i % 5 == 0 { f64::NAN } else { 1.0 };
                detail(&format!("Kind{i}"), user, company)
            })
            .collect();
        details.insert(7, detail(NO_CHECK_IN_AND_NO_CHECK_OUT, 99.0, 99.0));

        let report = format_comparison(&comparison(details.clone()));
        assert!(report.contains("NoCheckInAndNoCheckOut:"));

        let sorted = significant_details(&details);
        assert!(sorted.last().is_some_and(|d| d.is_no_check_in_and_no_check_out()));

        let ordinary = &sorted[..sorted.len() - 1];
        let first_nan = ordinary
            .iter()
            .position(|d| d.user_bar_percentage.is_nan())
            .unwrap_or(ordinary.len());
        assert!(ordinary[first_nan..].iter().all(|d| d.user_bar_percentage.is_nan()));
        assert!(
            ordinary[..first_nan]
                .windows(2)
                .all(|w| w[0].user_bar_percentage >= w[1].user_bar_percentage)
        );
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let details = vec![detail("First", -0.0, 5.0), detail("Second", 0.0, 5.0)];
        assert_eq!(order(&details), vec!["First", "Second"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let data = comparison(vec![detail("Low", 1.0, 1.0), detail("High", 90.0, 1.0)]);
        let before = data.clone();
        let _ = format_comparison(&data);
        assert_eq!(data, before);
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let data = comparison(vec![
            detail("Late", 33.3, 12.5),
            detail("Absent", 12.5, 33.3),
        ]);
        assert_eq!(format_comparison(&data), format_comparison(&data));
    }

    #[test]
    fn test_filled_cells_is_monotonic_and_bounded() {
        let mut previous = 0;
        for percent in 0..=100 {
            let cells = filled_cells(percent);
            assert!(cells >= previous, "cells dropped at {percent}%");
            assert!(cells <= BAR_WIDTH);
            previous = cells;
        }
        assert_eq!(filled_cells(0), 0);
        assert_eq!(filled_cells(100), BAR_WIDTH);
    }

    #[test]
    fn test_over_hundred_is_clipped_but_labelled_truthfully() {
        let data = PunishmentComparison {
            total_bar_percentage: TotalBarPercentage {
                user: 250.0,
                company: -20.0,
            },
            ..comparison(Vec::new())
        };
        let report = format_comparison(&data);
        assert!(report.contains("- Bạn         [████████████████] 250%"));
        assert!(report.contains("- Công ty  [                ] -20%"));
    }

    #[test]
    fn test_label_and_bar_use_the_same_rounding() {
        // 49.6 rounds to 50, which fills exactly half the bar
        assert_eq!(rounded_percent(49.6), 50);
        assert_eq!(render_bar(rounded_percent(49.6)), render_bar(50));
        assert_eq!(rounded_percent(2.5), 3);
        assert_eq!(rounded_percent(f64::NAN), 0);
    }

    #[test]
    fn test_render_bar_width() {
        for percent in [-10, 0, 7, 50, 100, 400] {
            assert_eq!(render_bar(percent).chars().count(), BAR_WIDTH);
        }
    }
}
