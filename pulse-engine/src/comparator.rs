//! Period-over-Period Comparator
//!
//! Runs the aggregator on a window and on the immediately preceding window
//! of the same length, then expresses each headline figure as a change.

use chrono::{Days, NaiveDate};
use shared::models::{Comparison, ComparisonDeltas, Direction, MetricResult, OrderRecord, PeriodComparison};

use crate::aggregator::{MetricsQuery, aggregate};
use crate::dates::{DateWindow, day_key};
use crate::error::{EngineError, EngineResult};
use crate::filter::PeriodFilter;
use crate::settings::EngineSettings;

/// Window of identical day count ending the day before `start`
pub fn previous_window(start: NaiveDate, end: NaiveDate) -> EngineResult<(NaiveDate, NaiveDate)> {
    DateWindow::between(start, end)?;
    let day_count = (end - start).num_days() as u64 + 1;

    let out_of_range = || EngineError::InvalidWindow {
        start: start.to_string(),
        end: end.to_string(),
    };
    let prev_end = start.checked_sub_days(Days::new(1)).ok_or_else(out_of_range)?;
    let prev_start = prev_end
        .checked_sub_days(Days::new(day_count - 1))
        .ok_or_else(out_of_range)?;
    Ok((prev_start, prev_end))
}

/// `|current - previous| / |previous| × 100`, signed by direction
///
/// A zero baseline has no meaningful percentage and yields
/// [`Comparison::NoComparison`].
pub fn percent_change(current: f64, previous: f64) -> Comparison {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return Comparison::NoComparison;
    }
    let percent = ((current - previous).abs() / previous.abs() * 100.0 * 100.0).round() / 100.0;
    let direction = if current > previous {
        Direction::Up
    } else if current < previous {
        Direction::Down
    } else {
        Direction::Flat
    };
    Comparison::Change { percent, direction }
}

fn no_deltas() -> ComparisonDeltas {
    ComparisonDeltas {
        gmv: Comparison::NoComparison,
        draft_net: Comparison::NoComparison,
        actual_net: Comparison::NoComparison,
        total_orders: Comparison::NoComparison,
        aov: Comparison::NoComparison,
        return_impact: Comparison::NoComparison,
        platform_fees: Comparison::NoComparison,
        shop_subsidies: Comparison::NoComparison,
    }
}

fn deltas_between(current: &MetricResult, previous: &MetricResult) -> ComparisonDeltas {
    ComparisonDeltas {
        gmv: percent_change(current.total_gmv, previous.total_gmv),
        draft_net: percent_change(current.total_draft_net, previous.total_draft_net),
        actual_net: percent_change(current.total_actual_net, previous.total_actual_net),
        total_orders: percent_change(current.total_orders as f64, previous.total_orders as f64),
        aov: percent_change(current.aov, previous.aov),
        return_impact: percent_change(current.total_return_impact, previous.total_return_impact),
        platform_fees: percent_change(current.total_platform_fees, previous.total_platform_fees),
        shop_subsidies: percent_change(current.total_shop_subsidies, previous.total_shop_subsidies),
    }
}

/// Compare `[start, end]` with the preceding window of equal length
///
/// Either side selecting no orders turns every delta into
/// [`Comparison::NoComparison`].
pub fn compare_periods(
    orders: &[OrderRecord],
    start: NaiveDate,
    end: NaiveDate,
    warehouse: Option<&str>,
    ad_expense: Option<f64>,
    settings: &EngineSettings,
) -> EngineResult<PeriodComparison> {
    let (prev_start, prev_end) = previous_window(start, end)?;

    let run = |window: DateWindow| {
        let selected = PeriodFilter::new(window, warehouse).apply(orders);
        let query = MetricsQuery { window, ad_expense };
        let result = aggregate(selected.iter().copied(), &query, settings);
        (selected.is_empty(), result)
    };
    let (current_empty, current) = run(DateWindow::between(start, end)?);
    let (previous_empty, previous) = run(DateWindow::between(prev_start, prev_end)?);

    let deltas = if current_empty || previous_empty {
        no_deltas()
    } else {
        deltas_between(&current, &previous)
    };

    Ok(PeriodComparison {
        current_start: day_key(start),
        current_end: day_key(end),
        previous_start: day_key(prev_start),
        previous_end: day_key(prev_end),
        current,
        previous,
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn previous_window_has_same_length() {
        assert_eq!(
            previous_window(ymd(2024, 5, 8), ymd(2024, 5, 14)).unwrap(),
            (ymd(2024, 5, 1), ymd(2024, 5, 7))
        );
        // Single day
        assert_eq!(
            previous_window(ymd(2024, 3, 1), ymd(2024, 3, 1)).unwrap(),
            (ymd(2024, 2, 29), ymd(2024, 2, 29))
        );
        // Whole month crosses into the previous one
        assert_eq!(
            previous_window(ymd(2024, 3, 1), ymd(2024, 3, 31)).unwrap(),
            (ymd(2024, 1, 30), ymd(2024, 2, 29))
        );
        assert!(previous_window(ymd(2024, 3, 2), ymd(2024, 3, 1)).is_err());
    }

    #[test]
    fn percent_change_direction_and_zero_baseline() {
        assert_eq!(
            percent_change(150.0, 100.0),
            Comparison::Change {
                percent: 50.0,
                direction: Direction::Up
            }
        );
        assert_eq!(
            percent_change(75.0, 100.0),
            Comparison::Change {
                percent: 25.0,
                direction: Direction::Down
            }
        );
        assert_eq!(
            percent_change(100.0, 100.0),
            Comparison::Change {
                percent: 0.0,
                direction: Direction::Flat
            }
        );
        assert_eq!(percent_change(100.0, 0.0), Comparison::NoComparison);
        assert_eq!(percent_change(0.0, 0.0), Comparison::NoComparison);
    }

    #[test]
    fn negative_baseline_uses_magnitude() {
        assert_eq!(
            percent_change(-50.0, -100.0),
            Comparison::Change {
                percent: 50.0,
                direction: Direction::Up
            }
        );
    }
}
