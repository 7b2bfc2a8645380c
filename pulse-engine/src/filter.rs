//! Period Filter
//!
//! Selects the records relevant to a reporting window and warehouse. A record
//! is in the window when it was paid out in-window (sale path) or when its
//! return was processed in-window (return path).

use chrono::NaiveDate;
use shared::models::OrderRecord;

use crate::dates::DateWindow;
use crate::error::EngineResult;

/// Warehouse sentinel meaning "no warehouse restriction"
pub const ALL_WAREHOUSES: &str = "All";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodFilter {
    window: DateWindow,
    warehouse: Option<String>,
}

impl PeriodFilter {
    pub fn new(window: DateWindow, warehouse: Option<&str>) -> Self {
        let warehouse = warehouse
            .map(str::trim)
            .filter(|w| !w.is_empty() && !w.eq_ignore_ascii_case(ALL_WAREHOUSES))
            .map(str::to_string);
        Self { window, warehouse }
    }

    pub fn from_dates(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        warehouse: Option<&str>,
    ) -> EngineResult<Self> {
        Ok(Self::new(DateWindow::new(start, end)?, warehouse))
    }

    /// Parse caller-supplied bounds; bad bounds are a call-contract error
    pub fn from_strs(start: Option<&str>, end: Option<&str>, warehouse: Option<&str>) -> EngineResult<Self> {
        Ok(Self::new(DateWindow::from_strs(start, end)?, warehouse))
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn warehouse(&self) -> Option<&str> {
        self.warehouse.as_deref()
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        if let Some(warehouse) = &self.warehouse {
            if record.warehouse_name.trim() != warehouse {
                return false;
            }
        }
        if self.window.is_unrestricted() {
            return true;
        }
        self.window.contains_raw(&record.payout_date)
            || (record.has_return() && self.window.contains_raw(&record.update_time))
    }

    /// Borrowing filter; the input slice is left untouched
    pub fn apply<'a, I>(&self, orders: I) -> Vec<&'a OrderRecord>
    where
        I: IntoIterator<Item = &'a OrderRecord>,
    {
        let selected: Vec<&OrderRecord> = orders.into_iter().filter(|r| self.matches(r)).collect();
        tracing::debug!(
            selected = selected.len(),
            warehouse = ?self.warehouse,
            "Period filter applied"
        );
        selected
    }
}

/// One-shot form of [`PeriodFilter::apply`]
pub fn filter_orders<'a>(
    orders: &'a [OrderRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    warehouse: Option<&str>,
) -> EngineResult<Vec<&'a OrderRecord>> {
    Ok(PeriodFilter::from_dates(start, end, warehouse)?.apply(orders))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, payout: &str, update: &str, return_status: &str, warehouse: &str) -> OrderRecord {
        OrderRecord {
            order_id: id.into(),
            payout_date: payout.into(),
            update_time: update.into(),
            return_status: return_status.into(),
            warehouse_name: warehouse.into(),
            quantity: 1,
            ..Default::default()
        }
    }

    fn ids(selected: &[&OrderRecord]) -> Vec<String> {
        selected.iter().map(|r| r.order_id.clone()).collect()
    }

    fn may() -> PeriodFilter {
        PeriodFilter::from_strs(Some("2024-05-01"), Some("2024-05-31"), None).unwrap()
    }

    #[test]
    fn no_dates_keeps_everything() {
        let orders = vec![
            record("A", "", "", "", "HN"),
            record("B", "garbage", "", "", "HCM"),
        ];
        let filter = PeriodFilter::from_strs(None, None, None).unwrap();
        assert_eq!(filter.apply(&orders).len(), 2);
    }

    #[test]
    fn warehouse_all_is_sentinel() {
        let orders = vec![record("A", "", "", "", "HN"), record("B", "", "", "", "HCM")];
        assert_eq!(PeriodFilter::new(DateWindow::unbounded(), Some("all")).apply(&orders).len(), 2);
        assert_eq!(PeriodFilter::new(DateWindow::unbounded(), Some("")).apply(&orders).len(), 2);
        assert_eq!(
            ids(&PeriodFilter::new(DateWindow::unbounded(), Some("HCM")).apply(&orders)),
            vec!["B"]
        );
    }

    #[test]
    fn sale_path_and_return_path() {
        let orders = vec![
            // paid out in window
            record("SALE", "2024-05-10", "", "", ""),
            // sold in April, return processed in May
            record("RET", "2024-04-20", "2024-05-03 10:00", "Refunded", ""),
            // update in window but no return state
            record("NORET", "2024-04-20", "2024-05-03", "", ""),
            // unparseable payout date
            record("BAD", "soon", "", "", ""),
            // last second of the end day
            record("EDGE", "31/05/2024 23:59:59", "", "", ""),
            record("LATE", "2024-06-01", "", "", ""),
        ];
        assert_eq!(ids(&may().apply(&orders)), vec!["SALE", "RET", "EDGE"]);
    }

    #[test]
    fn warehouse_and_window_combine() {
        let orders = vec![
            record("A", "2024-05-10", "", "", "HN"),
            record("B", "2024-05-10", "", "", "HCM"),
        ];
        let filter = PeriodFilter::from_strs(Some("2024-05-01"), None, Some("HN")).unwrap();
        assert_eq!(ids(&filter.apply(&orders)), vec!["A"]);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(PeriodFilter::from_strs(Some("2024-05-31"), Some("2024-05-01"), None).is_err());
    }
}
