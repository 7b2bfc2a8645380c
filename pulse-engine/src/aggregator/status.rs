//! Whole-slice reducers: status breakdown, order classification, fee alerts

use shared::models::{FeeAlert, FeeAlertCause, OrderRecord};

use super::{Accumulator, label_or_unknown};
use crate::money::{LineAmounts, ratio, to_f64};

impl<'a> Accumulator<'a> {
    /// Status breakdown and completed/cancelled/returned classification
    ///
    /// Ungated: these describe whole orders, not period sums.
    pub(super) fn reduce_status(&mut self, record: &'a OrderRecord) {
        let order_id = record.order_id.trim();
        self.unique_orders.mark_seen_once(order_id);

        let status = label_or_unknown(&record.order_status);
        if self.status_seen.mark_seen_once((order_id, status)) {
            *self.status_counts.entry(status).or_default() += 1;
        }

        if record.is_cancelled() {
            self.cancelled.mark_seen_once(order_id);
        } else {
            if record.is_completed() {
                self.completed.mark_seen_once(order_id);
            }
            if record.has_return() {
                self.returned.mark_seen_once(order_id);
            }
        }
    }

    /// Flag line items whose fees and vouchers eat most of their GMV
    pub(super) fn reduce_fee_alert(&mut self, record: &'a OrderRecord) {
        let line = LineAmounts::of(record);
        if line.gmv <= rust_decimal::Decimal::ZERO {
            return;
        }
        let cost_ratio = ratio(line.alert_cost, line.gmv);
        if cost_ratio <= self.settings.alert_ratio() {
            return;
        }
        let cause = if ratio(line.fixed_fee, line.gmv) > self.settings.fixed_fee_share() {
            FeeAlertCause::LowPriceFixedFee
        } else {
            FeeAlertCause::HeavyFeesAndVouchers
        };
        self.fee_alerts.push(FeeAlert {
            order_id: record.order_id.clone(),
            sku: record.sku_key().to_string(),
            product_name: record.product_name.clone(),
            gmv: to_f64(line.gmv),
            total_cost: to_f64(line.alert_cost),
            ratio: to_f64(cost_ratio * rust_decimal::Decimal::ONE_HUNDRED),
            cause,
            label: cause.label().to_string(),
        });
    }
}
