//! Return bucket: return state set, update time in window, order not cancelled
//!
//! Return days are keyed by `update_time`, never by the payout date.

use shared::models::OrderRecord;

use super::{Accumulator, LineAcc, label_or_unknown};
use crate::dates::parse_loose;
use crate::money::ReturnAmounts;

impl<'a> Accumulator<'a> {
    pub(super) fn reduce_return(&mut self, record: &'a OrderRecord) {
        if !record.has_return() || record.is_cancelled() {
            return;
        }
        let Some(updated_at) = parse_loose(&record.update_time) else {
            return;
        };
        if !self.query.window.contains(&updated_at) {
            return;
        }

        let order_id = record.order_id.trim();
        let ret = ReturnAmounts::of(record);

        self.totals.return_value += ret.value;
        self.totals.return_fees += ret.shipping_fee;
        self.totals.items_returned += ret.units;

        let day = updated_at.date();
        let new_day_order = self.return_day_orders.mark_seen_once((day, order_id));
        let bucket = self.return_days.entry(day).or_default();
        bucket.value += ret.value;
        bucket.fees += ret.shipping_fee;
        if new_day_order {
            bucket.orders += 1;
        }

        let province = label_or_unknown(&record.province);
        let new_location_order = self.return_location_orders.mark_seen_once((province, order_id));
        let location = self.locations.entry(province).or_default();
        location.return_value += ret.value;
        if new_location_order {
            location.returned_orders += 1;
        }

        let sku = record.sku_key();
        let product = self.products.entry(sku).or_default();
        if product.name.is_empty() {
            product.name = record.product_name.trim();
        }
        product.return_quantity += ret.units;
        product.return_value += ret.value;

        let detail = self.return_details.entry(order_id).or_default();
        if detail.products.is_empty() {
            detail.return_status = record.return_status.trim();
            detail.update_time = record.update_time.trim();
            detail.customer_id = record.customer_key();
            detail.province = province;
        }
        detail.value += ret.value;
        detail.fee += ret.shipping_fee;
        detail.products.push(LineAcc {
            sku,
            name: record.product_name.trim(),
            quantity: ret.units,
            amount: ret.value,
        });
    }
}
