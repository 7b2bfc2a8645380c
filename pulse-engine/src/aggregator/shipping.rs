//! Carrier performance and shipping trend

use shared::models::OrderRecord;

use super::Accumulator;
use crate::dates::parse_loose;

const SECONDS_PER_DAY: f64 = 86_400.0;

impl<'a> Accumulator<'a> {
    pub(super) fn reduce_shipping(&mut self, record: &'a OrderRecord) {
        let carrier = record.delivery_carrier.trim();
        if carrier.is_empty() {
            return;
        }
        let (Some(shipped), Some(completed)) = (parse_loose(&record.ship_time), parse_loose(&record.complete_date))
        else {
            return;
        };
        if completed < shipped {
            return;
        }
        // Sibling line items describe the same parcel
        if !self.carrier_orders.mark_seen_once((carrier, record.order_id.trim())) {
            return;
        }

        let days = (completed - shipped).num_seconds() as f64 / SECONDS_PER_DAY;
        let slow = days > self.settings.slow_delivery_days;

        for acc in [
            self.carriers.entry(carrier).or_default(),
            self.ship_days.entry(shipped.date()).or_default(),
        ] {
            acc.orders += 1;
            acc.total_days += days;
            if slow {
                acc.slow += 1;
            }
        }
    }
}
