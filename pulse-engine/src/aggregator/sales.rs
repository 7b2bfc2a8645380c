//! Sales bucket: payout date in window, order not cancelled

use shared::models::OrderRecord;

use super::{Accumulator, CustomerAcc, HistoryAcc, LineAcc, label_or_unknown};
use crate::dates::parse_loose;
use crate::money::LineAmounts;

impl<'a> Accumulator<'a> {
    pub(super) fn reduce_sale(&mut self, record: &'a OrderRecord) {
        if record.is_cancelled() {
            return;
        }
        let Some(paid_at) = parse_loose(&record.payout_date) else {
            return;
        };
        if !self.query.window.contains(&paid_at) {
            return;
        }

        let order_id = record.order_id.trim();
        let line = LineAmounts::of(record);
        let quantity = line.units;
        let cogs = line.cogs(self.settings.cogs_rate());
        let draft_net = line.draft_net();

        let totals = &mut self.totals;
        totals.gmv += line.gmv;
        totals.subsidies += line.subsidies;
        totals.fees += line.fees;
        totals.shopee_rebate += line.shopee_rebate;
        totals.cogs += cogs;
        totals.items_sold += quantity;
        self.sales_orders.mark_seen_once(order_id);

        // Day bucket keyed by payout date
        let day = paid_at.date();
        let new_day_order = self.sales_day_orders.mark_seen_once((day, order_id));
        let bucket = self.sales_days.entry(day).or_default();
        bucket.gmv += line.gmv;
        bucket.subsidies += line.subsidies;
        bucket.fees += line.fees;
        bucket.items_sold += quantity;
        if new_day_order {
            bucket.orders += 1;
        }

        let province = label_or_unknown(&record.province);
        let new_location_order = self.location_orders.mark_seen_once((province, order_id));
        let location = self.locations.entry(province).or_default();
        location.gmv += line.gmv;
        if new_location_order {
            location.orders += 1;
        }

        let sku = record.sku_key();
        let new_product_order = self.product_orders.mark_seen_once((sku, order_id));
        let product = self.products.entry(sku).or_default();
        if product.name.is_empty() {
            product.name = record.product_name.trim();
        }
        product.quantity_sold += quantity;
        product.gmv += line.gmv;
        product.net_revenue += draft_net;
        product.cogs += cogs;
        if new_product_order {
            product.orders += 1;
        }

        self.add_purchase(record, order_id, sku, quantity, line);
    }

    fn add_purchase(
        &mut self,
        record: &'a OrderRecord,
        order_id: &'a str,
        sku: &'a str,
        quantity: i64,
        line: LineAmounts,
    ) {
        let customer = self.customers.entry(record.customer_key()).or_default();
        fill_blank(&mut customer.receiver_name, &record.receiver_name);
        fill_blank(&mut customer.phone_number, &record.phone_number);
        fill_blank(&mut customer.province, &record.province);

        let date = if record.order_date.trim().is_empty() {
            record.payout_date.trim()
        } else {
            record.order_date.trim()
        };
        if date > customer.last_order_date {
            customer.last_order_date = date;
        }
        customer.total_spent += line.deal_value;

        let entry = history_entry(customer, order_id, date);
        entry.total += line.deal_value;
        entry.products.push(LineAcc {
            sku,
            name: record.product_name.trim(),
            quantity,
            amount: line.deal_value,
        });
    }
}

/// History entry of `order_id`; sibling line items share one entry
fn history_entry<'c, 'a>(customer: &'c mut CustomerAcc<'a>, order_id: &'a str, date: &'a str) -> &'c mut HistoryAcc<'a> {
    let index = match customer.history.iter().position(|h| h.order_id == order_id) {
        Some(index) => index,
        None => {
            customer.history.push(HistoryAcc {
                order_id,
                date,
                total: Default::default(),
                products: Vec::new(),
            });
            customer.history.len() - 1
        }
    };
    &mut customer.history[index]
}

fn fill_blank<'a>(slot: &mut &'a str, value: &'a str) {
    if slot.is_empty() {
        *slot = value.trim();
    }
}
