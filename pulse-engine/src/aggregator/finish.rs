//! Final pass: derived scalars, bucket finalisation, ordering

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use shared::models::{
    CarrierStats, CustomerAnalysis, LocationStats, LoyaltyStats, MetricResult, ProductStats,
    PurchaseHistory, PurchasedProduct, ReturnDetail, ReturnedProduct, RevenueTrend, RiskStats,
    ShippingTrend, StatusCount,
};

use super::{Accumulator, DayReturns, DaySales, ShipAcc};
use crate::dates::{day_key, parse_loose};
use crate::money::{count_rate, percent_of, ratio, to_decimal, to_f64};

/// Provinces listed in the risk block
const TOP_RETURN_PROVINCES: usize = 5;

/// The money figures every level (global, per day) derives the same way
struct Derived {
    draft_net: Decimal,
    return_impact: Decimal,
    actual_net: Decimal,
    aov: Decimal,
    fee_rate: f64,
    subsidy_rate: f64,
    margin_pre_cogs: f64,
}

impl Derived {
    fn compute(
        gmv: Decimal,
        subsidies: Decimal,
        fees: Decimal,
        return_value: Decimal,
        return_fees: Decimal,
        orders: u64,
    ) -> Self {
        let draft_net = gmv - subsidies - fees;
        let return_impact = return_value + return_fees;
        let actual_net = draft_net - return_impact;
        Self {
            draft_net,
            return_impact,
            actual_net,
            aov: ratio(gmv, Decimal::from(orders)),
            fee_rate: percent_of(fees, gmv),
            subsidy_rate: percent_of(subsidies, gmv),
            margin_pre_cogs: percent_of(actual_net, gmv),
        }
    }
}

impl<'a> Accumulator<'a> {
    pub(crate) fn finish(self) -> MetricResult {
        let t = &self.totals;
        let total_orders = self.sales_orders.len() as u64;
        let derived = Derived::compute(t.gmv, t.subsidies, t.fees, t.return_value, t.return_fees, total_orders);

        let ad_expense = self.query.ad_expense.map(to_decimal);
        let ad_cost_rate = ad_expense.map_or(0.0, |ad| percent_of(ad, t.gmv));

        let customer_analysis = self.customer_analysis();
        let location_stats = self.location_stats();
        let shipping_trend = shipping_trend(&self.ship_days);
        let carrier_stats = self.carrier_stats();

        let loyalty = loyalty(&customer_analysis);
        let risk = self.risk(&location_stats);

        MetricResult {
            total_gmv: to_f64(t.gmv),
            total_shop_subsidies: to_f64(t.subsidies),
            total_platform_fees: to_f64(t.fees),
            total_shopee_rebate: to_f64(t.shopee_rebate),
            total_draft_net: to_f64(derived.draft_net),
            total_orders,
            total_items_sold: t.items_sold,
            aov: to_f64(derived.aov),

            total_return_value: to_f64(t.return_value),
            total_return_fees: to_f64(t.return_fees),
            total_return_impact: to_f64(derived.return_impact),
            total_items_returned: t.items_returned,
            total_actual_net: to_f64(derived.actual_net),

            total_estimated_cogs: to_f64(t.cogs),
            estimated_gross_profit: to_f64(derived.actual_net - t.cogs),

            platform_fee_rate: derived.fee_rate,
            shop_subsidy_rate: derived.subsidy_rate,
            margin_pre_cogs: derived.margin_pre_cogs,

            ad_expense: ad_expense.map_or(0.0, to_f64),
            ad_cost_rate,
            margin_before_ads: 0.0,
            final_net_margin: 0.0,

            completed_orders: self.completed.len() as u64,
            canceled_orders: self.cancelled.len() as u64,
            returned_orders_count: self.returned.len() as u64,

            revenue_trend: revenue_trend(&self.sales_days, &self.return_days),
            shipping_trend,
            product_performance: self.product_performance(),
            customer_analysis,
            location_stats,
            carrier_stats,
            status_breakdown: self.status_breakdown(),
            return_details: self.return_details(),

            loyalty,
            risk,
            fee_alerts: self.fee_alerts,
        }
    }

    fn product_performance(&self) -> Vec<ProductStats> {
        let mut products: Vec<ProductStats> = self
            .products
            .iter()
            .map(|(sku, p)| ProductStats {
                sku: sku.to_string(),
                product_name: p.name.to_string(),
                orders: p.orders,
                quantity_sold: p.quantity_sold,
                return_quantity: p.return_quantity,
                net_quantity: p.quantity_sold - p.return_quantity,
                gmv: to_f64(p.gmv),
                net_revenue: to_f64(p.net_revenue),
                estimated_cogs: to_f64(p.cogs),
                gross_profit: to_f64(p.net_revenue - p.cogs),
                return_value: to_f64(p.return_value),
            })
            .collect();
        products.sort_by(|a, b| desc(a.gmv, b.gmv).then_with(|| a.sku.cmp(&b.sku)));
        products
    }

    fn customer_analysis(&self) -> Vec<CustomerAnalysis> {
        let mut customers: Vec<(Decimal, CustomerAnalysis)> = self
            .customers
            .iter()
            .map(|(id, c)| {
                let history = c
                    .history
                    .iter()
                    .map(|h| PurchaseHistory {
                        order_id: h.order_id.to_string(),
                        date: h.date.to_string(),
                        total: to_f64(h.total),
                        products: h
                            .products
                            .iter()
                            .map(|l| PurchasedProduct {
                                sku: l.sku.to_string(),
                                name: l.name.to_string(),
                                quantity: l.quantity,
                                amount: to_f64(l.amount),
                            })
                            .collect(),
                    })
                    .collect();
                let analysis = CustomerAnalysis {
                    customer_id: id.to_string(),
                    receiver_name: c.receiver_name.to_string(),
                    phone_number: c.phone_number.to_string(),
                    province: c.province.to_string(),
                    order_count: c.history.len() as u64,
                    total_spent: to_f64(c.total_spent),
                    last_order_date: c.last_order_date.to_string(),
                    history,
                };
                (c.total_spent, analysis)
            })
            .collect();
        customers.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.customer_id.cmp(&b.customer_id)));
        customers.into_iter().map(|(_, c)| c).collect()
    }

    fn location_stats(&self) -> Vec<LocationStats> {
        let mut locations: Vec<LocationStats> = self
            .locations
            .iter()
            .map(|(province, l)| LocationStats {
                province: province.to_string(),
                orders: l.orders,
                gmv: to_f64(l.gmv),
                returned_orders: l.returned_orders,
                return_value: to_f64(l.return_value),
                return_rate: count_rate(l.returned_orders, l.orders),
            })
            .collect();
        locations.sort_by(|a, b| desc(a.gmv, b.gmv).then_with(|| a.province.cmp(&b.province)));
        locations
    }

    fn carrier_stats(&self) -> Vec<CarrierStats> {
        let mut carriers: Vec<CarrierStats> = self
            .carriers
            .iter()
            .map(|(carrier, s)| CarrierStats {
                carrier: carrier.to_string(),
                orders: s.orders,
                total_ship_days: round2(s.total_days),
                avg_ship_days: avg_days(s),
                slow_orders: s.slow,
            })
            .collect();
        carriers.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.carrier.cmp(&b.carrier)));
        carriers
    }

    fn status_breakdown(&self) -> Vec<StatusCount> {
        let mut statuses: Vec<StatusCount> = self
            .status_counts
            .iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count: *count,
            })
            .collect();
        statuses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));
        statuses
    }

    fn return_details(&self) -> Vec<ReturnDetail> {
        let mut details: Vec<(Option<NaiveDateTime>, ReturnDetail)> = self
            .return_details
            .iter()
            .map(|(order_id, r)| {
                let detail = ReturnDetail {
                    order_id: order_id.to_string(),
                    return_status: r.return_status.to_string(),
                    update_time: r.update_time.to_string(),
                    customer_id: r.customer_id.to_string(),
                    province: r.province.to_string(),
                    return_value: to_f64(r.value),
                    return_fee: to_f64(r.fee),
                    products: r
                        .products
                        .iter()
                        .map(|l| ReturnedProduct {
                            sku: l.sku.to_string(),
                            name: l.name.to_string(),
                            quantity: l.quantity,
                            value: to_f64(l.amount),
                        })
                        .collect(),
                };
                (parse_loose(r.update_time), detail)
            })
            .collect();
        // Newest first
        details.sort_by(|(ta, a), (tb, b)| tb.cmp(ta).then_with(|| a.order_id.cmp(&b.order_id)));
        details.into_iter().map(|(_, d)| d).collect()
    }

    fn risk(&self, locations: &[LocationStats]) -> RiskStats {
        let unique_orders = self.unique_orders.len() as u64;
        let shipped_orders: u64 = self.carriers.values().map(|s| s.orders).sum();
        let slow_delivery_count: u64 = self.carriers.values().map(|s| s.slow).sum();

        let mut by_returns: Vec<&LocationStats> = locations.iter().filter(|l| l.returned_orders > 0).collect();
        by_returns.sort_by(|a, b| {
            b.returned_orders
                .cmp(&a.returned_orders)
                .then_with(|| a.province.cmp(&b.province))
        });

        RiskStats {
            unique_orders,
            cancel_rate: count_rate(self.cancelled.len() as u64, unique_orders),
            return_rate: count_rate(self.returned.len() as u64, unique_orders),
            shipped_orders,
            slow_delivery_count,
            slow_delivery_rate: count_rate(slow_delivery_count, shipped_orders),
            fee_alert_count: self.fee_alerts.len() as u64,
            top_return_provinces: by_returns
                .into_iter()
                .take(TOP_RETURN_PROVINCES)
                .map(|l| l.province.clone())
                .collect(),
        }
    }
}

/// Union of sales days and return days, each day finalised on its own
fn revenue_trend(
    sales: &BTreeMap<NaiveDate, DaySales>,
    returns: &BTreeMap<NaiveDate, DayReturns>,
) -> Vec<RevenueTrend> {
    let empty_sales = DaySales::default();
    let empty_returns = DayReturns::default();

    let mut days: Vec<NaiveDate> = sales.keys().chain(returns.keys()).copied().collect();
    days.sort_unstable();
    days.dedup();

    days.into_iter()
        .map(|day| {
            let s = sales.get(&day).unwrap_or(&empty_sales);
            let r = returns.get(&day).unwrap_or(&empty_returns);
            let d = Derived::compute(s.gmv, s.subsidies, s.fees, r.value, r.fees, s.orders);
            RevenueTrend {
                date: day_key(day),
                gmv: to_f64(s.gmv),
                subsidies: to_f64(s.subsidies),
                fees: to_f64(s.fees),
                orders: s.orders,
                items_sold: s.items_sold,
                return_value: to_f64(r.value),
                return_fees: to_f64(r.fees),
                returned_orders: r.orders,
                draft_net: to_f64(d.draft_net),
                return_impact: to_f64(d.return_impact),
                actual_net: to_f64(d.actual_net),
                aov: to_f64(d.aov),
                fee_rate: d.fee_rate,
                subsidy_rate: d.subsidy_rate,
                margin_pre_cogs: d.margin_pre_cogs,
            }
        })
        .collect()
}

fn shipping_trend(days: &BTreeMap<NaiveDate, ShipAcc>) -> Vec<ShippingTrend> {
    days.iter()
        .map(|(day, s)| ShippingTrend {
            date: day_key(*day),
            shipped_orders: s.orders,
            avg_ship_days: avg_days(s),
            slow_orders: s.slow,
        })
        .collect()
}

fn loyalty(customers: &[CustomerAnalysis]) -> LoyaltyStats {
    let total_customers = customers.len() as u64;
    let returning_customers = customers.iter().filter(|c| c.order_count > 1).count() as u64;
    LoyaltyStats {
        total_customers,
        returning_customers,
        new_customers: total_customers - returning_customers,
        repeat_rate: count_rate(returning_customers, total_customers),
    }
}

fn avg_days(s: &ShipAcc) -> f64 {
    if s.orders == 0 {
        0.0
    } else {
        round2(s.total_days / s.orders as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Descending order for already-rounded f64 figures
fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
