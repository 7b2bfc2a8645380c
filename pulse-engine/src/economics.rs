//! Order/SKU Economics Calculator
//!
//! Line-level profit with a flat COGS proxy (`assumed_cogs_rate` × GMV),
//! rolled up per SKU and per order, then ranked for Pareto and portfolio
//! statistics. Cancelled orders are skipped entirely.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use shared::models::{
    EconomicsReport, OrderEconomics, OrderRecord, ParetoItem, PortfolioSummary, SkuBadge, SkuEconomics,
};

use crate::dedup::SeenSet;
use crate::money::{LineAmounts, cents, count_rate, percent_of, percent_ratio, to_f64};
use crate::settings::EngineSettings;

/// Badge thresholds on SKU margin (percent)
const KILL_LIST_BELOW: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const RISK_BELOW: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
const HERO_ABOVE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Share of the SKU count (1 / N) that forms the Pareto head
const PARETO_HEAD_DIVISOR: usize = 5;

/// First match wins
pub fn badge_for_margin(margin: Decimal) -> SkuBadge {
    if margin < KILL_LIST_BELOW {
        SkuBadge::KillList
    } else if margin < RISK_BELOW {
        SkuBadge::Risk
    } else if margin > HERO_ABOVE {
        SkuBadge::Hero
    } else {
        SkuBadge::Ok
    }
}

/// Number of SKUs flagged `is_top20`: `floor(0.2 × sku_count)`
pub fn pareto_head_len(sku_count: usize) -> usize {
    sku_count / PARETO_HEAD_DIVISOR
}

#[derive(Debug, Default)]
struct SkuAcc<'a> {
    name: &'a str,
    quantity: i64,
    orders: u64,
    proceeds: Decimal,
    net_revenue: Decimal,
    cogs: Decimal,
    fees: Decimal,
    subsidy: Decimal,
    profit: Decimal,
}

#[derive(Debug, Default)]
struct OrderAcc {
    line_items: u64,
    list_price: Decimal,
    proceeds: Decimal,
    cogs: Decimal,
    fees: Decimal,
    subsidy: Decimal,
    profit: Decimal,
}

/// Derived per-order view
struct OrderFigures {
    discount_pct: Decimal,
    breach: bool,
    breach_impact: Decimal,
}

impl OrderAcc {
    fn figures(&self, guardrail_pct: Decimal) -> OrderFigures {
        if self.list_price.is_zero() {
            return OrderFigures {
                discount_pct: Decimal::ZERO,
                breach: false,
                breach_impact: Decimal::ZERO,
            };
        }
        let discount_pct = percent_ratio(self.list_price - self.proceeds, self.list_price);
        let breach = discount_pct > guardrail_pct;
        // Discount given beyond what the capped discount would have allowed
        let breach_impact = if breach {
            cents(self.list_price * (discount_pct - guardrail_pct) / Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };
        OrderFigures {
            discount_pct,
            breach,
            breach_impact,
        }
    }
}

/// Compute SKU, order, Pareto and portfolio economics for `orders`
pub fn compute_economics<'a, I>(orders: I, settings: &EngineSettings) -> EconomicsReport
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let cogs_rate = settings.cogs_rate();
    let mut skus: HashMap<&str, SkuAcc> = HashMap::new();
    let mut sku_orders: SeenSet<(&str, &str)> = SeenSet::new();
    let mut by_order: BTreeMap<&str, OrderAcc> = BTreeMap::new();

    for record in orders {
        if record.is_cancelled() {
            continue;
        }
        let line = LineAmounts::of(record);
        let cogs = line.cogs(cogs_rate);
        let profit = line.draft_net() - cogs;
        let order_id = record.order_id.trim();
        let sku = record.sku_key();

        let acc = skus.entry(sku).or_default();
        if acc.name.is_empty() {
            acc.name = record.product_name.trim();
        }
        acc.quantity += line.units;
        if sku_orders.mark_seen_once((sku, order_id)) {
            acc.orders += 1;
        }
        acc.proceeds += line.gmv;
        acc.net_revenue += line.draft_net();
        acc.cogs += cogs;
        acc.fees += line.fees;
        acc.subsidy += line.subsidies;
        acc.profit += profit;

        let order = by_order.entry(order_id).or_default();
        order.line_items += 1;
        order.list_price += line.gmv;
        order.proceeds += line.deal_value;
        order.cogs += cogs;
        order.fees += line.fees;
        order.subsidy += line.subsidies;
        order.profit += profit;
    }

    // Highest profit first; ties broken by SKU for a stable ranking
    let mut ranked: Vec<(&str, SkuAcc)> = skus.into_iter().collect();
    ranked.sort_by(|(sa, a), (sb, b)| b.profit.cmp(&a.profit).then_with(|| sa.cmp(sb)));

    let guardrail_pct = settings.guardrail_pct();
    let order_economics: Vec<(OrderEconomics, Decimal)> = by_order
        .iter()
        .map(|(order_id, o)| {
            let f = o.figures(guardrail_pct);
            let economics = OrderEconomics {
                order_id: order_id.to_string(),
                line_items: o.line_items,
                total_list_price: to_f64(o.list_price),
                proceeds: to_f64(o.proceeds),
                cogs: to_f64(o.cogs),
                fees: to_f64(o.fees),
                subsidy: to_f64(o.subsidy),
                profit: to_f64(o.profit),
                margin: percent_of(o.profit, o.list_price),
                discount_pct: to_f64(f.discount_pct),
                guardrail_breach: f.breach,
                breach_impact: to_f64(f.breach_impact),
                control_ratio: percent_of(o.subsidy + o.fees, o.list_price),
            };
            (economics, f.breach_impact)
        })
        .collect();

    let portfolio = portfolio(&ranked, &order_economics);
    let pareto = pareto(&ranked);
    let sku_economics = ranked
        .iter()
        .map(|(sku, s)| {
            let margin = margin_of(s);
            SkuEconomics {
                sku: sku.to_string(),
                product_name: s.name.to_string(),
                quantity: s.quantity,
                orders: s.orders,
                proceeds: to_f64(s.proceeds),
                net_revenue: to_f64(s.net_revenue),
                cogs: to_f64(s.cogs),
                fees: to_f64(s.fees),
                subsidy: to_f64(s.subsidy),
                profit: to_f64(s.profit),
                margin: to_f64(margin),
                badge: badge_for_margin(margin),
            }
        })
        .collect();

    tracing::debug!(
        skus = portfolio.total_sku_count,
        orders = portfolio.total_order_count,
        breached = portfolio.breached_order_count,
        "Economics computed"
    );

    EconomicsReport {
        sku_economics,
        order_economics: order_economics.into_iter().map(|(o, _)| o).collect(),
        pareto,
        portfolio,
    }
}

fn margin_of(s: &SkuAcc) -> Decimal {
    percent_ratio(s.profit, s.proceeds)
}

fn positive(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

fn pareto(ranked: &[(&str, SkuAcc)]) -> Vec<ParetoItem> {
    let total_positive: Decimal = ranked.iter().map(|(_, s)| positive(s.profit)).sum();
    let head = pareto_head_len(ranked.len());
    let mut cumulative = Decimal::ZERO;

    ranked
        .iter()
        .enumerate()
        .map(|(index, (sku, s))| {
            cumulative += positive(s.profit);
            ParetoItem {
                rank: index as u64 + 1,
                sku: sku.to_string(),
                profit: to_f64(s.profit),
                cum_profit: to_f64(cumulative),
                cum_profit_pct: percent_of(cumulative, total_positive),
                is_top20: index < head,
            }
        })
        .collect()
}

fn portfolio(ranked: &[(&str, SkuAcc)], orders: &[(OrderEconomics, Decimal)]) -> PortfolioSummary {
    let total_revenue: Decimal = ranked.iter().map(|(_, s)| s.proceeds).sum();
    let total_profit: Decimal = ranked.iter().map(|(_, s)| s.profit).sum();
    let total_positive: Decimal = ranked.iter().map(|(_, s)| positive(s.profit)).sum();

    let head = pareto_head_len(ranked.len());
    let head_profit: Decimal = ranked.iter().take(head).map(|(_, s)| positive(s.profit)).sum();

    let total_sku_count = ranked.len() as u64;
    let loss_sku_count = ranked.iter().filter(|(_, s)| s.profit < Decimal::ZERO).count() as u64;

    let mut kill_list_count = 0;
    let mut risk_count = 0;
    let mut hero_count = 0;
    for (_, s) in ranked {
        match badge_for_margin(margin_of(s)) {
            SkuBadge::KillList => kill_list_count += 1,
            SkuBadge::Risk => risk_count += 1,
            SkuBadge::Hero => hero_count += 1,
            SkuBadge::Ok => {}
        }
    }

    let total_order_count = orders.len() as u64;
    let breached_order_count = orders.iter().filter(|(o, _)| o.guardrail_breach).count() as u64;
    let breach_impact: Decimal = orders.iter().map(|(_, impact)| *impact).sum();

    let margin = percent_of(total_profit, total_revenue);
    PortfolioSummary {
        total_revenue: to_f64(total_revenue),
        total_profit: to_f64(total_profit),
        total_positive_profit: to_f64(total_positive),
        avg_margin: margin,
        total_margin: margin,
        total_order_count,
        breached_order_count,
        guardrail_breach_rate: count_rate(breached_order_count, total_order_count),
        guardrail_breach_impact: to_f64(breach_impact),
        total_sku_count,
        loss_sku_count,
        loss_sku_ratio: count_rate(loss_sku_count, total_sku_count),
        top20_sku_count: head as u64,
        top20_profit_share: percent_of(head_profit, total_positive),
        kill_list_count,
        risk_count,
        hero_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order: &str, sku: &str, qty: i64, original: f64, deal: f64) -> OrderRecord {
        OrderRecord {
            order_id: order.into(),
            sku_reference_no: sku.into(),
            quantity: qty,
            original_price: original,
            deal_price: deal,
            order_status: "completed".into(),
            ..Default::default()
        }
    }

    #[test]
    fn badge_thresholds_first_match_wins() {
        assert_eq!(badge_for_margin(Decimal::from(-10)), SkuBadge::KillList);
        assert_eq!(badge_for_margin(Decimal::new(499, 2)), SkuBadge::KillList);
        assert_eq!(badge_for_margin(Decimal::from(5)), SkuBadge::Risk);
        assert_eq!(badge_for_margin(Decimal::from(15)), SkuBadge::Ok);
        assert_eq!(badge_for_margin(Decimal::from(30)), SkuBadge::Ok);
        assert_eq!(badge_for_margin(Decimal::new(3001, 2)), SkuBadge::Hero);
    }

    #[test]
    fn pareto_head_is_floor_of_fifth() {
        assert_eq!(pareto_head_len(0), 0);
        assert_eq!(pareto_head_len(4), 0);
        assert_eq!(pareto_head_len(5), 1);
        assert_eq!(pareto_head_len(6), 1);
        assert_eq!(pareto_head_len(10), 2);
    }

    #[test]
    fn line_profit_uses_cogs_rate() {
        let mut record = line("O1", "A", 2, 100.0, 100.0);
        record.fixed_fee = 10.0;
        record.shop_voucher = 5.0;
        let report = compute_economics([&record], &EngineSettings::default());
        let sku = &report.sku_economics[0];
        // 200 - 5 - 10 - 80
        assert_eq!(sku.profit, 105.0);
        assert_eq!(sku.cogs, 80.0);
        assert_eq!(sku.margin, 52.5);
        assert_eq!(sku.badge, SkuBadge::Hero);

        let settings = EngineSettings {
            assumed_cogs_rate: 0.9,
            ..Default::default()
        };
        let report = compute_economics([&record], &settings);
        // 200 - 5 - 10 - 180 = 5, a 2.5% margin
        assert_eq!(report.sku_economics[0].profit, 5.0);
        assert_eq!(report.sku_economics[0].badge, SkuBadge::KillList);
    }

    #[test]
    fn cancelled_orders_are_skipped() {
        let mut cancelled = line("O2", "A", 1, 100.0, 100.0);
        cancelled.order_status = "Đã hủy".into();
        let report = compute_economics([&line("O1", "A", 1, 100.0, 100.0), &cancelled], &EngineSettings::default());
        assert_eq!(report.portfolio.total_order_count, 1);
        assert_eq!(report.sku_economics[0].quantity, 1);
        assert_eq!(report.sku_economics[0].orders, 1);
    }

    #[test]
    fn order_rollup_and_control_ratio() {
        let mut a = line("O1", "A", 1, 100.0, 70.0);
        a.fixed_fee = 4.0;
        a.seller_rebate = 6.0;
        let b = line("O1", "B", 2, 50.0, 40.0);
        let report = compute_economics([&a, &b], &EngineSettings::default());
        let order = &report.order_economics[0];
        assert_eq!(order.line_items, 2);
        assert_eq!(order.total_list_price, 200.0);
        assert_eq!(order.proceeds, 150.0);
        assert_eq!(order.discount_pct, 25.0);
        assert!(!order.guardrail_breach);
        assert_eq!(order.control_ratio, 5.0);
    }

    #[test]
    fn missing_deal_price_means_no_discount() {
        let report = compute_economics([&line("O1", "A", 3, 100.0, 0.0)], &EngineSettings::default());
        assert_eq!(report.order_economics[0].discount_pct, 0.0);
        assert_eq!(report.order_economics[0].proceeds, 300.0);
    }

    #[test]
    fn breach_impact_is_gap_to_capped_discount() {
        // 50% discount on 1000 list vs 40% cap: 100 given away beyond the cap
        let report = compute_economics([&line("O1", "A", 1, 1000.0, 500.0)], &EngineSettings::default());
        let order = &report.order_economics[0];
        assert!(order.guardrail_breach);
        assert_eq!(order.breach_impact, 100.0);
        assert_eq!(report.portfolio.guardrail_breach_impact, 100.0);
        assert_eq!(report.portfolio.guardrail_breach_rate, 100.0);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let report = compute_economics(std::iter::empty(), &EngineSettings::default());
        assert!(report.sku_economics.is_empty());
        assert!(report.pareto.is_empty());
        assert_eq!(report.portfolio, PortfolioSummary::default());
    }
}
