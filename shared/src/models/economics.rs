//! Order/SKU Economics output

use serde::{Deserialize, Serialize};

/// Exclusive SKU badge, first match wins in the order listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkuBadge {
    /// margin < 5%
    #[serde(rename = "Kill List")]
    KillList,
    /// margin < 15%
    Risk,
    /// margin > 30%
    Hero,
    #[serde(rename = "OK")]
    Ok,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuEconomics {
    pub sku: String,
    pub product_name: String,
    pub quantity: i64,
    pub orders: u64,
    /// List value (original price × quantity)
    pub proceeds: f64,
    /// Proceeds minus subsidies and fees
    pub net_revenue: f64,
    pub cogs: f64,
    pub fees: f64,
    pub subsidy: f64,
    pub profit: f64,
    pub margin: f64,
    pub badge: SkuBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEconomics {
    pub order_id: String,
    pub line_items: u64,
    /// Σ original price × quantity
    pub total_list_price: f64,
    /// Σ deal price × quantity
    pub proceeds: f64,
    pub cogs: f64,
    pub fees: f64,
    pub subsidy: f64,
    pub profit: f64,
    pub margin: f64,
    pub discount_pct: f64,
    pub guardrail_breach: bool,
    /// Discount above the guardrail ceiling, in money (0 when not breached)
    pub breach_impact: f64,
    /// (subsidy + fees) / list value × 100
    pub control_ratio: f64,
}

/// SKU in profit rank order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoItem {
    pub rank: u64,
    pub sku: String,
    pub profit: f64,
    pub cum_profit: f64,
    pub cum_profit_pct: f64,
    /// Rank falls in the first 20% of the SKU count
    pub is_top20: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_positive_profit: f64,
    /// Same figure as `total_margin`
    pub avg_margin: f64,
    pub total_margin: f64,
    pub total_order_count: u64,
    pub breached_order_count: u64,
    pub guardrail_breach_rate: f64,
    pub guardrail_breach_impact: f64,
    pub total_sku_count: u64,
    pub loss_sku_count: u64,
    pub loss_sku_ratio: f64,
    pub top20_sku_count: u64,
    pub top20_profit_share: f64,
    pub kill_list_count: u64,
    pub risk_count: u64,
    pub hero_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicsReport {
    pub sku_economics: Vec<SkuEconomics>,
    pub order_economics: Vec<OrderEconomics>,
    pub pareto: Vec<ParetoItem>,
    pub portfolio: PortfolioSummary,
}
