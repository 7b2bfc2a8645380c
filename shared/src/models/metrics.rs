//! Metrics Aggregator output
//!
//! Money values are in the report currency, already rounded to 2 dp.
//! Rates are percentages (0–100), zero when their denominator is zero.

use serde::{Deserialize, Serialize};

/// Full aggregation result for one order slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    // -- Sales --
    pub total_gmv: f64,
    pub total_shop_subsidies: f64,
    pub total_platform_fees: f64,
    /// Platform-funded, not part of `total_shop_subsidies`
    pub total_shopee_rebate: f64,
    pub total_draft_net: f64,
    /// Distinct orders in the sales bucket
    pub total_orders: u64,
    pub total_items_sold: i64,
    pub aov: f64,

    // -- Returns --
    pub total_return_value: f64,
    pub total_return_fees: f64,
    pub total_return_impact: f64,
    pub total_items_returned: i64,
    pub total_actual_net: f64,

    // -- Cost estimate --
    pub total_estimated_cogs: f64,
    pub estimated_gross_profit: f64,

    // -- Rates --
    pub platform_fee_rate: f64,
    pub shop_subsidy_rate: f64,
    pub margin_pre_cogs: f64,

    // -- Ad overlay --
    pub ad_expense: f64,
    pub ad_cost_rate: f64,
    /// Not modelled yet; always 0
    pub margin_before_ads: f64,
    /// Not modelled yet; always 0
    pub final_net_margin: f64,

    // -- Whole-order classification (deduped by order id) --
    pub completed_orders: u64,
    pub canceled_orders: u64,
    pub returned_orders_count: u64,

    // -- Collections --
    pub revenue_trend: Vec<RevenueTrend>,
    pub shipping_trend: Vec<ShippingTrend>,
    pub product_performance: Vec<ProductStats>,
    pub customer_analysis: Vec<CustomerAnalysis>,
    pub location_stats: Vec<LocationStats>,
    pub carrier_stats: Vec<CarrierStats>,
    pub status_breakdown: Vec<StatusCount>,
    pub return_details: Vec<ReturnDetail>,

    // -- Nested stat blocks --
    pub loyalty: LoyaltyStats,
    pub risk: RiskStats,
    pub fee_alerts: Vec<FeeAlert>,
}

/// One calendar day of sales (keyed by payout date) and returns (keyed by update time)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTrend {
    /// YYYY-MM-DD
    pub date: String,
    pub gmv: f64,
    pub subsidies: f64,
    pub fees: f64,
    pub orders: u64,
    pub items_sold: i64,
    pub return_value: f64,
    pub return_fees: f64,
    pub returned_orders: u64,

    // Derived, same formulas as the global scalars
    pub draft_net: f64,
    pub return_impact: f64,
    pub actual_net: f64,
    pub aov: f64,
    pub fee_rate: f64,
    pub subsidy_rate: f64,
    pub margin_pre_cogs: f64,
}

/// Deliveries shipped on one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingTrend {
    pub date: String,
    pub shipped_orders: u64,
    pub avg_ship_days: f64,
    pub slow_orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    /// SKU reference or product name
    pub sku: String,
    pub product_name: String,
    pub orders: u64,
    pub quantity_sold: i64,
    pub return_quantity: i64,
    /// `quantity_sold - return_quantity`
    pub net_quantity: i64,
    pub gmv: f64,
    pub net_revenue: f64,
    pub estimated_cogs: f64,
    pub gross_profit: f64,
    pub return_value: f64,
}

/// One buyer identity with its purchase history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalysis {
    pub customer_id: String,
    pub receiver_name: String,
    pub phone_number: String,
    pub province: String,
    pub order_count: u64,
    pub total_spent: f64,
    /// Lexicographic max of the raw date strings seen
    pub last_order_date: String,
    pub history: Vec<PurchaseHistory>,
}

/// One order in a customer's history; sibling line items merge here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistory {
    pub order_id: String,
    pub date: String,
    pub total: f64,
    pub products: Vec<PurchasedProduct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedProduct {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub province: String,
    pub orders: u64,
    pub gmv: f64,
    pub returned_orders: u64,
    pub return_value: f64,
    pub return_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierStats {
    pub carrier: String,
    pub orders: u64,
    pub total_ship_days: f64,
    pub avg_ship_days: f64,
    pub slow_orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// One returned order, its line items merged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDetail {
    pub order_id: String,
    pub return_status: String,
    pub update_time: String,
    pub customer_id: String,
    pub province: String,
    pub return_value: f64,
    pub return_fee: f64,
    pub products: Vec<ReturnedProduct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedProduct {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyStats {
    pub total_customers: u64,
    /// Customers with more than one order
    pub returning_customers: u64,
    pub new_customers: u64,
    pub repeat_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskStats {
    /// Distinct order ids in the whole slice
    pub unique_orders: u64,
    pub cancel_rate: f64,
    pub return_rate: f64,
    pub shipped_orders: u64,
    pub slow_delivery_count: u64,
    pub slow_delivery_rate: f64,
    pub fee_alert_count: u64,
    /// Provinces with the most returned orders, highest first (max 5)
    pub top_return_provinces: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeAlertCause {
    /// Percentage fees and vouchers dominate the line
    HeavyFeesAndVouchers,
    /// The flat fixed fee alone eats a large share of a cheap line
    LowPriceFixedFee,
}

impl FeeAlertCause {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HeavyFeesAndVouchers => ">20% of GMV in fees/vouchers",
            Self::LowPriceFixedFee => "Low-price order absorbing fixed fee",
        }
    }
}

/// Line item whose fees and vouchers exceed the alert ratio of its GMV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeAlert {
    pub order_id: String,
    pub sku: String,
    pub product_name: String,
    pub gmv: f64,
    pub total_cost: f64,
    /// Percentage of GMV
    pub ratio: f64,
    pub cause: FeeAlertCause,
    pub label: String,
}
