//! Metrics Aggregator
//!
//! One forward pass over the order slice. Each record is offered to a set of
//! named reducers; every reducer checks its own gate and keeps its own
//! "seen identity" sets, so multi-line orders are never counted once per
//! line. Derived ratios are computed only in [`Accumulator::finish`].
//!
//! | Reducer | Gate |
//! |---------|------|
//! | status / classification | always |
//! | fee alerts | line GMV > 0 |
//! | sales | payout date in window, not cancelled |
//! | returns | return state, update time in window, not cancelled |
//! | shipping | carrier set, ship and complete dates parse, complete ≥ ship |

mod finish;
mod returns;
mod sales;
mod shipping;
mod status;


use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{FeeAlert, MetricResult, OrderRecord};

use crate::dates::DateWindow;
use crate::dedup::SeenSet;
use crate::settings::EngineSettings;

/// Label used for empty province / status / carrier values
pub(crate) const UNKNOWN_LABEL: &str = "Unknown";

/// Call-time options of one aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsQuery {
    /// Sales and return recognition window; unbounded admits every parseable date
    pub window: DateWindow,
    /// Advertising spend for the ad-cost overlay
    pub ad_expense: Option<f64>,
}

impl MetricsQuery {
    pub fn new(window: DateWindow) -> Self {
        Self {
            window,
            ad_expense: None,
        }
    }

    pub fn with_ad_expense(mut self, ad_expense: f64) -> Self {
        self.ad_expense = Some(ad_expense);
        self
    }
}

/// Aggregate `orders` into a fresh [`MetricResult`]
pub fn aggregate<'a, I>(orders: I, query: &MetricsQuery, settings: &EngineSettings) -> MetricResult
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut acc = Accumulator::new(*query, *settings);
    let mut seen_records = 0usize;
    for record in orders {
        acc.push(record);
        seen_records += 1;
    }
    let result = acc.finish();
    tracing::debug!(
        records = seen_records,
        orders = result.total_orders,
        days = result.revenue_trend.len(),
        "Metrics aggregated"
    );
    result
}

/// Per-call accumulation state; borrows string keys from the records
pub(crate) struct Accumulator<'a> {
    query: MetricsQuery,
    settings: EngineSettings,

    // status / classification
    unique_orders: SeenSet<&'a str>,
    status_seen: SeenSet<(&'a str, &'a str)>,
    status_counts: HashMap<&'a str, u64>,
    completed: SeenSet<&'a str>,
    cancelled: SeenSet<&'a str>,
    returned: SeenSet<&'a str>,

    fee_alerts: Vec<FeeAlert>,

    // sales
    totals: Totals,
    sales_orders: SeenSet<&'a str>,
    sales_days: BTreeMap<NaiveDate, DaySales>,
    sales_day_orders: SeenSet<(NaiveDate, &'a str)>,
    location_orders: SeenSet<(&'a str, &'a str)>,
    product_orders: SeenSet<(&'a str, &'a str)>,
    customers: HashMap<&'a str, CustomerAcc<'a>>,

    // returns
    return_days: BTreeMap<NaiveDate, DayReturns>,
    return_day_orders: SeenSet<(NaiveDate, &'a str)>,
    return_location_orders: SeenSet<(&'a str, &'a str)>,
    return_details: HashMap<&'a str, ReturnAcc<'a>>,

    // shared by sales and returns
    products: HashMap<&'a str, ProductAcc<'a>>,
    locations: HashMap<&'a str, LocationAcc>,

    // shipping
    carrier_orders: SeenSet<(&'a str, &'a str)>,
    carriers: HashMap<&'a str, ShipAcc>,
    ship_days: BTreeMap<NaiveDate, ShipAcc>,
}

#[derive(Debug, Default)]
struct Totals {
    gmv: Decimal,
    subsidies: Decimal,
    fees: Decimal,
    shopee_rebate: Decimal,
    cogs: Decimal,
    items_sold: i64,
    return_value: Decimal,
    return_fees: Decimal,
    items_returned: i64,
}

#[derive(Debug, Default)]
struct DaySales {
    gmv: Decimal,
    subsidies: Decimal,
    fees: Decimal,
    orders: u64,
    items_sold: i64,
}

#[derive(Debug, Default)]
struct DayReturns {
    value: Decimal,
    fees: Decimal,
    orders: u64,
}

#[derive(Debug, Default)]
struct ProductAcc<'a> {
    name: &'a str,
    orders: u64,
    quantity_sold: i64,
    return_quantity: i64,
    gmv: Decimal,
    net_revenue: Decimal,
    cogs: Decimal,
    return_value: Decimal,
}

#[derive(Debug, Default)]
struct LocationAcc {
    orders: u64,
    gmv: Decimal,
    returned_orders: u64,
    return_value: Decimal,
}

#[derive(Debug, Default)]
struct CustomerAcc<'a> {
    receiver_name: &'a str,
    phone_number: &'a str,
    province: &'a str,
    total_spent: Decimal,
    last_order_date: &'a str,
    history: Vec<HistoryAcc<'a>>,
}

#[derive(Debug)]
struct HistoryAcc<'a> {
    order_id: &'a str,
    date: &'a str,
    total: Decimal,
    products: Vec<LineAcc<'a>>,
}

#[derive(Debug)]
struct LineAcc<'a> {
    sku: &'a str,
    name: &'a str,
    quantity: i64,
    amount: Decimal,
}

#[derive(Debug, Default)]
struct ReturnAcc<'a> {
    return_status: &'a str,
    update_time: &'a str,
    customer_id: &'a str,
    province: &'a str,
    value: Decimal,
    fee: Decimal,
    products: Vec<LineAcc<'a>>,
}

#[derive(Debug, Default)]
struct ShipAcc {
    orders: u64,
    total_days: f64,
    slow: u64,
}

impl<'a> Accumulator<'a> {
    pub(crate) fn new(query: MetricsQuery, settings: EngineSettings) -> Self {
        Self {
            query,
            settings,
            unique_orders: SeenSet::new(),
            status_seen: SeenSet::new(),
            status_counts: HashMap::new(),
            completed: SeenSet::new(),
            cancelled: SeenSet::new(),
            returned: SeenSet::new(),
            fee_alerts: Vec::new(),
            totals: Totals::default(),
            sales_orders: SeenSet::new(),
            sales_days: BTreeMap::new(),
            sales_day_orders: SeenSet::new(),
            location_orders: SeenSet::new(),
            product_orders: SeenSet::new(),
            customers: HashMap::new(),
            return_days: BTreeMap::new(),
            return_day_orders: SeenSet::new(),
            return_location_orders: SeenSet::new(),
            return_details: HashMap::new(),
            products: HashMap::new(),
            locations: HashMap::new(),
            carrier_orders: SeenSet::new(),
            carriers: HashMap::new(),
            ship_days: BTreeMap::new(),
        }
    }

    /// Offer one record to every reducer
    pub(crate) fn push(&mut self, record: &'a OrderRecord) {
        self.reduce_status(record);
        self.reduce_fee_alert(record);
        self.reduce_sale(record);
        self.reduce_return(record);
        self.reduce_shipping(record);
    }
}

/// Trimmed value, or [`UNKNOWN_LABEL`] when blank
pub(crate) fn label_or_unknown(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { UNKNOWN_LABEL } else { trimmed }
}
