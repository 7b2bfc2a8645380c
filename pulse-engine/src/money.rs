//! Money arithmetic
//!
//! Accumulation happens in `Decimal`; values are converted to `f64` only when
//! a result object is built, so per-day and global sums agree exactly.

use rust_decimal::prelude::*;
use shared::models::OrderRecord;

/// Rounding for emitted money values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Largest accepted magnitude of a single money cell
///
/// Keeps every product and slice-wide sum far below `Decimal::MAX`.
pub const MAX_MONEY_VALUE: f64 = 1e15;

/// Largest accepted quantity of a single line item
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Convert f64 to Decimal for calculation
///
/// Non-finite or out-of-range spreadsheet values degrade to zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if value.abs() > MAX_MONEY_VALUE {
        tracing::warn!(value = ?value, "Out-of-range f64 in monetary calculation, defaulting to zero");
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::warn!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to whole cents (2 dp, half away from zero)
#[inline]
pub fn cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Money cell rounded to cents
fn money(value: f64) -> Decimal {
    cents(to_decimal(value))
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    cents(value).to_f64().unwrap_or(0.0)
}

/// `numerator / denominator × 100` as a Decimal; 0 for a zero denominator or on overflow
pub fn percent_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|n| n.checked_div(denominator))
        .or_else(|| {
            numerator
                .checked_div(denominator)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or_else(|| {
            tracing::warn!(%numerator, %denominator, "Percentage overflowed, defaulting to zero");
            Decimal::ZERO
        })
}

/// `numerator / denominator × 100`, or 0 when the denominator is zero
pub fn percent_of(numerator: Decimal, denominator: Decimal) -> f64 {
    to_f64(percent_ratio(numerator, denominator))
}

/// `numerator / denominator`, or 0 when the denominator is zero
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Count-based percentage (`part / whole × 100`), 0 for an empty whole
pub fn count_rate(part: u64, whole: u64) -> f64 {
    percent_of(Decimal::from(part), Decimal::from(whole))
}

/// Money components of one line item
///
/// A line with zero (or negative) quantity contributes nothing to money sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineAmounts {
    /// Units counted for the line (0 when the quantity is empty or out of range)
    pub units: i64,
    /// original price × quantity
    pub gmv: Decimal,
    /// deal price × quantity, falling back to `gmv` when no deal price exists
    pub deal_value: Decimal,
    /// seller rebate + combo discount + trade-in bonus + shop voucher
    pub subsidies: Decimal,
    /// fixed + service + payment fee
    pub fees: Decimal,
    pub shopee_rebate: Decimal,
    pub fixed_fee: Decimal,
    /// Cost side used by the fee alert: fees + shop voucher + combo discount
    pub alert_cost: Decimal,
}

impl LineAmounts {
    /// Every component is rounded to cents, so day buckets and slice totals
    /// sum identical values.
    pub fn of(record: &OrderRecord) -> Self {
        let Some(quantity) = line_quantity(record.quantity) else {
            return Self::default();
        };
        let gmv = cents(to_decimal(record.original_price) * quantity);
        let deal_value = if record.deal_price > 0.0 {
            cents(to_decimal(record.deal_price) * quantity)
        } else {
            gmv
        };
        let fixed_fee = money(record.fixed_fee);
        let fees = fixed_fee + money(record.service_fee) + money(record.payment_fee);
        let voucher = money(record.shop_voucher);
        let combo = money(record.shop_combo_discount);
        let subsidies = money(record.seller_rebate) + combo + money(record.trade_in_bonus_by_seller) + voucher;

        Self {
            units: record.quantity,
            gmv,
            deal_value,
            subsidies,
            fees,
            shopee_rebate: money(record.shopee_rebate),
            fixed_fee,
            alert_cost: fees + voucher + combo,
        }
    }

    /// GMV minus subsidies minus fees
    pub fn draft_net(&self) -> Decimal {
        self.gmv - self.subsidies - self.fees
    }

    /// COGS proxy at the given rate of GMV, in cents
    pub fn cogs(&self, rate: Decimal) -> Decimal {
        cents(self.gmv.checked_mul(rate).unwrap_or(Decimal::ZERO))
    }
}

/// Quantity as a Decimal; `None` for empty or out-of-range lines
fn line_quantity(quantity: i64) -> Option<Decimal> {
    if quantity <= 0 {
        return None;
    }
    if quantity > MAX_LINE_QUANTITY {
        tracing::warn!(quantity, "Out-of-range line quantity, line contributes nothing");
        return None;
    }
    Some(Decimal::from(quantity))
}

/// Money impact of a returned line item
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReturnAmounts {
    pub units: i64,
    /// original price × (return quantity ?? quantity)
    pub value: Decimal,
    pub shipping_fee: Decimal,
}

impl ReturnAmounts {
    pub fn of(record: &OrderRecord) -> Self {
        if line_quantity(record.quantity).is_none() {
            return Self::default();
        }
        let units = record.returned_units().min(MAX_LINE_QUANTITY);
        Self {
            units,
            value: cents(to_decimal(record.original_price) * Decimal::from(units)),
            shipping_fee: money(record.return_shipping_fee),
        }
    }

    pub fn impact(&self) -> Decimal {
        self.value + self.shipping_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_values_become_zero() {
        assert_eq!(to_decimal(1e27), Decimal::ZERO);
        assert_eq!(to_decimal(-5e28), Decimal::ZERO);
        assert_eq!(to_decimal(MAX_MONEY_VALUE), Decimal::from(1_000_000_000_000_000_i64));

        let record = OrderRecord {
            quantity: i64::MAX,
            original_price: 10.0,
            return_status: "refunded".into(),
            ..Default::default()
        };
        assert_eq!(LineAmounts::of(&record), LineAmounts::default());
        assert_eq!(ReturnAmounts::of(&record), ReturnAmounts::default());
    }

    #[test]
    fn test_percent_never_overflows() {
        assert_eq!(percent_ratio(Decimal::MAX, Decimal::ONE), Decimal::ZERO);
        assert_eq!(percent_of(Decimal::MAX, Decimal::MAX), 100.0);
        assert_eq!(ratio(Decimal::MAX, Decimal::new(1, 2)), Decimal::ZERO);
    }

    #[test]
    fn test_line_amounts_are_rounded_to_cents() {
        let record = OrderRecord {
            quantity: 1,
            original_price: 10.005,
            fixed_fee: 0.125,
            ..Default::default()
        };
        let line = LineAmounts::of(&record);
        assert_eq!(line.gmv, Decimal::new(1001, 2));
        assert_eq!(line.fees, Decimal::new(13, 2));
        assert_eq!(line.cogs(Decimal::new(4, 1)), Decimal::new(400, 2));
    }

    #[test]
    fn test_percent_of_zero_denominator() {
        assert_eq!(percent_of(Decimal::from(5), Decimal::ZERO), 0.0);
        assert_eq!(percent_of(Decimal::from(55), Decimal::from(100)), 55.0);
        assert_eq!(count_rate(1, 0), 0.0);
        assert_eq!(count_rate(1, 3), 33.33);
    }

    #[test]
    fn test_line_amounts() {
        let record = OrderRecord {
            quantity: 2,
            original_price: 100.0,
            deal_price: 80.0,
            fixed_fee: 10.0,
            service_fee: 5.0,
            payment_fee: 2.0,
            seller_rebate: 1.0,
            shop_combo_discount: 3.0,
            trade_in_bonus_by_seller: 4.0,
            shop_voucher: 6.0,
            shopee_rebate: 9.0,
            ..Default::default()
        };
        let line = LineAmounts::of(&record);
        assert_eq!(line.units, 2);
        assert_eq!(line.gmv, Decimal::from(200));
        assert_eq!(line.deal_value, Decimal::from(160));
        assert_eq!(line.fees, Decimal::from(17));
        assert_eq!(line.subsidies, Decimal::from(14));
        assert_eq!(line.alert_cost, Decimal::from(26));
        assert_eq!(line.draft_net(), Decimal::from(169));
        // Platform rebate never leaks into seller subsidies
        assert_eq!(line.shopee_rebate, Decimal::from(9));
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let record = OrderRecord {
            quantity: 0,
            original_price: 100.0,
            fixed_fee: 10.0,
            return_shipping_fee: 5.0,
            ..Default::default()
        };
        assert_eq!(LineAmounts::of(&record), LineAmounts::default());
        assert_eq!(ReturnAmounts::of(&record), ReturnAmounts::default());
    }

    #[test]
    fn test_return_amounts_use_return_quantity() {
        let mut record = OrderRecord {
            quantity: 3,
            original_price: 50.0,
            return_shipping_fee: 12.0,
            ..Default::default()
        };
        assert_eq!(ReturnAmounts::of(&record).value, Decimal::from(150));

        record.return_quantity = Some(1);
        let ret = ReturnAmounts::of(&record);
        assert_eq!(ret.value, Decimal::from(50));
        assert_eq!(ret.impact(), Decimal::from(62));
    }
}
