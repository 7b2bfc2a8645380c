//! Order Record (one row per order line item)
//!
//! An order with N distinct SKUs arrives as N records sharing `order_id`.
//! Text fields use the empty string for "absent"; dates stay as the raw text
//! exported by the marketplace and are parsed defensively by the engine.

use serde::{Deserialize, Serialize};

/// Status labels (lower-cased) that mark an order as cancelled.
const CANCELLED_MARKERS: &[&str] = &["cancel", "hủy", "huỷ"];

/// Status labels (lower-cased) that mark an order as completed.
const COMPLETED_MARKERS: &[&str] = &["complete", "hoàn thành", "delivered", "đã giao", "đã nhận"];

/// Negations that turn a completion marker into its opposite ("Chưa hoàn thành").
const NEGATION_MARKERS: &[&str] = &["chưa", "incomplete", "not ", "undelivered", "uncomplete"];

/// Sentinel bucket for customers without any identity field.
pub const UNKNOWN_CUSTOMER: &str = "unknown";

/// Sentinel key for line items with neither SKU nor product name.
pub const UNNAMED_SKU: &str = "(unnamed)";

/// Normalized order line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRecord {
    // -- Identity --
    /// Shared by sibling line items of the same order
    pub order_id: String,
    pub tracking_number: String,

    // -- Classification --
    /// Free-text status label ("completed", "Đã hủy", ...)
    pub order_status: String,
    /// Empty = not returned
    pub return_status: String,

    // -- Product --
    pub sku_reference_no: String,
    pub product_name: String,
    pub quantity: i64,
    /// List price per unit
    pub original_price: f64,
    /// Actual sale price per unit
    pub deal_price: f64,

    // -- Platform fees --
    pub fixed_fee: f64,
    pub service_fee: f64,
    pub payment_fee: f64,

    // -- Seller-funded subsidies --
    pub seller_rebate: f64,
    pub shop_combo_discount: f64,
    pub trade_in_bonus_by_seller: f64,
    pub shop_voucher: f64,

    /// Platform-funded rebate, tracked apart from seller subsidies
    pub shopee_rebate: f64,

    // -- Returns --
    pub return_shipping_fee: f64,
    /// Falls back to `quantity` when absent
    pub return_quantity: Option<i64>,

    // -- Dates (raw text) --
    pub order_date: String,
    /// Revenue recognition date
    pub payout_date: String,
    /// Last return-status change
    pub update_time: String,
    pub ship_time: String,
    pub complete_date: String,

    // -- Customer / location --
    pub buyer_username: String,
    pub phone_number: String,
    pub receiver_name: String,
    pub province: String,
    pub district: String,
    pub ward: String,
    pub delivery_carrier: String,
    pub warehouse_name: String,
}

impl OrderRecord {
    /// SKU reference, falling back to the product name
    pub fn sku_key(&self) -> &str {
        let sku = self.sku_reference_no.trim();
        if !sku.is_empty() {
            return sku;
        }
        let name = self.product_name.trim();
        if !name.is_empty() {
            return name;
        }
        UNNAMED_SKU
    }

    /// Buyer username, then phone number, then [`UNKNOWN_CUSTOMER`]
    pub fn customer_key(&self) -> &str {
        [&self.buyer_username, &self.phone_number]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_CUSTOMER)
    }

    /// Whether the line carries any return/refund state
    pub fn has_return(&self) -> bool {
        !self.return_status.trim().is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        let status = self.order_status.to_lowercase();
        CANCELLED_MARKERS.iter().any(|m| status.contains(m))
    }

    pub fn is_completed(&self) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let status = self.order_status.to_lowercase();
        if NEGATION_MARKERS.iter().any(|m| status.contains(m)) {
            return false;
        }
        COMPLETED_MARKERS.iter().any(|m| status.contains(m))
    }

    /// Units covered by the return (explicit return quantity or the full line)
    pub fn returned_units(&self) -> i64 {
        self.return_quantity.unwrap_or(self.quantity).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_key_falls_back_to_product_name() {
        let mut record = OrderRecord {
            product_name: "Áo thun".into(),
            ..Default::default()
        };
        assert_eq!(record.sku_key(), "Áo thun");

        record.sku_reference_no = "SKU-1".into();
        assert_eq!(record.sku_key(), "SKU-1");

        assert_eq!(OrderRecord::default().sku_key(), UNNAMED_SKU);
    }

    #[test]
    fn customer_key_prefers_username_then_phone() {
        let mut record = OrderRecord {
            phone_number: "0901".into(),
            ..Default::default()
        };
        assert_eq!(record.customer_key(), "0901");

        record.buyer_username = "lan.nguyen".into();
        assert_eq!(record.customer_key(), "lan.nguyen");

        assert_eq!(OrderRecord::default().customer_key(), UNKNOWN_CUSTOMER);
    }

    #[test]
    fn cancellation_recognises_vietnamese_and_english() {
        for status in ["Đã hủy", "cancelled", "CANCELED", "Đã huỷ"] {
            let record = OrderRecord {
                order_status: status.into(),
                ..Default::default()
            };
            assert!(record.is_cancelled(), "{status}");
            assert!(!record.is_completed(), "{status}");
        }
    }

    #[test]
    fn completion_markers() {
        for status in ["Hoàn thành", "completed", "Delivered"] {
            let record = OrderRecord {
                order_status: status.into(),
                ..Default::default()
            };
            assert!(record.is_completed(), "{status}");
        }
    }

    #[test]
    fn negated_completion_is_not_completed() {
        for status in ["Chưa hoàn thành", "incomplete", "Not delivered", "Undelivered", "Chưa giao"] {
            let record = OrderRecord {
                order_status: status.into(),
                ..Default::default()
            };
            assert!(!record.is_completed(), "{status}");
            assert!(!record.is_cancelled(), "{status}");
        }
    }

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let json = r#"{"orderId":"O1","originalPrice":100,"quantity":2,"returnQuantity":1}"#;
        let record: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.order_id, "O1");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.returned_units(), 1);
        assert!(record.payout_date.is_empty());
    }
}
