//! Header → [`OrderRecord`] field mapping
//!
//! Headers are compared after folding case and Vietnamese diacritics and
//! collapsing punctuation, so `Trạng Thái Đơn Hàng`, `trang thai don hang`
//! and `TRẠNG THÁI ĐƠN HÀNG ` all hit the same synonym.

use shared::models::OrderRecord;

use super::reader::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OrderId,
    TrackingNumber,
    OrderStatus,
    ReturnStatus,
    SkuReferenceNo,
    ProductName,
    Quantity,
    OriginalPrice,
    DealPrice,
    FixedFee,
    ServiceFee,
    PaymentFee,
    SellerRebate,
    ShopComboDiscount,
    TradeInBonusBySeller,
    ShopVoucher,
    ShopeeRebate,
    ReturnShippingFee,
    ReturnQuantity,
    OrderDate,
    PayoutDate,
    UpdateTime,
    ShipTime,
    CompleteDate,
    BuyerUsername,
    PhoneNumber,
    ReceiverName,
    Province,
    District,
    Ward,
    DeliveryCarrier,
    WarehouseName,
}

impl Field {
    pub const ALL: [Field; 32] = [
        Field::OrderId,
        Field::TrackingNumber,
        Field::OrderStatus,
        Field::ReturnStatus,
        Field::SkuReferenceNo,
        Field::ProductName,
        Field::Quantity,
        Field::OriginalPrice,
        Field::DealPrice,
        Field::FixedFee,
        Field::ServiceFee,
        Field::PaymentFee,
        Field::SellerRebate,
        Field::ShopComboDiscount,
        Field::TradeInBonusBySeller,
        Field::ShopVoucher,
        Field::ShopeeRebate,
        Field::ReturnShippingFee,
        Field::ReturnQuantity,
        Field::OrderDate,
        Field::PayoutDate,
        Field::UpdateTime,
        Field::ShipTime,
        Field::CompleteDate,
        Field::BuyerUsername,
        Field::PhoneNumber,
        Field::ReceiverName,
        Field::Province,
        Field::District,
        Field::Ward,
        Field::DeliveryCarrier,
        Field::WarehouseName,
    ];

    /// Wire name of the target field
    pub fn name(&self) -> &'static str {
        match self {
            Field::OrderId => "orderId",
            Field::TrackingNumber => "trackingNumber",
            Field::OrderStatus => "orderStatus",
            Field::ReturnStatus => "returnStatus",
            Field::SkuReferenceNo => "skuReferenceNo",
            Field::ProductName => "productName",
            Field::Quantity => "quantity",
            Field::OriginalPrice => "originalPrice",
            Field::DealPrice => "dealPrice",
            Field::FixedFee => "fixedFee",
            Field::ServiceFee => "serviceFee",
            Field::PaymentFee => "paymentFee",
            Field::SellerRebate => "sellerRebate",
            Field::ShopComboDiscount => "shopComboDiscount",
            Field::TradeInBonusBySeller => "tradeInBonusBySeller",
            Field::ShopVoucher => "shopVoucher",
            Field::ShopeeRebate => "shopeeRebate",
            Field::ReturnShippingFee => "returnShippingFee",
            Field::ReturnQuantity => "returnQuantity",
            Field::OrderDate => "orderDate",
            Field::PayoutDate => "payoutDate",
            Field::UpdateTime => "updateTime",
            Field::ShipTime => "shipTime",
            Field::CompleteDate => "completeDate",
            Field::BuyerUsername => "buyerUsername",
            Field::PhoneNumber => "phoneNumber",
            Field::ReceiverName => "receiverName",
            Field::Province => "province",
            Field::District => "district",
            Field::Ward => "ward",
            Field::DeliveryCarrier => "deliveryCarrier",
            Field::WarehouseName => "warehouseName",
        }
    }

    /// Normalized header spellings (see [`normalize_header`])
    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Field::OrderId => &["ma don hang", "order id", "order sn", "order number", "ma don"],
            Field::TrackingNumber => &["ma van don", "tracking number", "tracking no", "ma theo doi"],
            Field::OrderStatus => &["trang thai don hang", "order status", "trang thai"],
            Field::ReturnStatus => &[
                "trang thai tra hang hoan tien",
                "return refund status",
                "return status",
                "trang thai hoan tien",
            ],
            Field::SkuReferenceNo => &[
                "sku phan loai hang",
                "sku reference no",
                "sku san pham",
                "variation sku",
                "ma sku",
                "sku",
            ],
            Field::ProductName => &["ten san pham", "product name", "san pham"],
            Field::Quantity => &["so luong", "quantity", "qty"],
            Field::OriginalPrice => &["gia goc", "original price", "list price"],
            Field::DealPrice => &["gia uu dai", "deal price", "sale price", "gia ban"],
            Field::FixedFee => &["phi co dinh", "fixed fee"],
            Field::ServiceFee => &["phi dich vu", "service fee"],
            Field::PaymentFee => &["phi thanh toan", "payment fee", "transaction fee"],
            Field::SellerRebate => &["nguoi ban tro gia", "seller rebate", "tro gia tu nguoi ban"],
            Field::ShopComboDiscount => &[
                "giam gia tu combo cua shop",
                "shop combo discount",
                "combo discount",
            ],
            Field::TradeInBonusBySeller => &[
                "tro gia doi hang tu nguoi ban",
                "trade in bonus by seller",
                "trade in bonus",
            ],
            Field::ShopVoucher => &["ma giam gia cua shop", "shop voucher", "voucher cua shop", "seller voucher"],
            Field::ShopeeRebate => &["shopee tro gia", "duoc shopee tro gia", "shopee rebate", "platform rebate"],
            Field::ReturnShippingFee => &["phi van chuyen tra hang", "return shipping fee", "phi tra hang"],
            Field::ReturnQuantity => &[
                "so luong san pham duoc hoan tra",
                "so luong tra hang",
                "return quantity",
                "returned quantity",
            ],
            Field::OrderDate => &[
                "ngay dat hang",
                "thoi gian dat hang",
                "order date",
                "order creation date",
                "order created time",
            ],
            Field::PayoutDate => &[
                "ngay hoan thanh thanh toan",
                "thoi gian hoan thanh thanh toan",
                "payout date",
                "payout completed date",
                "payout time",
            ],
            Field::UpdateTime => &["thoi gian cap nhat", "ngay cap nhat", "update time", "last updated"],
            Field::ShipTime => &["ngay gui hang", "thoi gian gui hang", "ship time", "shipped time"],
            Field::CompleteDate => &[
                "thoi gian hoan thanh don hang",
                "ngay hoan thanh",
                "ngay giao hang thanh cong",
                "complete date",
                "order complete time",
                "completed time",
            ],
            Field::BuyerUsername => &["nguoi mua", "ten dang nhap nguoi mua", "buyer username", "username buyer"],
            Field::PhoneNumber => &["so dien thoai", "so dien thoai nguoi nhan", "phone number", "sdt"],
            Field::ReceiverName => &["ten nguoi nhan", "receiver name", "recipient name"],
            Field::Province => &["tinh thanh pho", "province", "tinh", "city"],
            Field::District => &["tp quan huyen", "quan huyen", "district"],
            Field::Ward => &["phuong xa", "ward"],
            Field::DeliveryCarrier => &[
                "don vi van chuyen",
                "delivery carrier",
                "shipping carrier",
                "shipping provider",
                "carrier",
            ],
            Field::WarehouseName => &["ten kho hang", "kho hang", "warehouse name", "warehouse"],
        }
    }

    /// Write a cell into the record; blank or zero values never overwrite
    pub fn apply(&self, record: &mut OrderRecord, cell: &Cell) {
        if cell.is_blank() {
            return;
        }
        match self {
            Field::Quantity => {
                let n = cell.integer();
                if n != 0 {
                    record.quantity = n.max(0);
                }
            }
            Field::ReturnQuantity => {
                let n = cell.integer();
                if n > 0 {
                    record.return_quantity = Some(n);
                }
            }
            _ => {
                if let Some(slot) = self.money_slot(record) {
                    let v = cell.number();
                    if v != 0.0 {
                        *slot = v;
                    }
                } else if let Some(slot) = self.text_slot(record) {
                    *slot = cell.text().trim().to_string();
                }
            }
        }
    }

    fn money_slot<'r>(&self, r: &'r mut OrderRecord) -> Option<&'r mut f64> {
        Some(match self {
            Field::OriginalPrice => &mut r.original_price,
            Field::DealPrice => &mut r.deal_price,
            Field::FixedFee => &mut r.fixed_fee,
            Field::ServiceFee => &mut r.service_fee,
            Field::PaymentFee => &mut r.payment_fee,
            Field::SellerRebate => &mut r.seller_rebate,
            Field::ShopComboDiscount => &mut r.shop_combo_discount,
            Field::TradeInBonusBySeller => &mut r.trade_in_bonus_by_seller,
            Field::ShopVoucher => &mut r.shop_voucher,
            Field::ShopeeRebate => &mut r.shopee_rebate,
            Field::ReturnShippingFee => &mut r.return_shipping_fee,
            _ => return None,
        })
    }

    fn text_slot<'r>(&self, r: &'r mut OrderRecord) -> Option<&'r mut String> {
        Some(match self {
            Field::OrderId => &mut r.order_id,
            Field::TrackingNumber => &mut r.tracking_number,
            Field::OrderStatus => &mut r.order_status,
            Field::ReturnStatus => &mut r.return_status,
            Field::SkuReferenceNo => &mut r.sku_reference_no,
            Field::ProductName => &mut r.product_name,
            Field::OrderDate => &mut r.order_date,
            Field::PayoutDate => &mut r.payout_date,
            Field::UpdateTime => &mut r.update_time,
            Field::ShipTime => &mut r.ship_time,
            Field::CompleteDate => &mut r.complete_date,
            Field::BuyerUsername => &mut r.buyer_username,
            Field::PhoneNumber => &mut r.phone_number,
            Field::ReceiverName => &mut r.receiver_name,
            Field::Province => &mut r.province,
            Field::District => &mut r.district,
            Field::Ward => &mut r.ward,
            Field::DeliveryCarrier => &mut r.delivery_carrier,
            Field::WarehouseName => &mut r.warehouse_name,
            _ => return None,
        })
    }
}

/// Vietnamese letters grouped by their base letter
const DIACRITIC_FOLDS: &[(&str, char)] = &[
    ("àáảãạăằắẳẵặâầấẩẫậ", 'a'),
    ("èéẻẽẹêềếểễệ", 'e'),
    ("ìíỉĩị", 'i'),
    ("òóỏõọôồốổỗộơờớởỡợ", 'o'),
    ("ùúủũụưừứửữự", 'u'),
    ("ỳýỷỹỵ", 'y'),
    ("đ", 'd'),
];

fn fold_char(c: char) -> char {
    DIACRITIC_FOLDS
        .iter()
        .find(|(group, _)| group.contains(c))
        .map(|(_, base)| *base)
        .unwrap_or(c)
}

/// Lower-case, strip diacritics, collapse anything non-alphanumeric to one space
pub fn normalize_header(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .chars()
        .map(fold_char)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn match_header(raw: &str) -> Option<Field> {
    let normalized = normalize_header(raw);
    if normalized.is_empty() {
        return None;
    }
    Field::ALL
        .into_iter()
        .find(|field| field.synonyms().contains(&normalized.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_vietnamese_headers() {
        assert_eq!(normalize_header("Trạng Thái Đơn Hàng"), "trang thai don hang");
        assert_eq!(
            normalize_header("Trạng thái Trả hàng/Hoàn tiền"),
            "trang thai tra hang hoan tien"
        );
        assert_eq!(normalize_header("\u{feff}SKU Reference No. "), "sku reference no");
        assert_eq!(normalize_header("TP / Quận / Huyện"), "tp quan huyen");
    }

    #[test]
    fn matches_synonyms() {
        assert_eq!(match_header("Mã đơn hàng"), Some(Field::OrderId));
        assert_eq!(match_header("Order ID"), Some(Field::OrderId));
        assert_eq!(match_header("Số lượng"), Some(Field::Quantity));
        assert_eq!(
            match_header("Số lượng sản phẩm được hoàn trả"),
            Some(Field::ReturnQuantity)
        );
        assert_eq!(match_header("Phí cố định"), Some(Field::FixedFee));
        assert_eq!(match_header("Shopee Trợ giá"), Some(Field::ShopeeRebate));
        assert_eq!(match_header("Đơn Vị Vận Chuyển"), Some(Field::DeliveryCarrier));
        assert_eq!(match_header("Ghi chú"), None);
        assert_eq!(match_header(""), None);
    }

    #[test]
    fn every_field_has_a_unique_synonym_set() {
        let mut seen = std::collections::HashSet::new();
        for field in Field::ALL {
            assert!(!field.synonyms().is_empty(), "{field:?}");
            for synonym in field.synonyms() {
                assert_eq!(normalize_header(synonym), *synonym);
                assert!(seen.insert(*synonym), "duplicate synonym {synonym}");
            }
        }
    }

    #[test]
    fn apply_never_overwrites_with_blank_or_zero() {
        let text = |s: &str| Cell::Text(s.to_string());
        let mut record = OrderRecord::default();
        Field::OriginalPrice.apply(&mut record, &text("120.000"));
        Field::OriginalPrice.apply(&mut record, &text("0"));
        Field::OriginalPrice.apply(&mut record, &Cell::Empty);
        assert_eq!(record.original_price, 120_000.0);

        Field::DealPrice.apply(&mut record, &Cell::Number(99.125));
        assert_eq!(record.deal_price, 99.125);

        Field::OrderId.apply(&mut record, &text(" 2405ABC "));
        Field::OrderId.apply(&mut record, &text("   "));
        assert_eq!(record.order_id, "2405ABC");

        Field::Quantity.apply(&mut record, &text("2"));
        Field::Quantity.apply(&mut record, &Cell::Number(0.0));
        assert_eq!(record.quantity, 2);

        Field::ReturnQuantity.apply(&mut record, &text("0"));
        assert_eq!(record.return_quantity, None);
        Field::ReturnQuantity.apply(&mut record, &Cell::Number(1.0));
        assert_eq!(record.return_quantity, Some(1));
    }
}
