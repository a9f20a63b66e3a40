//! Purchase-order document model and the canonical extraction field set.

use serde::{Deserialize, Serialize};

/// The canonical, ordered set of fields extracted from a purchase-order
/// document. Graders and the validate stage iterate this list, so its order
/// is part of the scoring contract.
pub const EXTRACTION_FIELDS: [&str; 7] = [
    "order_id",
    "customer",
    "pickup_location",
    "delivery_location",
    "delivery_datetime",
    "driver_name",
    "driver_phone",
];

/// A fully-populated purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseOrder {
    pub order_id: String,
    pub customer: String,
    pub pickup_location: String,
    pub delivery_location: String,
    pub delivery_datetime: String,
    pub driver_name: String,
    pub driver_phone: String,
}

/// Nullable mirror of [`PurchaseOrder`] used on the extractor wire and in
/// scenario ground truth, where any field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionFields {
    pub order_id: Option<String>,
    pub customer: Option<String>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub delivery_datetime: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
}

impl ExtractionFields {
    /// Look up a field value by its canonical name.
    pub fn value(&self, field: &str) -> Option<&str> {
        match field {
            "order_id" => self.order_id.as_deref(),
            "customer" => self.customer.as_deref(),
            "pickup_location" => self.pickup_location.as_deref(),
            "delivery_location" => self.delivery_location.as_deref(),
            "delivery_datetime" => self.delivery_datetime.as_deref(),
            "driver_name" => self.driver_name.as_deref(),
            "driver_phone" => self.driver_phone.as_deref(),
            _ => None,
        }
    }

    /// Set a field value by its canonical name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "order_id" => self.order_id = Some(value),
            "customer" => self.customer = Some(value),
            "pickup_location" => self.pickup_location = Some(value),
            "delivery_location" => self.delivery_location = Some(value),
            "delivery_datetime" => self.delivery_datetime = Some(value),
            "driver_name" => self.driver_name = Some(value),
            "driver_phone" => self.driver_phone = Some(value),
            _ => {}
        }
    }

    /// Names of fields that are absent, in canonical order.
    pub fn missing_fields(&self) -> Vec<String> {
        EXTRACTION_FIELDS
            .iter()
            .filter(|f| self.value(f).is_none())
            .map(|f| f.to_string())
            .collect()
    }

    /// Convert into a [`PurchaseOrder`] when every field is present.
    pub fn into_purchase_order(self) -> Option<PurchaseOrder> {
        Some(PurchaseOrder {
            order_id: self.order_id?,
            customer: self.customer?,
            pickup_location: self.pickup_location?,
            delivery_location: self.delivery_location?,
            delivery_datetime: self.delivery_datetime?,
            driver_name: self.driver_name?,
            driver_phone: self.driver_phone?,
        })
    }
}
