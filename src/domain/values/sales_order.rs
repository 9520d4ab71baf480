//! Order-source values.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{date_time_schema, money_schema, Address};
use super::{Resolvable, ShipmentIdentifier, ShipmentIdentity};
use crate::domain::foundation::{Currency, MonetaryValue, SdkError};
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, Schema, Schematic};

static SALES_ORDER_TIME_RANGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("startDateTime", date_time_schema())
        .required("endDateTime", date_time_schema())
        .optional("cursor", Schema::text())
        .into()
});

/// The window of orders to fetch, with an optional paging cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderTimeRange {
    start_date_time: String,
    end_date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

impl SalesOrderTimeRange {
    pub fn start_date_time(&self) -> &str {
        &self.start_date_time
    }

    pub fn end_date_time(&self) -> &str {
        &self.end_date_time
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

impl Schematic for SalesOrderTimeRange {
    const LABEL: &'static str = "sales order time range";

    fn schema() -> &'static Schema {
        &SALES_ORDER_TIME_RANGE_SCHEMA
    }
}

impl Resolvable for SalesOrderTimeRange {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    AwaitingPayment,
    AwaitingShipment,
    OnHold,
    Completed,
    Cancelled,
}

impl SalesOrderStatus {
    pub const VALUES: &'static [&'static str] = &[
        "awaiting_payment",
        "awaiting_shipment",
        "on_hold",
        "completed",
        "cancelled",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<MonetaryValue>,
}

impl SalesOrderItem {
    fn schema() -> Schema {
        Schema::object()
            .required("id", Schema::text())
            .required("name", Schema::text())
            .required("quantity", Schema::integer().min(1.0))
            .optional("unitPrice", money_schema())
            .into()
    }
}

/// One order fetched from an order source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    pub status: SalesOrderStatus,
    pub created_date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<Address>,
    pub items: Vec<SalesOrderItem>,
}

impl SalesOrder {
    fn schema() -> Schema {
        Schema::object()
            .required("id", Schema::text())
            .optional("orderNumber", Schema::text())
            .required("status", Schema::string().one_of(SalesOrderStatus::VALUES))
            .required("createdDateTime", date_time_schema())
            .optional("shipTo", Address::schema())
            .required("items", Schema::array(SalesOrderItem::schema()))
            .into()
    }

    /// Sum of `unit_price * quantity` over priced items.
    pub fn total_amount(&self, fallback_currency: &Currency) -> Result<MonetaryValue, SdkError> {
        let extended: Vec<MonetaryValue> = self
            .items
            .iter()
            .filter_map(|item| {
                item.unit_price.as_ref().map(|price| {
                    MonetaryValue::new(price.value * f64::from(item.quantity), price.currency.clone())
                })
            })
            .collect();
        MonetaryValue::sum(&extended, fallback_currency)
    }
}

static SALES_ORDERS_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("salesOrders", Schema::array(SalesOrder::schema()))
        .optional("cursor", Schema::text())
        .into()
});

/// A page of sales orders; `cursor` is present when more pages remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrders {
    sales_orders: Vec<SalesOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

impl SalesOrders {
    pub fn sales_orders(&self) -> &[SalesOrder] {
        &self.sales_orders
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }
}

impl Schematic for SalesOrders {
    const LABEL: &'static str = "sales orders";

    fn schema() -> &'static Schema {
        &SALES_ORDERS_SCHEMA
    }
}

impl Resolvable for SalesOrders {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

static SALES_ORDER_SHIPMENT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    ShipmentIdentifier::schema_fields()
        .required("salesOrderID", Schema::text())
        .optional("carrierCode", Schema::text())
        .required("shipDateTime", date_time_schema())
        .optional("itemIDs", Schema::array(Schema::text()))
        .into()
});

/// A shipment created or cancelled for a sales order, reported back to
/// the order source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderShipment {
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
    #[serde(rename = "salesOrderID")]
    sales_order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carrier_code: Option<String>,
    ship_date_time: String,
    #[serde(rename = "itemIDs", default, skip_serializing_if = "Vec::is_empty")]
    item_ids: Vec<String>,
}

impl SalesOrderShipment {
    pub fn sales_order_id(&self) -> &str {
        &self.sales_order_id
    }

    pub fn carrier_code(&self) -> Option<&str> {
        self.carrier_code.as_deref()
    }

    pub fn ship_date_time(&self) -> &str {
        &self.ship_date_time
    }

    /// Items in this shipment; empty means the whole order.
    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }
}

impl ShipmentIdentity for SalesOrderShipment {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

impl Schematic for SalesOrderShipment {
    const LABEL: &'static str = "sales order shipment";

    fn schema() -> &'static Schema {
        &SALES_ORDER_SHIPMENT_SCHEMA
    }
}

impl Resolvable for SalesOrderShipment {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sales_orders_page_carries_cursor() {
        let registry = ReferenceRegistry::new();
        let raw = json!({
            "salesOrders": [{
                "id": "SO-1",
                "status": "awaiting_shipment",
                "createdDateTime": "2024-03-01T08:00:00Z",
                "items": [
                    { "id": "I-1", "name": "Mug", "quantity": 2, "unitPrice": { "value": 7.5, "currency": "USD" } },
                    { "id": "I-2", "name": "Gift card", "quantity": 1 }
                ]
            }],
            "cursor": "page-2"
        });
        let orders = SalesOrders::from_value(&raw, &registry).unwrap();

        assert!(orders.has_more());
        let total = orders.sales_orders()[0]
            .total_amount(&Currency::new("USD").unwrap())
            .unwrap();
        assert_eq!(total.value, 15.0);
    }

    #[test]
    fn quantity_must_be_a_positive_integer() {
        let registry = ReferenceRegistry::new();
        let raw = json!({
            "salesOrders": [{
                "id": "SO-1",
                "status": "completed",
                "createdDateTime": "2024-03-01T08:00:00Z",
                "items": [{ "id": "I-1", "name": "Mug", "quantity": 0.5 }]
            }]
        });
        let err = SalesOrders::from_value(&raw, &registry).unwrap_err();
        assert!(err.message.contains("salesOrders[0].items[0].quantity"));
    }

    #[test]
    fn shipment_reports_its_order() {
        let registry = ReferenceRegistry::new();
        let raw = json!({
            "salesOrderID": "SO-1",
            "trackingNumber": "1Z999",
            "shipDateTime": "2024-03-01T08:00:00Z"
        });
        let shipment = SalesOrderShipment::from_value(&raw, &registry).unwrap();

        assert_eq!(shipment.sales_order_id(), "SO-1");
        assert_eq!(shipment.tracking_number(), Some("1Z999"));
        assert!(shipment.item_ids().is_empty());
    }
}
