//! Order-source app methods.

use once_cell::sync::Lazy;
use serde_json::Value;

use super::build_list;
use crate::application::pipeline::{AppContext, MethodContract};
use crate::domain::foundation::SdkError;
use crate::domain::validation::{Schema, Schematic};
use crate::domain::values::{Resolvable, SalesOrderShipment, SalesOrderTimeRange, SalesOrders};

static SALES_ORDER_SHIPMENTS: Lazy<Schema> =
    Lazy::new(|| Schema::array(SalesOrderShipment::schema().clone()).min_items(1).into());

/// `getSalesOrdersByDate`: fetches one page of orders in a time range.
pub struct GetSalesOrdersByDate;

impl MethodContract for GetSalesOrdersByDate {
    const NAME: &'static str = "getSalesOrdersByDate";
    type Args = SalesOrderTimeRange;
    type Output = SalesOrders;

    fn build_args(raw: &Value, context: &AppContext) -> Result<SalesOrderTimeRange, SdkError> {
        SalesOrderTimeRange::from_value(raw, context.registry())
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<SalesOrders, SdkError> {
        SalesOrders::from_value(raw, context.registry())
    }
}

/// `shipmentCreated`: tells the order source that orders shipped.
pub struct ShipmentCreated;

impl MethodContract for ShipmentCreated {
    const NAME: &'static str = "shipmentCreated";
    type Args = Vec<SalesOrderShipment>;
    type Output = ();

    fn build_args(raw: &Value, context: &AppContext) -> Result<Self::Args, SdkError> {
        build_list(raw, "sales order shipments", &SALES_ORDER_SHIPMENTS, context.registry())
    }

    fn build_output(_raw: &Value, _context: &AppContext) -> Result<(), SdkError> {
        Ok(())
    }
}

/// `shipmentCancelled`: tells the order source that shipments were voided.
pub struct ShipmentCancelled;

impl MethodContract for ShipmentCancelled {
    const NAME: &'static str = "shipmentCancelled";
    type Args = Vec<SalesOrderShipment>;
    type Output = ();

    fn build_args(raw: &Value, context: &AppContext) -> Result<Self::Args, SdkError> {
        build_list(raw, "sales order shipments", &SALES_ORDER_SHIPMENTS, context.registry())
    }

    fn build_output(_raw: &Value, _context: &AppContext) -> Result<(), SdkError> {
        Ok(())
    }
}
