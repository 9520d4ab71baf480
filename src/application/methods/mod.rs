//! Method contracts - the per-method inputs, outputs, and defaults that
//! parameterize the invocation pipeline.
//!
//! - `carrier` - shipping methods a carrier app may implement
//! - `order` - methods an order-source app may implement
//!
//! [`Connect`] is shared by both app kinds.

mod carrier;
mod order;

pub use carrier::{
    CancelPickups, CancelShipments, CreateManifest, CreateShipment, RateShipment, SchedulePickup,
    TrackShipment,
};
pub use order::{GetSalesOrdersByDate, ShipmentCancelled, ShipmentCreated};

use once_cell::sync::Lazy;
use serde_json::Value;

use super::pipeline::{AppContext, MethodContract};
use crate::domain::foundation::SdkError;
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{validate, Schema};
use crate::domain::values::Resolvable;

static CONNECTION_ARGS_SCHEMA: Lazy<Schema> = Lazy::new(|| Schema::any_object().into());

/// `connect`: hands the plugin the values a user entered into the app's
/// connection form. The plugin returns nothing.
pub struct Connect;

impl MethodContract for Connect {
    const NAME: &'static str = "connect";
    type Args = Value;
    type Output = ();

    fn build_args(raw: &Value, _context: &AppContext) -> Result<Value, SdkError> {
        validate(raw, "connection arguments", &CONNECTION_ARGS_SCHEMA).cloned()
    }

    fn build_output(_raw: &Value, _context: &AppContext) -> Result<(), SdkError> {
        Ok(())
    }
}

/// Validates a JSON array against `schema`, then builds each element.
fn build_list<T: Resolvable>(
    raw: &Value,
    label: &str,
    schema: &Schema,
    registry: &ReferenceRegistry,
) -> Result<Vec<T>, SdkError> {
    validate(raw, label, schema)?;
    raw.as_array()
        .map(|items| items.iter().map(|item| T::build(item, registry)).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// Replaces a missing output with one derived from the arguments.
fn default_when_missing(output: &mut Value, default: impl FnOnce() -> Value) {
    if output.is_null() {
        *output = default();
    }
}
