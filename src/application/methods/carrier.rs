//! Carrier app methods.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::{build_list, default_when_missing};
use crate::application::pipeline::{AppContext, MethodContract};
use crate::domain::foundation::SdkError;
use crate::domain::validation::{Schema, Schematic};
use crate::domain::values::{
    ManifestConfirmation, NewManifest, NewShipment, PickupCancellation, PickupCancellationOutcome,
    PickupConfirmation, PickupRequest, Rate, RateCriteria, Resolvable, ShipmentCancellation,
    ShipmentCancellationOutcome, ShipmentConfirmation, TrackingCriteria, TrackingInfo,
};

static SHIPMENT_CANCELLATIONS: Lazy<Schema> =
    Lazy::new(|| Schema::array(ShipmentCancellation::schema().clone()).min_items(1).into());
static SHIPMENT_CANCELLATION_OUTCOMES: Lazy<Schema> =
    Lazy::new(|| Schema::array(ShipmentCancellationOutcome::schema().clone()).into());
static RATES: Lazy<Schema> = Lazy::new(|| Schema::array(Rate::schema().clone()).into());
static PICKUP_CANCELLATIONS: Lazy<Schema> =
    Lazy::new(|| Schema::array(PickupCancellation::schema().clone()).min_items(1).into());
static PICKUP_CANCELLATION_OUTCOMES: Lazy<Schema> =
    Lazy::new(|| Schema::array(PickupCancellationOutcome::schema().clone()).into());

/// A successful outcome for every cancellation in `args`.
fn all_succeeded(args: &Value) -> Value {
    let outcomes = args
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("cancellationID"))
                .map(|id| json!({ "cancellationID": id, "status": "success" }))
                .collect()
        })
        .unwrap_or_default();
    Value::Array(outcomes)
}

/// `createShipment`: books one shipment and returns its labels and charges.
pub struct CreateShipment;

impl MethodContract for CreateShipment {
    const NAME: &'static str = "createShipment";
    type Args = NewShipment;
    type Output = ShipmentConfirmation;

    fn build_args(raw: &Value, context: &AppContext) -> Result<NewShipment, SdkError> {
        NewShipment::from_value(raw, context.registry())
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<ShipmentConfirmation, SdkError> {
        ShipmentConfirmation::from_value(raw, context.registry())
    }
}

/// `cancelShipments`: cancels previously created shipments. A plugin that
/// returns nothing is taken to have cancelled every one.
pub struct CancelShipments;

impl MethodContract for CancelShipments {
    const NAME: &'static str = "cancelShipments";
    type Args = Vec<ShipmentCancellation>;
    type Output = Vec<ShipmentCancellationOutcome>;

    fn build_args(raw: &Value, context: &AppContext) -> Result<Self::Args, SdkError> {
        build_list(raw, "shipment cancellations", &SHIPMENT_CANCELLATIONS, context.registry())
    }

    fn fill_defaults(args: &Value, output: &mut Value) {
        default_when_missing(output, || all_succeeded(args));
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<Self::Output, SdkError> {
        build_list(
            raw,
            "shipment cancellation outcomes",
            &SHIPMENT_CANCELLATION_OUTCOMES,
            context.registry(),
        )
    }
}

/// `rateShipment`: quotes the delivery services that can carry a shipment.
pub struct RateShipment;

impl MethodContract for RateShipment {
    const NAME: &'static str = "rateShipment";
    type Args = RateCriteria;
    type Output = Vec<Rate>;

    fn build_args(raw: &Value, context: &AppContext) -> Result<RateCriteria, SdkError> {
        RateCriteria::from_value(raw, context.registry())
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<Vec<Rate>, SdkError> {
        build_list(raw, "rates", &RATES, context.registry())
    }
}

/// `trackShipment`: reports where a shipment is.
pub struct TrackShipment;

impl MethodContract for TrackShipment {
    const NAME: &'static str = "trackShipment";
    type Args = TrackingCriteria;
    type Output = TrackingInfo;

    fn build_args(raw: &Value, context: &AppContext) -> Result<TrackingCriteria, SdkError> {
        TrackingCriteria::from_value(raw, context.registry())
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<TrackingInfo, SdkError> {
        TrackingInfo::from_value(raw, context.registry())
    }
}

/// `createManifest`: closes out a day's shipments.
pub struct CreateManifest;

impl MethodContract for CreateManifest {
    const NAME: &'static str = "createManifest";
    type Args = NewManifest;
    type Output = ManifestConfirmation;

    fn build_args(raw: &Value, context: &AppContext) -> Result<NewManifest, SdkError> {
        NewManifest::from_value(raw, context.registry())
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<ManifestConfirmation, SdkError> {
        ManifestConfirmation::from_value(raw, context.registry())
    }
}

/// `schedulePickup`: books a pickup. When the confirmation omits the
/// shipments, the requested ones are assumed.
pub struct SchedulePickup;

impl MethodContract for SchedulePickup {
    const NAME: &'static str = "schedulePickup";
    type Args = PickupRequest;
    type Output = PickupConfirmation;

    fn build_args(raw: &Value, context: &AppContext) -> Result<PickupRequest, SdkError> {
        PickupRequest::from_value(raw, context.registry())
    }

    fn fill_defaults(args: &Value, output: &mut Value) {
        if let (Some(confirmation), Some(shipments)) = (output.as_object_mut(), args.get("shipments")) {
            confirmation
                .entry("shipments")
                .or_insert_with(|| shipments.clone());
        }
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<PickupConfirmation, SdkError> {
        PickupConfirmation::from_value(raw, context.registry())
    }
}

/// `cancelPickups`: cancels previously scheduled pickups. A plugin that
/// returns nothing is taken to have cancelled every one.
pub struct CancelPickups;

impl MethodContract for CancelPickups {
    const NAME: &'static str = "cancelPickups";
    type Args = Vec<PickupCancellation>;
    type Output = Vec<PickupCancellationOutcome>;

    fn build_args(raw: &Value, context: &AppContext) -> Result<Self::Args, SdkError> {
        build_list(raw, "pickup cancellations", &PICKUP_CANCELLATIONS, context.registry())
    }

    fn fill_defaults(args: &Value, output: &mut Value) {
        default_when_missing(output, || all_succeeded(args));
    }

    fn build_output(raw: &Value, context: &AppContext) -> Result<Self::Output, SdkError> {
        build_list(
            raw,
            "pickup cancellation outcomes",
            &PICKUP_CANCELLATION_OUTCOMES,
            context.registry(),
        )
    }
}
