//! Pickup scheduling and cancellation values.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::common::{
    resolve, resolve_optional, serialize_optional_reference, serialize_reference, Address, Charge,
    TimeRange,
};
use super::{CancellationStatus, Resolvable, ShipmentIdentifier, ShipmentIdentity};
use crate::domain::definitions::{DeliveryService, PickupService};
use crate::domain::foundation::{identifiers_schema, Currency, MonetaryValue, SdkError};
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, Schema, Schematic};

/// A shipment the carrier should collect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupShipment {
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
    #[serde(
        serialize_with = "serialize_optional_reference",
        skip_serializing_if = "Option::is_none"
    )]
    delivery_service: Option<Arc<DeliveryService>>,
}

impl PickupShipment {
    fn schema() -> Schema {
        ShipmentIdentifier::schema_fields()
            .optional("deliveryService", Schema::reference())
            .into()
    }

    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let identifier = ShipmentIdentifier {
            tracking_number: raw
                .get("trackingNumber")
                .and_then(Value::as_str)
                .map(str::to_string),
            identifiers: match raw.get("identifiers") {
                Some(identifiers) => decode(identifiers, "pickup shipment")?,
                None => BTreeMap::new(),
            },
        };
        Ok(Self {
            identifier,
            delivery_service: resolve_optional::<DeliveryService>(raw, "deliveryService", registry)?,
        })
    }

    pub fn delivery_service(&self) -> Option<&Arc<DeliveryService>> {
        self.delivery_service.as_ref()
    }
}

impl ShipmentIdentity for PickupShipment {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

fn build_shipments(raw: Option<&Value>, registry: &ReferenceRegistry) -> Result<Vec<PickupShipment>, SdkError> {
    raw.and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .map(|shipment| PickupShipment::build(shipment, registry))
        .collect()
}

static PICKUP_REQUEST_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("pickupService", Schema::reference())
        .required("timeWindow", TimeRange::schema())
        .required("address", Address::schema())
        .required("shipments", Schema::array(PickupShipment::schema()).min_items(1))
        .optional("notes", Schema::array(Schema::string()))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickupRequestFields {
    time_window: TimeRange,
    address: Address,
    #[serde(default)]
    notes: Vec<String>,
}

/// A request for the carrier to come and collect shipments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    #[serde(serialize_with = "serialize_reference")]
    pickup_service: Arc<PickupService>,
    time_window: TimeRange,
    address: Address,
    shipments: Vec<PickupShipment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl PickupRequest {
    pub fn pickup_service(&self) -> &Arc<PickupService> {
        &self.pickup_service
    }

    pub fn time_window(&self) -> &TimeRange {
        &self.time_window
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn shipments(&self) -> &[PickupShipment] {
        &self.shipments
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl Schematic for PickupRequest {
    const LABEL: &'static str = "pickup request";

    fn schema() -> &'static Schema {
        &PICKUP_REQUEST_SCHEMA
    }
}

impl Resolvable for PickupRequest {
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let fields = decode::<PickupRequestFields>(raw, Self::LABEL)?;
        Ok(Self {
            pickup_service: resolve::<PickupService>(raw, "pickupService", registry)?,
            time_window: fields.time_window,
            address: fields.address,
            shipments: build_shipments(raw.get("shipments"), registry)?,
            notes: fields.notes,
        })
    }
}

static PICKUP_CONFIRMATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("id", Schema::text())
        .optional("identifiers", identifiers_schema())
        .required("timeWindows", Schema::array(TimeRange::schema()).min_items(1))
        .required("charges", Schema::array(Charge::schema()))
        .optional("shipments", Schema::array(PickupShipment::schema()))
        .optional("notes", Schema::array(Schema::string()))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickupConfirmationFields {
    id: String,
    #[serde(default)]
    identifiers: BTreeMap<String, String>,
    time_windows: Vec<TimeRange>,
    charges: Vec<Charge>,
    #[serde(default)]
    notes: Vec<String>,
}

/// The carrier's confirmation of a scheduled pickup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupConfirmation {
    id: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    identifiers: BTreeMap<String, String>,
    time_windows: Vec<TimeRange>,
    charges: Vec<Charge>,
    shipments: Vec<PickupShipment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl PickupConfirmation {
    /// The carrier's confirmation number for the pickup.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identifiers(&self) -> &BTreeMap<String, String> {
        &self.identifiers
    }

    pub fn time_windows(&self) -> &[TimeRange] {
        &self.time_windows
    }

    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn shipments(&self) -> &[PickupShipment] {
        &self.shipments
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn total_amount(&self, fallback_currency: &Currency) -> Result<MonetaryValue, SdkError> {
        MonetaryValue::sum(self.charges.iter().map(|c| &c.amount), fallback_currency)
    }
}

impl Schematic for PickupConfirmation {
    const LABEL: &'static str = "pickup confirmation";

    fn schema() -> &'static Schema {
        &PICKUP_CONFIRMATION_SCHEMA
    }
}

impl Resolvable for PickupConfirmation {
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let fields = decode::<PickupConfirmationFields>(raw, Self::LABEL)?;
        Ok(Self {
            id: fields.id,
            identifiers: fields.identifiers,
            time_windows: fields.time_windows,
            charges: fields.charges,
            shipments: build_shipments(raw.get("shipments"), registry)?,
            notes: fields.notes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupCancellationReason {
    NotReady,
    Price,
    Schedule,
    CarrierFailedPickup,
    Other,
}

static PICKUP_CANCELLATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("cancellationID", Schema::uuid())
        .required("id", Schema::text())
        .optional("identifiers", identifiers_schema())
        .required("pickupService", Schema::reference())
        .required(
            "reason",
            Schema::string().one_of(&["not_ready", "price", "schedule", "carrier_failed_pickup", "other"]),
        )
        .optional("notes", Schema::array(Schema::string()))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickupCancellationFields {
    #[serde(rename = "cancellationID")]
    cancellation_id: Uuid,
    id: String,
    #[serde(default)]
    identifiers: BTreeMap<String, String>,
    reason: PickupCancellationReason,
    #[serde(default)]
    notes: Vec<String>,
}

/// A request to cancel a previously scheduled pickup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupCancellation {
    #[serde(rename = "cancellationID")]
    cancellation_id: Uuid,
    id: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    identifiers: BTreeMap<String, String>,
    #[serde(serialize_with = "serialize_reference")]
    pickup_service: Arc<PickupService>,
    reason: PickupCancellationReason,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl PickupCancellation {
    pub fn cancellation_id(&self) -> Uuid {
        self.cancellation_id
    }

    /// The pickup's confirmation number.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identifiers(&self) -> &BTreeMap<String, String> {
        &self.identifiers
    }

    pub fn pickup_service(&self) -> &Arc<PickupService> {
        &self.pickup_service
    }

    pub fn reason(&self) -> PickupCancellationReason {
        self.reason
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl Schematic for PickupCancellation {
    const LABEL: &'static str = "pickup cancellation";

    fn schema() -> &'static Schema {
        &PICKUP_CANCELLATION_SCHEMA
    }
}

impl Resolvable for PickupCancellation {
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let fields = decode::<PickupCancellationFields>(raw, Self::LABEL)?;
        Ok(Self {
            cancellation_id: fields.cancellation_id,
            id: fields.id,
            identifiers: fields.identifiers,
            pickup_service: resolve::<PickupService>(raw, "pickupService", registry)?,
            reason: fields.reason,
            notes: fields.notes,
        })
    }
}

static PICKUP_CANCELLATION_OUTCOME_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("cancellationID", Schema::uuid())
        .optional("status", Schema::string().one_of(CancellationStatus::VALUES))
        .optional("confirmationNumber", Schema::text())
        .optional("code", Schema::text())
        .optional("description", Schema::string().single_line())
        .optional("notes", Schema::array(Schema::string()))
        .into()
});

/// The result of cancelling one pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupCancellationOutcome {
    #[serde(rename = "cancellationID")]
    cancellation_id: Uuid,
    #[serde(default)]
    status: CancellationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confirmation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl PickupCancellationOutcome {
    pub fn succeeded(cancellation_id: Uuid) -> Self {
        Self {
            cancellation_id,
            status: CancellationStatus::Success,
            confirmation_number: None,
            code: None,
            description: None,
            notes: Vec::new(),
        }
    }

    pub fn cancellation_id(&self) -> Uuid {
        self.cancellation_id
    }

    pub fn status(&self) -> CancellationStatus {
        self.status
    }

    pub fn confirmation_number(&self) -> Option<&str> {
        self.confirmation_number.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl Schematic for PickupCancellationOutcome {
    const LABEL: &'static str = "pickup cancellation outcome";

    fn schema() -> &'static Schema {
        &PICKUP_CANCELLATION_OUTCOME_SCHEMA
    }
}

impl Resolvable for PickupCancellationOutcome {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}
