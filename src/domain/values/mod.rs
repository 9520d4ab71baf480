//! Business-method values - arguments passed to plugin methods and the
//! results they return.
//!
//! Values are leaves of the graph: they are never registered, but they
//! resolve references (a rate's delivery service, a pickup request's
//! pickup service) through the sealed [`ReferenceRegistry`].
//!
//! # Module Structure
//!
//! - `common` - addresses, weights, charges, documents
//! - `rate` - rate criteria and quotes
//! - `shipment` - new shipments, confirmations, cancellations
//! - `tracking` - tracking criteria and results
//! - `manifest` - end-of-day manifests
//! - `pickup` - pickup requests, confirmations, cancellations
//! - `sales_order` - order-source values

mod common;
mod manifest;
mod pickup;
mod rate;
mod sales_order;
mod shipment;
mod tracking;

pub use common::{
    date_time_schema, money_schema, Address, Charge, ChargeType, Dimensions, Document,
    DocumentFormat, DocumentType, LengthUnit, TimeRange, Weight, WeightUnit,
};
pub use manifest::{LocationMode, Manifest, ManifestConfirmation, NewManifest};
pub use pickup::{
    PickupCancellation, PickupCancellationOutcome, PickupCancellationReason, PickupConfirmation,
    PickupRequest, PickupShipment,
};
pub use rate::{Rate, RateCriteria, RatePackage};
pub use sales_order::{
    SalesOrder, SalesOrderItem, SalesOrderShipment, SalesOrderStatus, SalesOrderTimeRange,
    SalesOrders,
};
pub use shipment::{
    Billing, CancellationStatus, DutiesPaidBy, NewPackage, NewShipment, PackageConfirmation,
    ShipmentCancellation, ShipmentCancellationOutcome, ShipmentConfirmation,
};
pub use tracking::{TrackingCriteria, TrackingEvent, TrackingInfo, TrackingStatus};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{identifiers_schema, SdkError};
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{ObjectSchema, Schema, Schematic};

/// A value built from raw JSON, resolving references through a registry.
pub trait Resolvable: Schematic + Sized {
    /// Builds the value from raw JSON that already passed [`Schematic::schema`].
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError>;

    fn from_value(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        Self::validate(raw)?;
        Self::build(raw, registry)
    }
}

/// How a shipment is named across systems: a tracking number and any
/// carrier- or platform-specific identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<String, String>,
}

impl ShipmentIdentifier {
    pub fn schema_fields() -> ObjectSchema {
        Schema::object()
            .optional("trackingNumber", Schema::text())
            .optional("identifiers", identifiers_schema())
    }
}

/// Capability: the value identifies a shipment.
pub trait ShipmentIdentity {
    fn shipment_identifier(&self) -> &ShipmentIdentifier;

    fn tracking_number(&self) -> Option<&str> {
        self.shipment_identifier().tracking_number.as_deref()
    }

    fn identifiers(&self) -> &BTreeMap<String, String> {
        &self.shipment_identifier().identifiers
    }
}

impl ShipmentIdentity for ShipmentIdentifier {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A small sealed graph shared by value tests.

    use serde_json::{json, Value};

    use crate::domain::definitions::Carrier;
    use crate::domain::registry::ReferenceRegistry;

    pub const CARRIER_ID: &str = "e1c7a9a2-5d3b-4c8f-a1e2-b3c4d5e6f7a8";
    pub const GROUND_ID: &str = "3b1f5a4e-8c2d-4e6f-9a0b-1c2d3e4f5a6b";
    pub const BOX_ID: &str = "9a2a7e7e-1c9b-4b55-8a0c-3a2f1b4c5d6e";
    pub const PICKUP_ID: &str = "7d8e9f0a-1b2c-4d3e-8f4a-5b6c7d8e9f0a";

    pub fn registry() -> ReferenceRegistry {
        let mut registry = ReferenceRegistry::new();
        Carrier::from_value(
            &json!({
                "id": CARRIER_ID,
                "code": "ACME",
                "name": "Acme Freight",
                "websiteURL": "https://acme.example.com",
                "logo": "/assets/acme.svg",
                "deliveryServices": [{
                    "id": GROUND_ID,
                    "code": "GROUND",
                    "name": "Ground",
                    "class": "ground",
                    "grade": "standard",
                    "packaging": [{ "id": BOX_ID, "code": "BOX", "name": "Box" }]
                }],
                "pickupServices": [{ "id": PICKUP_ID, "code": "ONE_TIME", "name": "One-time pickup" }]
            }),
            &mut registry,
        )
        .unwrap();
        registry.finish_loading();
        registry
    }

    pub fn address() -> Value {
        json!({
            "name": "Jane Doe",
            "addressLines": ["1 Main St"],
            "cityLocality": "Austin",
            "stateProvince": "TX",
            "postalCode": "78701",
            "country": "US"
        })
    }
}
