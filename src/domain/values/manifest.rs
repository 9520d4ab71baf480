//! End-of-day manifest values.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{date_time_schema, Address, Document};
use super::{Resolvable, ShipmentIdentifier};
use crate::domain::foundation::{identifiers_schema, SdkError};
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, Schema, Schematic};

/// How a manifest names the place the shipments leave from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    ShipFrom,
    Location,
}

static NEW_MANIFEST_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("locationMode", Schema::string().one_of(&["ship_from", "location"]))
        .optional("shipFrom", Address::schema())
        .optional("locationID", Schema::text())
        .required("openDateTime", date_time_schema())
        .required("closeDateTime", date_time_schema())
        .required(
            "shipments",
            Schema::array(ShipmentIdentifier::schema_fields()),
        )
        .require_when("locationMode", "ship_from", &["shipFrom"])
        .require_when("locationMode", "location", &["locationID"])
        .into()
});

/// The shipments to hand over to the carrier in one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManifest {
    location_mode: LocationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ship_from: Option<Address>,
    #[serde(rename = "locationID", default, skip_serializing_if = "Option::is_none")]
    location_id: Option<String>,
    open_date_time: String,
    close_date_time: String,
    shipments: Vec<ShipmentIdentifier>,
}

impl NewManifest {
    pub fn location_mode(&self) -> LocationMode {
        self.location_mode
    }

    /// Present whenever the location mode is `ship_from`.
    pub fn ship_from(&self) -> Option<&Address> {
        self.ship_from.as_ref()
    }

    /// Present whenever the location mode is `location`.
    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    pub fn open_date_time(&self) -> &str {
        &self.open_date_time
    }

    pub fn close_date_time(&self) -> &str {
        &self.close_date_time
    }

    pub fn shipments(&self) -> &[ShipmentIdentifier] {
        &self.shipments
    }
}

impl Schematic for NewManifest {
    const LABEL: &'static str = "new manifest";

    fn schema() -> &'static Schema {
        &NEW_MANIFEST_SCHEMA
    }
}

impl Resolvable for NewManifest {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

/// One manifest the carrier created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<String, String>,
    #[serde(default)]
    pub shipments: Vec<ShipmentIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

static MANIFEST_CONFIRMATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    let manifest = Schema::object()
        .optional("identifiers", identifiers_schema())
        .optional("shipments", Schema::array(ShipmentIdentifier::schema_fields()))
        .optional("document", Document::schema());
    Schema::object()
        .required("manifests", Schema::array(manifest))
        .into()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfirmation {
    manifests: Vec<Manifest>,
}

impl ManifestConfirmation {
    pub fn manifests(&self) -> &[Manifest] {
        &self.manifests
    }
}

impl Schematic for ManifestConfirmation {
    const LABEL: &'static str = "manifest confirmation";

    fn schema() -> &'static Schema {
        &MANIFEST_CONFIRMATION_SCHEMA
    }
}

impl Resolvable for ManifestConfirmation {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::fixtures;
    use serde_json::json;

    fn raw_manifest(mode: &str) -> Value {
        json!({
            "locationMode": mode,
            "openDateTime": "2024-03-01T08:00:00Z",
            "closeDateTime": "2024-03-01T17:00:00Z",
            "shipments": [{ "trackingNumber": "1Z999" }]
        })
    }

    #[test]
    fn ship_from_mode_requires_ship_from() {
        let registry = ReferenceRegistry::new();
        let err = NewManifest::from_value(&raw_manifest("ship_from"), &registry).unwrap_err();

        assert!(err.message.contains("shipFrom is required when locationMode is \"ship_from\""));
        assert!(!err.message.contains("locationID"));
    }

    #[test]
    fn location_mode_requires_location_id() {
        let registry = ReferenceRegistry::new();
        let err = NewManifest::from_value(&raw_manifest("location"), &registry).unwrap_err();
        assert!(err.message.contains("locationID is required when locationMode is \"location\""));

        let mut raw = raw_manifest("location");
        raw["locationID"] = json!("DOCK-4");
        let manifest = NewManifest::from_value(&raw, &registry).unwrap();
        assert_eq!(manifest.location_id(), Some("DOCK-4"));
        assert_eq!(manifest.location_mode(), LocationMode::Location);
    }

    #[test]
    fn ship_from_mode_accepts_address() {
        let registry = ReferenceRegistry::new();
        let mut raw = raw_manifest("ship_from");
        raw["shipFrom"] = fixtures::address();

        let manifest = NewManifest::from_value(&raw, &registry).unwrap();
        assert_eq!(manifest.ship_from().unwrap().city_locality, "Austin");
        assert_eq!(manifest.shipments()[0].tracking_number.as_deref(), Some("1Z999"));
    }
}
