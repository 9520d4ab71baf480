//! Tracking values.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{date_time_schema, Address};
use super::{Resolvable, ShipmentIdentifier, ShipmentIdentity};
use crate::domain::foundation::SdkError;
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, Schema, Schematic};

static TRACKING_CRITERIA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    ShipmentIdentifier::schema_fields()
        .optional("returns", Schema::boolean())
        .into()
});

/// Which shipment to track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCriteria {
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
    #[serde(default)]
    returns: bool,
}

impl TrackingCriteria {
    /// Whether the shipment being tracked is a return.
    pub fn returns(&self) -> bool {
        self.returns
    }
}

impl ShipmentIdentity for TrackingCriteria {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

impl Schematic for TrackingCriteria {
    const LABEL: &'static str = "tracking criteria";

    fn schema() -> &'static Schema {
        &TRACKING_CRITERIA_SCHEMA
    }
}

impl Resolvable for TrackingCriteria {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Unknown,
    NotYetInSystem,
    InTransit,
    Delivered,
    Exception,
}

impl TrackingStatus {
    pub const VALUES: &'static [&'static str] =
        &["unknown", "not_yet_in_system", "in_transit", "delivered", "exception"];
}

/// One scan or status change reported by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub date_time: String,
    pub status: TrackingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl TrackingEvent {
    fn schema() -> Schema {
        Schema::object()
            .required("dateTime", date_time_schema())
            .required("status", Schema::string().one_of(TrackingStatus::VALUES))
            .optional("description", Schema::string().single_line())
            .optional("code", Schema::text())
            .optional("address", Address::schema())
            .into()
    }
}

static TRACKING_INFO_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    ShipmentIdentifier::schema_fields()
        .optional("deliveryDateTime", date_time_schema())
        .required("events", Schema::array(TrackingEvent::schema()))
        .into()
});

/// Where a shipment is, as reported by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_date_time: Option<String>,
    events: Vec<TrackingEvent>,
}

impl TrackingInfo {
    pub fn delivery_date_time(&self) -> Option<&str> {
        self.delivery_date_time.as_deref()
    }

    pub fn events(&self) -> &[TrackingEvent] {
        &self.events
    }

    /// The most recently reported event.
    pub fn latest_event(&self) -> Option<&TrackingEvent> {
        self.events.iter().max_by(|a, b| a.date_time.cmp(&b.date_time))
    }

    pub fn status(&self) -> TrackingStatus {
        self.latest_event()
            .map(|e| e.status)
            .unwrap_or(TrackingStatus::Unknown)
    }
}

impl ShipmentIdentity for TrackingInfo {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

impl Schematic for TrackingInfo {
    const LABEL: &'static str = "tracking info";

    fn schema() -> &'static Schema {
        &TRACKING_INFO_SCHEMA
    }
}

impl Resolvable for TrackingInfo {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_comes_from_latest_event() {
        let registry = ReferenceRegistry::new();
        let raw = json!({
            "trackingNumber": "1Z999",
            "events": [
                { "dateTime": "2024-03-02T10:00:00Z", "status": "delivered" },
                { "dateTime": "2024-03-01T08:00:00Z", "status": "in_transit" }
            ]
        });
        let info = TrackingInfo::from_value(&raw, &registry).unwrap();

        assert_eq!(info.status(), TrackingStatus::Delivered);
        assert_eq!(info.tracking_number(), Some("1Z999"));
    }

    #[test]
    fn no_events_is_unknown() {
        let registry = ReferenceRegistry::new();
        let info = TrackingInfo::from_value(&json!({ "events": [] }), &registry).unwrap();
        assert_eq!(info.status(), TrackingStatus::Unknown);
    }

    #[test]
    fn criteria_reject_unknown_fields() {
        let registry = ReferenceRegistry::new();
        let err = TrackingCriteria::from_value(&json!({ "tracking": "1Z" }), &registry).unwrap_err();
        assert!(err.message.contains("tracking is not allowed"));
    }
}
