//! A shipping carrier and the services it offers.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{
    build_all, inline_or_reference, localized_text, resolve_or_build, DeliveryService,
    LocalizedDefinition, PickupService,
};
use crate::domain::foundation::{DefinitionIdentifier, Identifiable, LocaleTag, SdkError};
use crate::domain::localization::{Localization, LocalizedText};
use crate::domain::registry::{ReferenceRegistry, Referenceable};
use crate::domain::validation::{decode, Schema, Schematic, StringFormat};

static CARRIER_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    DefinitionIdentifier::schema_fields()
        .required("name", Schema::text().max_length(100))
        .optional("description", Schema::string().single_line().max_length(1000))
        .required("websiteURL", Schema::string().format(StringFormat::Website))
        .required(
            "logo",
            Schema::string().format(StringFormat::FilePath {
                extension: Some("svg"),
            }),
        )
        .required(
            "deliveryServices",
            Schema::array(inline_or_reference(DeliveryService::schema())).min_items(1),
        )
        .optional(
            "pickupServices",
            Schema::array(inline_or_reference(PickupService::schema())),
        )
        .optional("localization", Schema::localization(LocalizedText::schema()))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarrierFields {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "websiteURL")]
    website_url: Url,
    logo: PathBuf,
    #[serde(default)]
    localization: Localization<LocalizedText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "websiteURL")]
    website_url: Url,
    logo: PathBuf,
    delivery_services: Vec<Arc<DeliveryService>>,
    pickup_services: Vec<Arc<PickupService>>,
    #[serde(skip_serializing_if = "Localization::is_empty")]
    localization: Localization<LocalizedText>,
}

impl Carrier {
    pub fn from_value(raw: &Value, registry: &mut ReferenceRegistry) -> Result<Arc<Self>, SdkError> {
        Self::validate(raw)?;
        let fields = decode::<CarrierFields>(raw, Self::LABEL)?;

        let delivery_services = build_all(raw.get("deliveryServices"), registry, |item, registry| {
            resolve_or_build(item, registry, DeliveryService::from_value)
        })?;
        let pickup_services = build_all(raw.get("pickupServices"), registry, |item, registry| {
            resolve_or_build(item, registry, PickupService::from_value)
        })?;

        let carrier = Arc::new(Self {
            identifier: fields.identifier,
            name: fields.name,
            description: fields.description,
            website_url: fields.website_url,
            logo: fields.logo,
            delivery_services,
            pickup_services,
            localization: fields.localization,
        });
        registry.add(carrier.clone())?;
        Ok(carrier)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn website_url(&self) -> &Url {
        &self.website_url
    }

    /// Absolute path to the carrier's SVG logo.
    pub fn logo(&self) -> &PathBuf {
        &self.logo
    }

    pub fn delivery_services(&self) -> &[Arc<DeliveryService>] {
        &self.delivery_services
    }

    pub fn pickup_services(&self) -> &[Arc<PickupService>] {
        &self.pickup_services
    }

    /// Whether the carrier offers any pickup service.
    pub fn supports_pickup(&self) -> bool {
        !self.pickup_services.is_empty()
    }
}

impl Schematic for Carrier {
    const LABEL: &'static str = "carrier";

    fn schema() -> &'static Schema {
        &CARRIER_SCHEMA
    }
}

impl Referenceable for Carrier {
    const KIND: &'static str = "carrier";
}

impl Identifiable for Carrier {
    fn identifier(&self) -> &DefinitionIdentifier {
        &self.identifier
    }
}

impl LocalizedDefinition for Carrier {
    fn localization(&self) -> &Localization<LocalizedText> {
        &self.localization
    }

    fn apply_localization(&self, text: &LocalizedText, locale: &LocaleTag) -> Self {
        let (name, description) = localized_text(text, &self.name, self.description.as_ref());
        Self {
            name,
            description,
            delivery_services: self
                .delivery_services
                .iter()
                .map(|s| Arc::new(s.localize_to(locale)))
                .collect(),
            pickup_services: self
                .pickup_services
                .iter()
                .map(|s| Arc::new(s.localize_to(locale)))
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use crate::domain::validation::Violations;
    use serde_json::json;

    fn raw_carrier() -> Value {
        json!({
            "id": "e1c7a9a2-5d3b-4c8f-a1e2-b3c4d5e6f7a8",
            "code": "ACME",
            "name": "Acme Freight",
            "websiteURL": "https://acme.example.com",
            "logo": "/assets/acme.svg",
            "deliveryServices": [{
                "id": "3b1f5a4e-8c2d-4e6f-9a0b-1c2d3e4f5a6b",
                "name": "Ground",
                "class": "ground",
                "grade": "standard"
            }],
            "pickupServices": [{
                "id": "7d8e9f0a-1b2c-4d3e-8f4a-5b6c7d8e9f0a",
                "name": "One-time pickup"
            }]
        })
    }

    #[test]
    fn builds_the_whole_subtree() {
        let mut registry = ReferenceRegistry::new();
        let carrier = Carrier::from_value(&raw_carrier(), &mut registry).unwrap();

        assert_eq!(carrier.name(), "Acme Freight");
        assert_eq!(carrier.website_url().host_str(), Some("acme.example.com"));
        assert_eq!(carrier.logo(), &PathBuf::from("/assets/acme.svg"));
        assert_eq!(carrier.delivery_services().len(), 1);
        assert!(carrier.supports_pickup());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn reports_every_invalid_field_at_once() {
        let mut raw = raw_carrier();
        raw["websiteURL"] = json!("acme.example.com");
        raw["logo"] = json!("logo.png");
        raw["deliveryServices"] = json!([]);

        let mut registry = ReferenceRegistry::new();
        let err = Carrier::from_value(&raw, &mut registry).unwrap_err();

        let violations = err
            .source()
            .and_then(|e| e.downcast_ref::<Violations>())
            .unwrap();
        assert_eq!(violations.0.len(), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn nested_paths_appear_in_messages() {
        let mut raw = raw_carrier();
        raw["deliveryServices"][0]["grade"] = json!("luxury");

        let mut registry = ReferenceRegistry::new();
        let err = Carrier::from_value(&raw, &mut registry).unwrap_err();
        assert!(err.message.contains("deliveryServices[0].grade"));
    }
}
