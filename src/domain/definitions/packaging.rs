//! Packaging a delivery service accepts.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{localized_text, LocalizedDefinition};
use crate::domain::foundation::{DefinitionIdentifier, Identifiable, LocaleTag, SdkError};
use crate::domain::localization::{Localization, LocalizedText};
use crate::domain::registry::{ReferenceRegistry, Referenceable};
use crate::domain::validation::{decode, Schema, Schematic};

static PACKAGING_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    DefinitionIdentifier::schema_fields()
        .required("name", Schema::text())
        .optional("description", Schema::string().single_line())
        .optional("requiresWeight", Schema::boolean())
        .optional("requiresDimensions", Schema::boolean())
        .optional("localization", Schema::localization(LocalizedText::schema()))
        .into()
});

/// A type of packaging, e.g. "Flat Rate Envelope".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packaging {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    requires_weight: bool,
    #[serde(default)]
    requires_dimensions: bool,
    #[serde(default, skip_serializing_if = "Localization::is_empty")]
    localization: Localization<LocalizedText>,
}

impl Packaging {
    /// Validates, builds and registers a packaging definition.
    pub fn from_value(raw: &Value, registry: &mut ReferenceRegistry) -> Result<Arc<Self>, SdkError> {
        Self::validate(raw)?;
        let packaging = Arc::new(decode::<Packaging>(raw, Self::LABEL)?);
        registry.add(packaging.clone())?;
        Ok(packaging)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether a shipment in this packaging must state its weight.
    pub fn requires_weight(&self) -> bool {
        self.requires_weight
    }

    pub fn requires_dimensions(&self) -> bool {
        self.requires_dimensions
    }
}

impl Schematic for Packaging {
    const LABEL: &'static str = "packaging";

    fn schema() -> &'static Schema {
        &PACKAGING_SCHEMA
    }
}

impl Referenceable for Packaging {
    const KIND: &'static str = "packaging";
}

impl Identifiable for Packaging {
    fn identifier(&self) -> &DefinitionIdentifier {
        &self.identifier
    }
}

impl LocalizedDefinition for Packaging {
    fn localization(&self) -> &Localization<LocalizedText> {
        &self.localization
    }

    fn apply_localization(&self, text: &LocalizedText, _locale: &LocaleTag) -> Self {
        let (name, description) = localized_text(text, &self.name, self.description.as_ref());
        Self {
            name,
            description,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    fn raw() -> Value {
        json!({
            "id": "9a2a7e7e-1c9b-4b55-8a0c-3a2f1b4c5d6e",
            "code": "ENV",
            "name": "Envelope",
            "requiresWeight": true,
            "localization": { "es": { "name": "Sobre" } }
        })
    }

    #[test]
    fn builds_and_registers() {
        let mut registry = ReferenceRegistry::new();
        let packaging = Packaging::from_value(&raw(), &mut registry).unwrap();

        assert_eq!(packaging.name(), "Envelope");
        assert!(packaging.requires_weight());
        assert!(!packaging.requires_dimensions());
        assert_eq!(packaging.code(), Some("ENV"));

        let found = registry.lookup::<Packaging>("ENV".into()).unwrap();
        assert!(Arc::ptr_eq(&found, &packaging));
    }

    #[test]
    fn identity_reads_the_same_through_either_trait() {
        fn registered_id<T: Referenceable>(definition: &T) -> String {
            definition.identifier().id.to_string()
        }

        let mut registry = ReferenceRegistry::new();
        let packaging = Packaging::from_value(&raw(), &mut registry).unwrap();

        assert_eq!(packaging.identifier().id, packaging.id());
        assert_eq!(registered_id(packaging.as_ref()), "9a2a7e7e-1c9b-4b55-8a0c-3a2f1b4c5d6e");
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut registry = ReferenceRegistry::new();
        let err = Packaging::from_value(&json!({ "id": "9a2a7e7e-1c9b-4b55-8a0c-3a2f1b4c5d6e" }), &mut registry)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Invalid);
        assert!(err.message.starts_with("Invalid packaging:"));
        assert!(err.message.contains("name is required"));
        assert!(registry.is_empty());
    }

    #[test]
    fn localize_returns_a_new_instance() {
        let mut registry = ReferenceRegistry::new();
        let packaging = Packaging::from_value(&raw(), &mut registry).unwrap();
        let spanish = packaging.localize("es-MX").unwrap();

        assert_eq!(spanish.name(), "Sobre");
        assert_eq!(packaging.name(), "Envelope");
        assert_eq!(spanish.id(), packaging.id());
    }

    #[test]
    fn to_json_without_locale_keeps_the_table() {
        let mut registry = ReferenceRegistry::new();
        let packaging = Packaging::from_value(&raw(), &mut registry).unwrap();
        let json = packaging.to_json(None).unwrap();

        assert_eq!(json["name"], "Envelope");
        assert_eq!(json["localization"]["es"]["name"], "Sobre");
        assert_eq!(packaging.to_json(Some("es")).unwrap()["name"], "Sobre");
    }

    #[test]
    fn invalid_locale_is_rejected() {
        let mut registry = ReferenceRegistry::new();
        let packaging = Packaging::from_value(&raw(), &mut registry).unwrap();
        assert!(packaging.localize("english").is_err());
    }
}
