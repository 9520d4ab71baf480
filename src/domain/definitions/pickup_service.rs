//! Pickup offerings, e.g. "One-time pickup".

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{localized_text, LocalizedDefinition};
use crate::domain::foundation::{DefinitionIdentifier, Identifiable, LocaleTag, SdkError};
use crate::domain::localization::{Localization, LocalizedText};
use crate::domain::registry::{ReferenceRegistry, Referenceable};
use crate::domain::validation::{decode, Schema, Schematic};

static PICKUP_SERVICE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    DefinitionIdentifier::schema_fields()
        .required("name", Schema::text())
        .optional("description", Schema::string().single_line())
        .optional("localization", Schema::localization(LocalizedText::schema()))
        .into()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupService {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Localization::is_empty")]
    localization: Localization<LocalizedText>,
}

impl PickupService {
    pub fn from_value(raw: &Value, registry: &mut ReferenceRegistry) -> Result<Arc<Self>, SdkError> {
        Self::validate(raw)?;
        let service = Arc::new(decode::<PickupService>(raw, Self::LABEL)?);
        registry.add(service.clone())?;
        Ok(service)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Schematic for PickupService {
    const LABEL: &'static str = "pickup service";

    fn schema() -> &'static Schema {
        &PICKUP_SERVICE_SCHEMA
    }
}

impl Referenceable for PickupService {
    const KIND: &'static str = "pickup service";
}

impl Identifiable for PickupService {
    fn identifier(&self) -> &DefinitionIdentifier {
        &self.identifier
    }
}

impl LocalizedDefinition for PickupService {
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
