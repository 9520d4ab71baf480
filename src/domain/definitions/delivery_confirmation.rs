//! Delivery confirmation options, e.g. adult signature.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{localized_text, LocalizedDefinition};
use crate::domain::foundation::{DefinitionIdentifier, Identifiable, LocaleTag, SdkError};
use crate::domain::localization::{Localization, LocalizedText};
use crate::domain::registry::{ReferenceRegistry, Referenceable};
use crate::domain::validation::{decode, Schema, Schematic};

/// The kind of proof a carrier collects on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryConfirmationType {
    Delivery,
    Signature,
    AdultSignature,
    DirectSignature,
}

impl DeliveryConfirmationType {
    pub const VALUES: &'static [&'static str] =
        &["delivery", "signature", "adult_signature", "direct_signature"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryConfirmationType::Delivery => "delivery",
            DeliveryConfirmationType::Signature => "signature",
            DeliveryConfirmationType::AdultSignature => "adult_signature",
            DeliveryConfirmationType::DirectSignature => "direct_signature",
        }
    }

    /// Whether someone must sign for the package.
    pub fn requires_signature(&self) -> bool {
        !matches!(self, DeliveryConfirmationType::Delivery)
    }
}

impl fmt::Display for DeliveryConfirmationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static DELIVERY_CONFIRMATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    DefinitionIdentifier::schema_fields()
        .required("name", Schema::text())
        .optional("description", Schema::string().single_line())
        .required(
            "type",
            Schema::string().one_of(DeliveryConfirmationType::VALUES),
        )
        .optional("localization", Schema::localization(LocalizedText::schema()))
        .into()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfirmation {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "type")]
    confirmation_type: DeliveryConfirmationType,
    #[serde(default, skip_serializing_if = "Localization::is_empty")]
    localization: Localization<LocalizedText>,
}

impl DeliveryConfirmation {
    pub fn from_value(raw: &Value, registry: &mut ReferenceRegistry) -> Result<Arc<Self>, SdkError> {
        Self::validate(raw)?;
        let confirmation = Arc::new(decode::<DeliveryConfirmation>(raw, Self::LABEL)?);
        registry.add(confirmation.clone())?;
        Ok(confirmation)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn confirmation_type(&self) -> DeliveryConfirmationType {
        self.confirmation_type
    }
}

impl Schematic for DeliveryConfirmation {
    const LABEL: &'static str = "delivery confirmation";

    fn schema() -> &'static Schema {
        &DELIVERY_CONFIRMATION_SCHEMA
    }
}

impl Referenceable for DeliveryConfirmation {
    const KIND: &'static str = "delivery confirmation";
}

impl Identifiable for DeliveryConfirmation {
    fn identifier(&self) -> &DefinitionIdentifier {
        &self.identifier
    }
}

impl LocalizedDefinition for DeliveryConfirmation {
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
