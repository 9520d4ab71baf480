//! Shipping services a carrier offers, e.g. "Priority Overnight".

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    build_all, inline_or_reference, localized_text, resolve_or_build, DeliveryConfirmation,
    LocalizedDefinition, Packaging,
};
use crate::domain::foundation::{DefinitionIdentifier, Identifiable, LocaleTag, SdkError};
use crate::domain::localization::{Localization, LocalizedText};
use crate::domain::registry::{ReferenceRegistry, Referenceable};
use crate::domain::validation::{decode, Schema, Schematic};

/// Transit-time class of a delivery service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryServiceClass {
    Ground,
    OneDay,
    TwoDay,
    ThreeDay,
}

impl DeliveryServiceClass {
    pub const VALUES: &'static [&'static str] = &["ground", "one_day", "two_day", "three_day"];
}

/// Price/speed tier of a delivery service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryServiceGrade {
    Economy,
    Standard,
    Expedited,
    Overnight,
}

impl DeliveryServiceGrade {
    pub const VALUES: &'static [&'static str] = &["economy", "standard", "expedited", "overnight"];
}

static DELIVERY_SERVICE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    DefinitionIdentifier::schema_fields()
        .required("name", Schema::text())
        .optional("description", Schema::string().single_line())
        .required("class", Schema::string().one_of(DeliveryServiceClass::VALUES))
        .required("grade", Schema::string().one_of(DeliveryServiceGrade::VALUES))
        .optional("isReturn", Schema::boolean())
        .optional(
            "packaging",
            Schema::array(inline_or_reference(Packaging::schema())),
        )
        .optional(
            "deliveryConfirmations",
            Schema::array(inline_or_reference(DeliveryConfirmation::schema())),
        )
        .optional("localization", Schema::localization(LocalizedText::schema()))
        .into()
});

/// Scalar fields decoded straight from the raw form.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryServiceFields {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(default)]
    description: Option<String>,
    class: DeliveryServiceClass,
    grade: DeliveryServiceGrade,
    #[serde(default)]
    is_return: bool,
    #[serde(default)]
    localization: Localization<LocalizedText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryService {
    #[serde(flatten)]
    identifier: DefinitionIdentifier,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    class: DeliveryServiceClass,
    grade: DeliveryServiceGrade,
    is_return: bool,
    packaging: Vec<Arc<Packaging>>,
    delivery_confirmations: Vec<Arc<DeliveryConfirmation>>,
    #[serde(skip_serializing_if = "Localization::is_empty")]
    localization: Localization<LocalizedText>,
}

impl DeliveryService {
    /// Validates and builds a delivery service, resolving its packaging and
    /// confirmations by reference or building them inline.
    pub fn from_value(raw: &Value, registry: &mut ReferenceRegistry) -> Result<Arc<Self>, SdkError> {
        Self::validate(raw)?;
        let fields = decode::<DeliveryServiceFields>(raw, Self::LABEL)?;

        let packaging = build_all(raw.get("packaging"), registry, |item, registry| {
            resolve_or_build(item, registry, Packaging::from_value)
        })?;
        let delivery_confirmations =
            build_all(raw.get("deliveryConfirmations"), registry, |item, registry| {
                resolve_or_build(item, registry, DeliveryConfirmation::from_value)
            })?;

        let service = Arc::new(Self {
            identifier: fields.identifier,
            name: fields.name,
            description: fields.description,
            class: fields.class,
            grade: fields.grade,
            is_return: fields.is_return,
            packaging,
            delivery_confirmations,
            localization: fields.localization,
        });
        registry.add(service.clone())?;
        Ok(service)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn class(&self) -> DeliveryServiceClass {
        self.class
    }

    pub fn grade(&self) -> DeliveryServiceGrade {
        self.grade
    }

    /// Whether this service ships returns back to the sender.
    pub fn is_return(&self) -> bool {
        self.is_return
    }

    pub fn packaging(&self) -> &[Arc<Packaging>] {
        &self.packaging
    }

    pub fn delivery_confirmations(&self) -> &[Arc<DeliveryConfirmation>] {
        &self.delivery_confirmations
    }
}

impl Schematic for DeliveryService {
    const LABEL: &'static str = "delivery service";

    fn schema() -> &'static Schema {
        &DELIVERY_SERVICE_SCHEMA
    }
}

impl Referenceable for DeliveryService {
    const KIND: &'static str = "delivery service";
}

impl Identifiable for DeliveryService {
    fn identifier(&self) -> &DefinitionIdentifier {
        &self.identifier
    }
}

impl LocalizedDefinition for DeliveryService {
    fn localization(&self) -> &Localization<LocalizedText> {
        &self.localization
    }

    fn apply_localization(&self, text: &LocalizedText, locale: &LocaleTag) -> Self {
        let (name, description) = localized_text(text, &self.name, self.description.as_ref());
        Self {
            name,
            description,
            packaging: self
                .packaging
                .iter()
                .map(|p| Arc::new(p.localize_to(locale)))
                .collect(),
            delivery_confirmations: self
                .delivery_confirmations
                .iter()
                .map(|c| Arc::new(c.localize_to(locale)))
                .collect(),
            ..self.clone()
        }
    }
}
