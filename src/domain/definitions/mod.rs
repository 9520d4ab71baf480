//! Definition graph - the referenceable entities a plugin describes.
//!
//! Each type validates its raw form, resolves references to definitions
//! built earlier, registers itself in the [`ReferenceRegistry`], and is
//! immutable afterwards: fields are private and there are no setters.
//!
//! # Module Structure
//!
//! - `packaging` - packaging a delivery service accepts
//! - `delivery_confirmation` - signature/confirmation options
//! - `pickup_service` - carrier pickup offerings
//! - `delivery_service` - shipping services (references the two above)
//! - `carrier` - a carrier owning delivery and pickup services

mod carrier;
mod delivery_confirmation;
mod delivery_service;
mod packaging;
mod pickup_service;

pub use carrier::Carrier;
pub use delivery_confirmation::{DeliveryConfirmation, DeliveryConfirmationType};
pub use delivery_service::{DeliveryService, DeliveryServiceClass, DeliveryServiceGrade};
pub use packaging::Packaging;
pub use pickup_service::PickupService;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{LocaleTag, SdkError};
use crate::domain::localization::{Localization, LocalizedText};
use crate::domain::registry::{ReferenceRegistry, Referenceable};
use crate::domain::validation::Schema;

/// A definition with localizable user-facing text.
pub trait LocalizedDefinition: Clone + Serialize {
    fn localization(&self) -> &Localization<LocalizedText>;

    /// Returns a copy with `text` layered over the default name and
    /// description, and children localized to `locale`.
    fn apply_localization(&self, text: &LocalizedText, locale: &LocaleTag) -> Self;

    /// Returns a copy rendered in `locale`.
    fn localize(&self, locale: &str) -> Result<Self, SdkError> {
        let tag = LocaleTag::new(locale)?;
        Ok(self.localize_to(&tag))
    }

    fn localize_to(&self, locale: &LocaleTag) -> Self {
        let text = self.localization().lookup(locale);
        self.apply_localization(&text, locale)
    }

    /// The definition as JSON, optionally localized.
    fn to_json(&self, locale: Option<&str>) -> Result<Value, SdkError> {
        let rendered = match locale {
            Some(locale) => self.localize(locale)?,
            None => self.clone(),
        };
        serde_json::to_value(&rendered)
            .map_err(|e| SdkError::invalid(format!("Unable to serialize definition: {}.", e)))
    }
}

/// A schema accepting either a reference string or an inline definition.
pub(crate) fn inline_or_reference(inline: &Schema) -> Schema {
    Schema::one_of(vec![Schema::text().into(), inline.clone()])
}

/// Resolves a reference string through the registry, or builds and
/// registers an inline definition.
pub(crate) fn resolve_or_build<T, F>(
    raw: &Value,
    registry: &mut ReferenceRegistry,
    build: F,
) -> Result<Arc<T>, SdkError>
where
    T: Referenceable,
    F: FnOnce(&Value, &mut ReferenceRegistry) -> Result<Arc<T>, SdkError>,
{
    match raw {
        Value::String(key) => registry.lookup::<T>(key.into()),
        _ => build(raw, registry),
    }
}

/// Localized name/description, falling back to the defaults.
pub(crate) fn localized_text(
    text: &LocalizedText,
    name: &str,
    description: Option<&String>,
) -> (String, Option<String>) {
    (
        text.name.clone().unwrap_or_else(|| name.to_string()),
        text.description.clone().or_else(|| description.cloned()),
    )
}

/// Builds every element of an optional array field.
pub(crate) fn build_all<T, F>(
    raw: Option<&Value>,
    registry: &mut ReferenceRegistry,
    mut build: F,
) -> Result<Vec<Arc<T>>, SdkError>
where
    F: FnMut(&Value, &mut ReferenceRegistry) -> Result<Arc<T>, SdkError>,
{
    raw.and_then(Value::as_array)
        .map(|items| items.iter().map(|item| build(item, registry)).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}
