//! Locale-keyed tables of partial field overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{LocaleTag, SdkError};
use crate::domain::validation::{decode, ObjectSchema, Schema};

/// A partial set of user-facing fields that can be layered over defaults.
pub trait Localizable: Clone + Default {
    /// Fills every field that is unset in `self` from `fallback`.
    fn fill_missing(&mut self, fallback: &Self);
}

/// The localizable text every definition carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LocalizedText {
    /// Per-locale schema for `{ name?, description? }`.
    pub fn schema() -> ObjectSchema {
        Schema::object()
            .optional("name", Schema::text())
            .optional("description", Schema::string().single_line())
    }
}

impl Localizable for LocalizedText {
    fn fill_missing(&mut self, fallback: &Self) {
        if self.name.is_none() {
            self.name = fallback.name.clone();
        }
        if self.description.is_none() {
            self.description = fallback.description.clone();
        }
    }
}

impl Localizable for Map<String, Value> {
    fn fill_missing(&mut self, fallback: &Self) {
        for (key, value) in fallback {
            self.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

/// Locale tag → partial overrides.
///
/// Built once from the definition and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localization<T> {
    values: BTreeMap<LocaleTag, T>,
}

impl<T> Default for Localization<T> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<T: Localizable> Localization<T> {
    pub fn new(values: BTreeMap<LocaleTag, T>) -> Self {
        Self { values }
    }

    /// Resolves the effective fields for `locale`.
    ///
    /// A regional tag (`en-US`) starts from its own entry and falls back to
    /// the bare language (`en`). A bare language tag uses its own entry;
    /// only when that entry is missing are its regional dialects merged,
    /// in tag order, as defaults.
    pub fn lookup(&self, locale: &LocaleTag) -> T {
        let exact = self.values.get(locale).cloned();

        if !locale.is_bare_language() {
            let mut result = exact.unwrap_or_default();
            if let Some(base) = self.values.get(&locale.language_tag()) {
                result.fill_missing(base);
            }
            return result;
        }

        if let Some(result) = exact {
            return result;
        }

        let mut merged = T::default();
        for (tag, entry) in &self.values {
            if tag.language() == locale.language() && !tag.is_bare_language() {
                merged.fill_missing(entry);
            }
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn locales(&self) -> impl Iterator<Item = &LocaleTag> {
        self.values.keys()
    }
}

impl<T: Localizable + Serialize> Localization<T> {
    /// The whole table, untouched, for persistence.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.values).unwrap_or(Value::Null)
    }
}

impl<T: Localizable + serde::de::DeserializeOwned> Localization<T> {
    /// Builds a table from a raw value that already passed its schema.
    pub fn from_value(raw: Option<&Value>) -> Result<Self, SdkError> {
        match raw {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(raw) => Ok(Self::new(decode(raw, "localization")?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tag(s: &str) -> LocaleTag {
        LocaleTag::new(s).unwrap()
    }

    fn text(name: Option<&str>, description: Option<&str>) -> LocalizedText {
        LocalizedText {
            name: name.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    fn table() -> Localization<LocalizedText> {
        let mut values = BTreeMap::new();
        values.insert(tag("en"), text(Some("A"), None));
        values.insert(tag("en-US"), text(Some("B"), Some("D")));
        Localization::new(values)
    }

    #[test]
    fn regional_entry_wins_over_language() {
        assert_eq!(table().lookup(&tag("en-US")), text(Some("B"), Some("D")));
    }

    #[test]
    fn missing_region_falls_back_to_language() {
        assert_eq!(table().lookup(&tag("en-GB")), text(Some("A"), None));
    }

    #[test]
    fn bare_language_does_not_leak_dialect_fields() {
        assert_eq!(table().lookup(&tag("en")), text(Some("A"), None));
    }

    #[test]
    fn unknown_language_is_empty() {
        assert_eq!(table().lookup(&tag("fr")), LocalizedText::default());
    }

    #[test]
    fn bare_language_without_entry_merges_dialects() {
        let mut values = BTreeMap::new();
        values.insert(tag("es-ES"), text(Some("Caja"), None));
        values.insert(tag("es-MX"), text(Some("Paquete"), Some("Chico")));
        let table = Localization::new(values);

        assert_eq!(table.lookup(&tag("es")), text(Some("Caja"), Some("Chico")));
    }

    #[test]
    fn region_fills_only_missing_fields_from_language() {
        let mut values = BTreeMap::new();
        values.insert(tag("de"), text(Some("Paket"), Some("Standard")));
        values.insert(tag("de-AT"), text(None, Some("Österreich")));
        let table = Localization::new(values);

        assert_eq!(table.lookup(&tag("de-AT")), text(Some("Paket"), Some("Österreich")));
    }

    #[test]
    fn json_maps_merge_key_by_key() {
        let mut values = BTreeMap::new();
        values.insert(tag("en"), json!({ "title": "Hi", "footer": "Bye" }).as_object().unwrap().clone());
        values.insert(tag("en-AU"), json!({ "title": "G'day" }).as_object().unwrap().clone());
        let table = Localization::new(values);

        let resolved = table.lookup(&tag("en-AU"));
        assert_eq!(Value::Object(resolved), json!({ "title": "G'day", "footer": "Bye" }));
    }

    #[test]
    fn to_json_returns_whole_table() {
        assert_eq!(
            table().to_json(),
            json!({ "en": { "name": "A" }, "en-US": { "name": "B", "description": "D" } })
        );
    }

    #[test]
    fn from_value_accepts_absent_tables() {
        let empty = Localization::<LocalizedText>::from_value(None).unwrap();
        assert!(empty.is_empty());

        let raw = json!({ "fr": { "name": "Boîte" } });
        let table = Localization::<LocalizedText>::from_value(Some(&raw)).unwrap();
        assert_eq!(table.lookup(&tag("fr-CA")).name.as_deref(), Some("Boîte"));
    }
}
