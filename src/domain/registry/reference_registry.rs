//! Reference Registry - identity map for one app's definition graph.
//!
//! Definitions are graphs, not trees: a rate names a delivery service that
//! was built earlier in the same load, a pickup request names a pickup
//! service. Each referenceable definition registers itself here while the
//! app loads; later definitions resolve ids and codes back to the live
//! instance.
//!
//! The registry has two phases. While *loading*, new entries may be added.
//! Once [`ReferenceRegistry::finish_loading`] runs it is *sealed*: lookups
//! keep working, but nothing new can enter the graph.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use integration_sdk::domain::foundation::{DefinitionId, DefinitionIdentifier, Identifiable};
//! use integration_sdk::domain::registry::{ReferenceKey, ReferenceRegistry, Referenceable};
//!
//! struct Depot { identifier: DefinitionIdentifier }
//!
//! impl Identifiable for Depot {
//!     fn identifier(&self) -> &DefinitionIdentifier { &self.identifier }
//! }
//!
//! impl Referenceable for Depot {
//!     const KIND: &'static str = "depot";
//! }
//!
//! let mut registry = ReferenceRegistry::new();
//! let depot = Arc::new(Depot {
//!     identifier: DefinitionIdentifier::new(DefinitionId::new()).with_code("NORTH"),
//! });
//! registry.add(depot.clone()).unwrap();
//! registry.finish_loading();
//!
//! let found = registry.lookup::<Depot>(ReferenceKey::from("NORTH")).unwrap();
//! assert!(Arc::ptr_eq(&found, &depot));
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{DefinitionId, DefinitionIdentifier, Identifiable, SdkError};

/// A definition that can be registered and referenced by id or code.
pub trait Referenceable: Identifiable + Send + Sync + 'static {
    /// Name of the definition type used in error messages.
    const KIND: &'static str;
}

/// How a caller names a definition: by id or code string, or by identity.
#[derive(Debug, Clone)]
pub enum ReferenceKey<'a> {
    Key(Cow<'a, str>),
    Id(DefinitionId),
}

impl<'a> ReferenceKey<'a> {
    /// Reads a reference from raw JSON: a string, or an object with an `id`.
    ///
    /// Returns `None` for null, empty strings, and objects without an id.
    pub fn from_value(value: &'a Value) -> Option<ReferenceKey<'a>> {
        match value {
            Value::String(s) if !s.is_empty() => Some(ReferenceKey::Key(Cow::Borrowed(s))),
            Value::Object(map) => map
                .get("id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(|s| ReferenceKey::Key(Cow::Borrowed(s))),
            _ => None,
        }
    }

    fn as_key(&self) -> Cow<'_, str> {
        match self {
            ReferenceKey::Key(k) => Cow::Borrowed(k.as_ref()),
            ReferenceKey::Id(id) => Cow::Owned(id.to_string()),
        }
    }
}

impl<'a> From<&'a str> for ReferenceKey<'a> {
    fn from(key: &'a str) -> Self {
        ReferenceKey::Key(Cow::Borrowed(key))
    }
}

impl<'a> From<&'a String> for ReferenceKey<'a> {
    fn from(key: &'a String) -> Self {
        ReferenceKey::Key(Cow::Borrowed(key.as_str()))
    }
}

impl From<DefinitionId> for ReferenceKey<'static> {
    fn from(id: DefinitionId) -> Self {
        ReferenceKey::Id(id)
    }
}

impl<'a> From<&'a DefinitionIdentifier> for ReferenceKey<'a> {
    fn from(identifier: &'a DefinitionIdentifier) -> Self {
        ReferenceKey::Id(identifier.id)
    }
}

impl fmt::Display for ReferenceKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// One registered definition.
#[derive(Clone)]
struct Entry {
    id: DefinitionId,
    type_id: TypeId,
    kind: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
}

/// Identity map from UUID (and optional code) to a typed definition.
#[derive(Clone, Default)]
pub struct ReferenceRegistry {
    entries: HashMap<String, Entry>,
    sealed: bool,
}

impl ReferenceRegistry {
    /// Creates an empty registry in the loading phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its id, and under its code if it has one.
    ///
    /// Re-adding an id already registered with the same type is a no-op;
    /// the first instance stays registered. Re-adding it with a different
    /// type, or adding anything new after loading finished, fails.
    pub fn add<T: Referenceable>(&mut self, instance: Arc<T>) -> Result<(), SdkError> {
        let identifier = instance.identifier();
        let id = identifier.id;
        let id_key = id.to_string();

        if let Some(existing) = self.entries.get(&id_key) {
            if existing.id != id {
                return Err(SdkError::invalid(format!(
                    "Duplicate code: \"{}\" is the code of {} {} and the ID of a {}.",
                    id_key,
                    existing.kind,
                    existing.id,
                    T::KIND
                ))
                .with_detail("code", id_key));
            }
            if existing.type_id == TypeId::of::<T>() {
                return Ok(());
            }
            return Err(SdkError::invalid(format!(
                "Duplicate UUID: {} is used by both a {} and a {}.",
                id,
                existing.kind,
                T::KIND
            ))
            .with_detail("id", id_key));
        }

        if self.sealed {
            return Err(SdkError::invalid(format!(
                "Cannot add {} {} after the app has finished loading.",
                T::KIND,
                id
            )));
        }

        let code = identifier.code().map(str::to_string);
        if let Some(code) = &code {
            if let Some(existing) = self.entries.get(code) {
                if existing.id != id {
                    return Err(SdkError::invalid(format!(
                        "Duplicate code: \"{}\" is used by {} {} and {} {}.",
                        code,
                        existing.kind,
                        existing.id,
                        T::KIND,
                        id
                    ))
                    .with_detail("code", code.clone()));
                }
            }
        }

        let entry = Entry {
            id,
            type_id: TypeId::of::<T>(),
            kind: T::KIND,
            instance,
        };
        if let Some(code) = code {
            self.entries.insert(code, entry.clone());
        }
        self.entries.insert(id_key, entry);
        Ok(())
    }

    /// Resolves an optional reference.
    ///
    /// `None` resolves to `None`. A key that is not registered also
    /// resolves to `None`. A key registered under a different type fails.
    pub fn get<T: Referenceable>(
        &self,
        key: Option<ReferenceKey<'_>>,
    ) -> Result<Option<Arc<T>>, SdkError> {
        let Some(key) = key else {
            return Ok(None);
        };
        let lookup_key = key.as_key();
        if lookup_key.is_empty() {
            return Ok(None);
        }

        let Some(entry) = self.entries.get(lookup_key.as_ref()) else {
            return Ok(None);
        };

        if entry.type_id != TypeId::of::<T>() {
            return Err(SdkError::invalid(format!(
                "{} is a {}, not a {}.",
                lookup_key,
                entry.kind,
                T::KIND
            )));
        }

        entry
            .instance
            .clone()
            .downcast::<T>()
            .map(Some)
            .map_err(|_| {
                SdkError::invalid(format!("{} could not be resolved as a {}.", lookup_key, T::KIND))
            })
    }

    /// Resolves a required reference, failing when nothing is registered.
    pub fn lookup<T: Referenceable>(&self, key: ReferenceKey<'_>) -> Result<Arc<T>, SdkError> {
        let display = key.to_string();
        self.get::<T>(Some(key))?.ok_or_else(|| {
            SdkError::invalid(format!(
                "Unable to find {} with ID or code \"{}\".",
                T::KIND,
                display
            ))
        })
    }

    /// Resolves a reference that may be absent, failing only when a present
    /// key is not registered.
    pub fn lookup_optional<T: Referenceable>(
        &self,
        key: Option<ReferenceKey<'_>>,
    ) -> Result<Option<Arc<T>>, SdkError> {
        match key {
            None => Ok(None),
            Some(key) => self.lookup::<T>(key).map(Some),
        }
    }

    /// Seals the registry. Irreversible.
    pub fn finish_loading(&mut self) {
        if !self.sealed {
            tracing::debug!(entries = self.entries.len(), "reference registry sealed");
        }
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of distinct registered definitions (codes are not counted).
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(key, entry)| *key == &entry.id.to_string())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ReferenceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceRegistry")
            .field("entries", &self.len())
            .field("sealed", &self.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    #[derive(Debug)]
    struct Widget {
        identifier: DefinitionIdentifier,
        label: &'static str,
    }

    impl Identifiable for Widget {
        fn identifier(&self) -> &DefinitionIdentifier {
            &self.identifier
        }
    }

    impl Referenceable for Widget {
        const KIND: &'static str = "widget";
    }

    #[derive(Debug)]
    struct Gadget {
        identifier: DefinitionIdentifier,
    }

    impl Identifiable for Gadget {
        fn identifier(&self) -> &DefinitionIdentifier {
            &self.identifier
        }
    }

    impl Referenceable for Gadget {
        const KIND: &'static str = "gadget";
    }

    fn widget(id: DefinitionId, label: &'static str) -> Arc<Widget> {
        Arc::new(Widget {
            identifier: DefinitionIdentifier::new(id),
            label,
        })
    }

    #[test]
    fn add_then_lookup_by_id() {
        let mut registry = ReferenceRegistry::new();
        let id = DefinitionId::new();
        registry.add(widget(id, "first")).unwrap();

        let found = registry.lookup::<Widget>(ReferenceKey::from(id)).unwrap();
        assert_eq!(found.label, "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn code_is_an_alternate_key() {
        let mut registry = ReferenceRegistry::new();
        let id = DefinitionId::new();
        registry
            .add(Arc::new(Widget {
                identifier: DefinitionIdentifier::new(id).with_code("W1"),
                label: "coded",
            }))
            .unwrap();

        let by_code = registry.lookup::<Widget>("W1".into()).unwrap();
        let by_id = registry.lookup::<Widget>(id.into()).unwrap();
        assert!(Arc::ptr_eq(&by_code, &by_id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_id_same_type_is_idempotent() {
        let mut registry = ReferenceRegistry::new();
        let id = DefinitionId::new();
        registry.add(widget(id, "first")).unwrap();
        registry.add(widget(id, "second")).unwrap();

        let found = registry.lookup::<Widget>(id.into()).unwrap();
        assert_eq!(found.label, "first");
    }

    #[test]
    fn same_id_different_type_is_duplicate() {
        let mut registry = ReferenceRegistry::new();
        let id = DefinitionId::new();
        registry.add(widget(id, "first")).unwrap();

        let err = registry
            .add(Arc::new(Gadget {
                identifier: DefinitionIdentifier::new(id),
            }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Invalid);
        assert!(err.message.starts_with("Duplicate UUID"));
    }

    #[test]
    fn code_shared_by_two_ids_is_duplicate() {
        let mut registry = ReferenceRegistry::new();
        registry
            .add(Arc::new(Widget {
                identifier: DefinitionIdentifier::new(DefinitionId::new()).with_code("SAME"),
                label: "a",
            }))
            .unwrap();

        let err = registry
            .add(Arc::new(Widget {
                identifier: DefinitionIdentifier::new(DefinitionId::new()).with_code("SAME"),
                label: "b",
            }))
            .unwrap_err();
        assert!(err.message.starts_with("Duplicate code"));
    }

    #[test]
    fn id_matching_an_earlier_code_is_duplicate() {
        let mut registry = ReferenceRegistry::new();
        let first = DefinitionId::new();
        let second = DefinitionId::new();
        registry
            .add(Arc::new(Widget {
                identifier: DefinitionIdentifier::new(first).with_code(second.to_string()),
                label: "a",
            }))
            .unwrap();

        let err = registry.add(widget(second, "b")).unwrap_err();
        assert_eq!(err.code, ErrorCode::Invalid);
        assert!(err.message.starts_with("Duplicate code"));
        assert_eq!(registry.len(), 1);

        let err = registry
            .add(Arc::new(Gadget {
                identifier: DefinitionIdentifier::new(second),
            }))
            .unwrap_err();
        assert!(err.message.starts_with("Duplicate code"));
    }

    #[test]
    fn sealed_registry_rejects_new_ids_but_keeps_lookups() {
        let mut registry = ReferenceRegistry::new();
        let known = DefinitionId::new();
        registry.add(widget(known, "known")).unwrap();
        registry.finish_loading();

        assert!(registry.is_sealed());
        let err = registry.add(widget(DefinitionId::new(), "late")).unwrap_err();
        assert!(err.message.contains("after the app has finished loading"));

        registry.add(widget(known, "again")).unwrap();
        assert_eq!(registry.lookup::<Widget>(known.into()).unwrap().label, "known");
    }

    #[test]
    fn type_mismatch_on_lookup_fails() {
        let mut registry = ReferenceRegistry::new();
        let id = DefinitionId::new();
        registry.add(widget(id, "w")).unwrap();

        let err = registry.lookup::<Gadget>(id.into()).unwrap_err();
        assert!(err.message.contains("is a widget, not a gadget"));
    }

    #[test]
    fn get_of_none_or_unknown_is_none() {
        let registry = ReferenceRegistry::new();
        assert!(registry.get::<Widget>(None).unwrap().is_none());
        assert!(registry.get::<Widget>(Some("".into())).unwrap().is_none());
        assert!(registry.get::<Widget>(Some("missing".into())).unwrap().is_none());
    }

    #[test]
    fn lookup_of_unknown_fails() {
        let registry = ReferenceRegistry::new();
        let err = registry.lookup::<Widget>("missing".into()).unwrap_err();
        assert_eq!(err.message, "Unable to find widget with ID or code \"missing\".");

        assert!(registry.lookup_optional::<Widget>(None).unwrap().is_none());
        assert!(registry.lookup_optional::<Widget>(Some("missing".into())).is_err());
    }

    #[test]
    fn reference_key_reads_strings_and_objects() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        let by_string = json!(id);
        let by_object = json!({ "id": id, "name": "inline" });

        assert_eq!(ReferenceKey::from_value(&by_string).unwrap().to_string(), id);
        assert_eq!(ReferenceKey::from_value(&by_object).unwrap().to_string(), id);
        assert!(ReferenceKey::from_value(&json!(null)).is_none());
        assert!(ReferenceKey::from_value(&json!("")).is_none());
        assert!(ReferenceKey::from_value(&json!({ "name": "no id" })).is_none());
    }
}
