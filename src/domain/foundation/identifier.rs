//! Identity shared by every referenceable definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::DefinitionId;
use crate::domain::validation::{ObjectSchema, Schema};

/// The identity of a definition: a UUID, an optional alternate `code`, and
/// free-form external identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionIdentifier {
    pub id: DefinitionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<String, String>,
}

impl DefinitionIdentifier {
    pub fn new(id: DefinitionId) -> Self {
        Self {
            id,
            code: None,
            identifiers: BTreeMap::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The identity fields every definition schema starts with.
    pub fn schema_fields() -> ObjectSchema {
        Schema::object()
            .required("id", Schema::uuid())
            .optional("code", Schema::text())
            .optional("identifiers", identifiers_schema())
    }

    /// The code, if present and non-empty.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }
}

/// `{ "<name>": "<value>" }` with non-empty names and single-line values.
pub fn identifiers_schema() -> Schema {
    Schema::map(Schema::text())
}

/// Capability: the value carries a definition identity.
pub trait Identifiable {
    fn identifier(&self) -> &DefinitionIdentifier;

    fn id(&self) -> DefinitionId {
        self.identifier().id
    }

    fn code(&self) -> Option<&str> {
        self.identifier().code()
    }
}
