//! Reference registry for the definition graph.

mod reference_registry;

pub use reference_registry::{ReferenceKey, ReferenceRegistry, Referenceable};
