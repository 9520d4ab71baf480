//! Locale fallback resolution for user-facing text.

mod localization;

pub use localization::{Localizable, Localization, LocalizedText};
