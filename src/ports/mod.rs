//! Ports - Interfaces between the SDK and plugin code.
//!
//! Following hexagonal architecture, ports define the contracts the
//! application layer depends on. Plugins implement them.
//!
//! - `PluginMethod` - one business method supplied by a plugin

mod plugin_method;

pub use plugin_method::{PluginError, PluginMethod, PluginResult};
