//! Application layer - the invocation pipeline and the two app kinds.
//!
//! - `pipeline` - validate, invoke, normalize errors for one method call
//! - `methods` - per-method contracts (inputs, outputs, defaults)
//! - `carrier_app` - carrier apps: definition graph plus shipping methods
//! - `order_app` - order-source apps

mod app;
pub mod carrier_app;
pub mod methods;
pub mod order_app;
pub mod pipeline;

pub use app::AppIdentity;
pub use carrier_app::{CarrierApp, CarrierAppDefinition};
pub use order_app::{OrderApp, OrderAppDefinition};
pub use pipeline::{AppContext, MethodContract, WrappedMethod};
