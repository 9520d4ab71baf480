//! Transaction context passed to plugin methods.

mod session;
mod transaction;

pub use session::Session;
pub use transaction::Transaction;
