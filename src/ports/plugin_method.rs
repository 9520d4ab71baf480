//! Plugin Method Port - the callback a plugin supplies for one business
//! method.
//!
//! The SDK owns validation on both sides of the call; the plugin only ever
//! sees a constructed [`Transaction`] plus typed arguments, and hands back
//! raw JSON that the SDK validates into the method's output type.
//!
//! # Usage
//!
//! Any async closure with the right shape is a plugin method:
//!
//! ```rust,ignore
//! let track = |transaction: Transaction, criteria: TrackingCriteria| async move {
//!     let info = carrier_api::track(criteria.tracking_number()).await?;
//!     Ok(serde_json::to_value(info)?)
//! };
//! ```

use std::error::Error;
use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::transaction::Transaction;

/// Any error a plugin raises. An [`SdkError`] keeps its code when wrapped.
///
/// [`SdkError`]: crate::domain::foundation::SdkError
pub type PluginError = Box<dyn Error + Send + Sync>;

/// What a plugin method resolves to: raw output JSON, or a failure.
pub type PluginResult = Result<Value, PluginError>;

/// Port for a plugin-supplied business method taking arguments `A`.
#[async_trait]
pub trait PluginMethod<A>: Send + Sync
where
    A: Send + 'static,
{
    async fn call(&self, transaction: Transaction, args: A) -> PluginResult;
}

#[async_trait]
impl<A, F, Fut> PluginMethod<A> for F
where
    A: Send + 'static,
    F: Fn(Transaction, A) -> Fut + Send + Sync,
    Fut: Future<Output = PluginResult> + Send + 'static,
{
    async fn call(&self, transaction: Transaction, args: A) -> PluginResult {
        (self)(transaction, args).await
    }
}
