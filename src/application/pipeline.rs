//! Method Invocation Pipeline - the one wrapper every business method runs
//! through.
//!
//! A call moves through a fixed sequence:
//!
//! ```text
//! Idle -> ValidatingInput -> Invalid                     (InvalidInput)
//!                         -> Invoking -> Threw           (AppError / plugin's code)
//!                                     -> Succeeded -> ValidatingOutput -> Valid
//!                                                                      -> Invalid (AppError)
//! ```
//!
//! The only per-method variance (which arguments to build, which output to
//! build, which defaults to fill) lives in a [`MethodContract`].

use std::any::Any;
use std::error::Error;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::Instrument;

use crate::domain::foundation::{code_of, Currency, ErrorCode, LocaleTag, SdkError, TransactionId};
use crate::domain::registry::ReferenceRegistry;
use crate::domain::transaction::Transaction;
use crate::ports::PluginMethod;

/// Everything a method needs from the loaded app.
#[derive(Debug)]
pub struct AppContext {
    registry: Arc<ReferenceRegistry>,
    default_locale: LocaleTag,
    default_currency: Currency,
}

impl AppContext {
    /// Creates a context over a sealed registry.
    pub fn new(registry: Arc<ReferenceRegistry>, default_locale: LocaleTag, default_currency: Currency) -> Self {
        Self {
            registry,
            default_locale,
            default_currency,
        }
    }

    pub fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    /// Language used when a transaction omits one.
    pub fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    /// Currency of an empty monetary sum.
    pub fn default_currency(&self) -> &Currency {
        &self.default_currency
    }
}

/// Per-method input/output shape.
pub trait MethodContract: Send + Sync + 'static {
    /// Method name as plugins and hosts know it, e.g. `rateShipment`.
    const NAME: &'static str;

    type Args: Send + 'static;
    type Output: Send;

    /// Validates raw arguments and resolves their references.
    fn build_args(raw: &Value, context: &AppContext) -> Result<Self::Args, SdkError>;

    /// Fills defaults the plugin may omit, before output validation.
    fn fill_defaults(_args: &Value, _output: &mut Value) {}

    /// Validates raw output and resolves its references.
    fn build_output(raw: &Value, context: &AppContext) -> Result<Self::Output, SdkError>;
}

#[derive(Debug, ThisError)]
#[error("{0}")]
struct PluginPanic(String);

/// A plugin method wrapped with validation and error normalization.
pub struct WrappedMethod<M: MethodContract> {
    plugin: Arc<dyn PluginMethod<M::Args>>,
    context: Arc<AppContext>,
    contract: PhantomData<fn() -> M>,
}

impl<M: MethodContract> WrappedMethod<M> {
    pub fn new(plugin: Arc<dyn PluginMethod<M::Args>>, context: Arc<AppContext>) -> Self {
        Self {
            plugin,
            context,
            contract: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        M::NAME
    }

    /// Runs one call of the method.
    ///
    /// The plugin is invoked only when both the transaction and the
    /// arguments are valid. Every failure after invocation carries the
    /// transaction id.
    pub async fn invoke(&self, transaction: &Value, args: &Value) -> Result<M::Output, SdkError> {
        let (transaction, built_args) = self.build_input(transaction, args)?;
        let transaction_id = transaction.id();

        let span = tracing::info_span!(
            "plugin_method",
            method = M::NAME,
            transaction_id = %transaction_id
        );

        async move {
            let outcome = AssertUnwindSafe(self.plugin.call(transaction, built_args))
                .catch_unwind()
                .await;

            let mut output = match outcome {
                Ok(Ok(output)) => output,
                Ok(Err(error)) => return Err(self.plugin_failure(transaction_id, Arc::from(error))),
                Err(panic) => {
                    let cause = Arc::new(PluginPanic(panic_message(panic.as_ref())));
                    return Err(self.plugin_failure(transaction_id, cause));
                }
            };

            M::fill_defaults(args, &mut output);

            match M::build_output(&output, &self.context) {
                Ok(output) => {
                    tracing::debug!("plugin method succeeded");
                    Ok(output)
                }
                Err(error) => Err(self.output_failure(transaction_id, error)),
            }
        }
        .instrument(span)
        .await
    }

    fn build_input(&self, transaction: &Value, args: &Value) -> Result<(Transaction, M::Args), SdkError> {
        let transaction = Transaction::from_value(transaction, self.context.default_locale())
            .map_err(|error| self.input_failure(None, error))?;
        let built_args = M::build_args(args, &self.context)
            .map_err(|error| self.input_failure(Some(transaction.id()), error))?;
        Ok((transaction, built_args))
    }

    fn input_failure(&self, transaction_id: Option<TransactionId>, cause: SdkError) -> SdkError {
        tracing::warn!(
            method = M::NAME,
            transaction_id = ?transaction_id,
            "rejected input: {}",
            cause.message
        );

        let error = SdkError::new(
            ErrorCode::InvalidInput,
            format!("Invalid input to the `{}` method.", M::NAME),
        )
        .caused_by(Arc::new(cause));

        match transaction_id {
            Some(id) => error.with_transaction_id(id),
            None => error,
        }
    }

    fn plugin_failure(&self, transaction_id: TransactionId, cause: Arc<dyn Error + Send + Sync>) -> SdkError {
        let code = code_of(cause.as_ref()).unwrap_or(ErrorCode::AppError);
        tracing::error!(code = %code, "plugin method failed: {}", cause);

        SdkError::new(code, format!("Error in the `{}` method.", M::NAME))
            .with_transaction_id(transaction_id)
            .caused_by(cause)
    }

    fn output_failure(&self, transaction_id: TransactionId, cause: SdkError) -> SdkError {
        tracing::error!("plugin method returned invalid output: {}", cause.message);

        SdkError::new(ErrorCode::AppError, format!("Error in the `{}` method.", M::NAME))
            .with_transaction_id(transaction_id)
            .caused_by(Arc::new(cause))
    }
}

impl<M: MethodContract> std::fmt::Debug for WrappedMethod<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedMethod").field("name", &M::NAME).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "plugin method panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PluginResult;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echo contract: any object in, any object out.
    struct Echo;

    impl MethodContract for Echo {
        const NAME: &'static str = "echo";
        type Args = Value;
        type Output = Value;

        fn build_args(raw: &Value, _context: &AppContext) -> Result<Value, SdkError> {
            match raw {
                Value::Object(_) => Ok(raw.clone()),
                _ => Err(SdkError::invalid("Invalid echo: value must be an object.")),
            }
        }

        fn fill_defaults(args: &Value, output: &mut Value) {
            if output.get("echoed").is_none() {
                output["echoed"] = args.clone();
            }
        }

        fn build_output(raw: &Value, _context: &AppContext) -> Result<Value, SdkError> {
            match raw.get("status") {
                Some(Value::String(_)) => Ok(raw.clone()),
                _ => Err(SdkError::invalid("Invalid echo output: status is required.")),
            }
        }
    }

    const TX_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn context() -> Arc<AppContext> {
        let mut registry = ReferenceRegistry::new();
        registry.finish_loading();
        Arc::new(AppContext::new(
            Arc::new(registry),
            LocaleTag::new("en").unwrap(),
            Currency::new("USD").unwrap(),
        ))
    }

    fn wrap<P>(plugin: P) -> WrappedMethod<Echo>
    where
        P: PluginMethod<Value> + 'static,
    {
        WrappedMethod::new(Arc::new(plugin), context())
    }

    #[tokio::test]
    async fn passes_valid_input_and_returns_output() {
        let method = wrap(|tx: Transaction, args: Value| async move {
            assert_eq!(tx.language().as_str(), "en");
            Ok::<_, crate::ports::PluginError>(json!({ "status": "ok", "seen": args }))
        });

        let output = method
            .invoke(&json!({ "id": TX_ID }), &json!({ "a": 1 }))
            .await
            .unwrap();

        assert_eq!(output["seen"], json!({ "a": 1 }));
        assert_eq!(output["echoed"], json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn invalid_transaction_never_calls_plugin() {
        let calls = Arc::new(AtomicUsize::new(0));
        let spy = calls.clone();
        let method = wrap(move |_tx: Transaction, _args: Value| {
            spy.fetch_add(1, Ordering::SeqCst);
            async { PluginResult::Ok(json!({ "status": "ok" })) }
        });

        let err = method.invoke(&json!({ "language": "en" }), &json!({})).await.unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "Invalid input to the `echo` method.");
        assert_eq!(err.transaction_id, None);
        assert_eq!(err.original_code, Some(ErrorCode::Invalid));
    }

    #[tokio::test]
    async fn invalid_args_carry_the_transaction_id() {
        let method = wrap(|_tx: Transaction, _args: Value| async { PluginResult::Ok(json!({ "status": "ok" })) });

        let err = method.invoke(&json!({ "id": TX_ID }), &json!("nope")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.transaction_id.unwrap().to_string(), TX_ID);
    }

    #[tokio::test]
    async fn plugin_error_is_wrapped_as_app_error() {
        let method = wrap(|_tx: Transaction, _args: Value| async { PluginResult::Err("boom".into()) });

        let err = method.invoke(&json!({ "id": TX_ID }), &json!({})).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AppError);
        assert_eq!(err.message, "Error in the `echo` method.");
        assert_eq!(err.original_message().as_deref(), Some("boom"));
        assert_eq!(err.transaction_id.unwrap().to_string(), TX_ID);
        assert_eq!(err.original_code, None);
    }

    #[tokio::test]
    async fn plugin_error_code_is_preserved() {
        let method = wrap(|_tx: Transaction, _args: Value| async {
            PluginResult::Err(Box::new(SdkError::new(ErrorCode::Unauthorized, "token expired")))
        });

        let err = method.invoke(&json!({ "id": TX_ID }), &json!({})).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.original_code, Some(ErrorCode::Unauthorized));
        assert_eq!(err.original_message().as_deref(), Some("token expired"));
    }

    #[tokio::test]
    async fn rewrapped_plugin_error_keeps_its_original_code() {
        let method = wrap(|_tx: Transaction, _args: Value| async {
            let root = SdkError::new(ErrorCode::Unauthorized, "token expired");
            let wrapped = SdkError::new(ErrorCode::AppError, "carrier call failed").caused_by(Arc::new(root));
            PluginResult::Err(Box::new(wrapped))
        });

        let err = method.invoke(&json!({ "id": TX_ID }), &json!({})).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AppError);
        assert_eq!(err.original_code, Some(ErrorCode::Unauthorized));
        assert_eq!(err.original_message().as_deref(), Some("carrier call failed"));
        assert_eq!(err.transaction_id.unwrap().to_string(), TX_ID);
    }

    #[tokio::test]
    async fn invalid_output_is_an_app_error() {
        let method = wrap(|_tx: Transaction, _args: Value| async { PluginResult::Ok(json!({})) });

        let err = method.invoke(&json!({ "id": TX_ID }), &json!({})).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AppError);
        assert_eq!(err.original_code, Some(ErrorCode::Invalid));
        assert!(err.transaction_id.is_some());
    }

    #[tokio::test]
    async fn plugin_panic_is_caught() {
        let method = wrap(|_tx: Transaction, _args: Value| async {
            if true {
                panic!("kaboom");
            }
            PluginResult::Ok(json!({ "status": "ok" }))
        });

        let err = method.invoke(&json!({ "id": TX_ID }), &json!({})).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AppError);
        assert_eq!(err.original_message().as_deref(), Some("kaboom"));
    }
}
