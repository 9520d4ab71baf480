//! Order app - a plugin that pulls sales orders from an order source and
//! reports shipments back to it.
//!
//! Order apps declare no definition graph of their own; their registry is
//! sealed empty so every value they receive resolves against a closed
//! world.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use super::app::{seal, wrap, AppIdentity, Plugin};
use super::methods::{Connect, GetSalesOrdersByDate, ShipmentCancelled, ShipmentCreated};
use super::pipeline::{AppContext, MethodContract, WrappedMethod};
use crate::config::SdkConfig;
use crate::domain::foundation::SdkError;
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, validate, Schema};
use crate::ports::PluginMethod;

static ORDER_APP_SCHEMA: Lazy<Schema> = Lazy::new(|| AppIdentity::schema_fields().into());

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderAppFields {
    #[serde(flatten)]
    identity: AppIdentity,
    #[serde(default)]
    connection_form: Option<Value>,
}

/// An order app manifest plus the plugin methods that implement it.
#[derive(Default)]
pub struct OrderAppDefinition {
    manifest: Value,
    connect: Plugin<Connect>,
    get_sales_orders_by_date: Plugin<GetSalesOrdersByDate>,
    shipment_created: Plugin<ShipmentCreated>,
    shipment_cancelled: Plugin<ShipmentCancelled>,
}

impl OrderAppDefinition {
    pub fn new(manifest: Value) -> Self {
        Self {
            manifest,
            ..Self::default()
        }
    }

    pub fn with_connect(mut self, method: impl PluginMethod<Value> + 'static) -> Self {
        self.connect = Some(Arc::new(method));
        self
    }

    pub fn with_get_sales_orders_by_date(
        mut self,
        method: impl PluginMethod<<GetSalesOrdersByDate as MethodContract>::Args> + 'static,
    ) -> Self {
        self.get_sales_orders_by_date = Some(Arc::new(method));
        self
    }

    pub fn with_shipment_created(
        mut self,
        method: impl PluginMethod<<ShipmentCreated as MethodContract>::Args> + 'static,
    ) -> Self {
        self.shipment_created = Some(Arc::new(method));
        self
    }

    pub fn with_shipment_cancelled(
        mut self,
        method: impl PluginMethod<<ShipmentCancelled as MethodContract>::Args> + 'static,
    ) -> Self {
        self.shipment_cancelled = Some(Arc::new(method));
        self
    }
}

/// A loaded order app.
#[derive(Debug)]
pub struct OrderApp {
    identity: AppIdentity,
    connection_form: Option<Value>,
    context: Arc<AppContext>,
    connect: Option<WrappedMethod<Connect>>,
    get_sales_orders_by_date: Option<WrappedMethod<GetSalesOrdersByDate>>,
    shipment_created: Option<WrappedMethod<ShipmentCreated>>,
    shipment_cancelled: Option<WrappedMethod<ShipmentCancelled>>,
}

impl OrderApp {
    /// Validates the manifest and wraps the supplied plugin methods.
    pub fn load(definition: OrderAppDefinition, config: &SdkConfig) -> Result<Self, SdkError> {
        let raw = validate(&definition.manifest, "order app", &ORDER_APP_SCHEMA)?;
        let fields = decode::<OrderAppFields>(raw, "order app")?;
        let context = seal(ReferenceRegistry::new(), config)?;

        tracing::info!(app = %fields.identity.name(), "order app loaded");

        Ok(Self {
            identity: fields.identity,
            connection_form: fields.connection_form,
            connect: wrap(definition.connect, &context),
            get_sales_orders_by_date: wrap(definition.get_sales_orders_by_date, &context),
            shipment_created: wrap(definition.shipment_created, &context),
            shipment_cancelled: wrap(definition.shipment_cancelled, &context),
            context,
        })
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    pub fn connection_form(&self) -> Option<&Value> {
        self.connection_form.as_ref()
    }

    pub fn registry(&self) -> &ReferenceRegistry {
        self.context.registry()
    }

    pub fn connect(&self) -> Option<&WrappedMethod<Connect>> {
        self.connect.as_ref()
    }

    pub fn get_sales_orders_by_date(&self) -> Option<&WrappedMethod<GetSalesOrdersByDate>> {
        self.get_sales_orders_by_date.as_ref()
    }

    pub fn shipment_created(&self) -> Option<&WrappedMethod<ShipmentCreated>> {
        self.shipment_created.as_ref()
    }

    pub fn shipment_cancelled(&self) -> Option<&WrappedMethod<ShipmentCancelled>> {
        self.shipment_cancelled.as_ref()
    }

    /// Names of the methods this app implements.
    pub fn supported_methods(&self) -> Vec<&'static str> {
        [
            self.connect.as_ref().map(WrappedMethod::name),
            self.get_sales_orders_by_date.as_ref().map(WrappedMethod::name),
            self.shipment_created.as_ref().map(WrappedMethod::name),
            self.shipment_cancelled.as_ref().map(WrappedMethod::name),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
