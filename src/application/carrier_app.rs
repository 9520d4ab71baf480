//! Carrier app - a plugin that books, rates, and tracks shipments.
//!
//! Loading builds the whole definition graph bottom-up (packaging, delivery
//! confirmations, then carriers and their services), seals the registry,
//! and only then wraps the plugin's methods.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = CarrierApp::load(
//!     CarrierAppDefinition::new(manifest)
//!         .with_rate_shipment(|tx: Transaction, criteria: RateCriteria| async move {
//!             Ok(serde_json::to_value(quote(&tx, &criteria).await?)?)
//!         }),
//!     &SdkConfig::load()?,
//! )?;
//!
//! let rates = app.rate_shipment().unwrap().invoke(&transaction, &criteria).await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use super::app::{seal, wrap, AppIdentity, Plugin};
use super::methods::{
    CancelPickups, CancelShipments, Connect, CreateManifest, CreateShipment, RateShipment,
    SchedulePickup, TrackShipment,
};
use super::pipeline::{AppContext, MethodContract, WrappedMethod};
use crate::config::SdkConfig;
use crate::domain::definitions::{build_all, Carrier, DeliveryConfirmation, Packaging};
use crate::domain::foundation::SdkError;
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, validate, Schema, Schematic, StringFormat};
use crate::ports::PluginMethod;

static CARRIER_APP_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    AppIdentity::schema_fields()
        .required(
            "logo",
            Schema::string().format(StringFormat::FilePath {
                extension: Some("svg"),
            }),
        )
        .optional("packaging", Schema::array(Packaging::schema().clone()))
        .optional(
            "deliveryConfirmations",
            Schema::array(DeliveryConfirmation::schema().clone()),
        )
        .required("carriers", Schema::array(Carrier::schema().clone()).min_items(1))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarrierAppFields {
    #[serde(flatten)]
    identity: AppIdentity,
    logo: PathBuf,
    #[serde(default)]
    connection_form: Option<Value>,
}

/// A carrier app manifest plus the plugin methods that implement it.
#[derive(Default)]
pub struct CarrierAppDefinition {
    manifest: Value,
    connect: Plugin<Connect>,
    create_shipment: Plugin<CreateShipment>,
    cancel_shipments: Plugin<CancelShipments>,
    rate_shipment: Plugin<RateShipment>,
    track_shipment: Plugin<TrackShipment>,
    create_manifest: Plugin<CreateManifest>,
    schedule_pickup: Plugin<SchedulePickup>,
    cancel_pickups: Plugin<CancelPickups>,
}

impl CarrierAppDefinition {
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

    pub fn with_create_shipment(
        mut self,
        method: impl PluginMethod<<CreateShipment as MethodContract>::Args> + 'static,
    ) -> Self {
        self.create_shipment = Some(Arc::new(method));
        self
    }

    pub fn with_cancel_shipments(
        mut self,
        method: impl PluginMethod<<CancelShipments as MethodContract>::Args> + 'static,
    ) -> Self {
        self.cancel_shipments = Some(Arc::new(method));
        self
    }

    pub fn with_rate_shipment(
        mut self,
        method: impl PluginMethod<<RateShipment as MethodContract>::Args> + 'static,
    ) -> Self {
        self.rate_shipment = Some(Arc::new(method));
        self
    }

    pub fn with_track_shipment(
        mut self,
        method: impl PluginMethod<<TrackShipment as MethodContract>::Args> + 'static,
    ) -> Self {
        self.track_shipment = Some(Arc::new(method));
        self
    }

    pub fn with_create_manifest(
        mut self,
        method: impl PluginMethod<<CreateManifest as MethodContract>::Args> + 'static,
    ) -> Self {
        self.create_manifest = Some(Arc::new(method));
        self
    }

    pub fn with_schedule_pickup(
        mut self,
        method: impl PluginMethod<<SchedulePickup as MethodContract>::Args> + 'static,
    ) -> Self {
        self.schedule_pickup = Some(Arc::new(method));
        self
    }

    pub fn with_cancel_pickups(
        mut self,
        method: impl PluginMethod<<CancelPickups as MethodContract>::Args> + 'static,
    ) -> Self {
        self.cancel_pickups = Some(Arc::new(method));
        self
    }
}

/// A loaded carrier app. Its definition graph is sealed.
#[derive(Debug)]
pub struct CarrierApp {
    identity: AppIdentity,
    logo: PathBuf,
    connection_form: Option<Value>,
    packaging: Vec<Arc<Packaging>>,
    delivery_confirmations: Vec<Arc<DeliveryConfirmation>>,
    carriers: Vec<Arc<Carrier>>,
    context: Arc<AppContext>,
    connect: Option<WrappedMethod<Connect>>,
    create_shipment: Option<WrappedMethod<CreateShipment>>,
    cancel_shipments: Option<WrappedMethod<CancelShipments>>,
    rate_shipment: Option<WrappedMethod<RateShipment>>,
    track_shipment: Option<WrappedMethod<TrackShipment>>,
    create_manifest: Option<WrappedMethod<CreateManifest>>,
    schedule_pickup: Option<WrappedMethod<SchedulePickup>>,
    cancel_pickups: Option<WrappedMethod<CancelPickups>>,
}

impl CarrierApp {
    /// Validates the manifest, builds and seals the definition graph, and
    /// wraps the supplied plugin methods.
    pub fn load(definition: CarrierAppDefinition, config: &SdkConfig) -> Result<Self, SdkError> {
        let raw = validate(&definition.manifest, "carrier app", &CARRIER_APP_SCHEMA)?;
        let fields = decode::<CarrierAppFields>(raw, "carrier app")?;

        let mut registry = ReferenceRegistry::new();
        let packaging = build_all(raw.get("packaging"), &mut registry, Packaging::from_value)?;
        let delivery_confirmations = build_all(
            raw.get("deliveryConfirmations"),
            &mut registry,
            DeliveryConfirmation::from_value,
        )?;
        let carriers = build_all(raw.get("carriers"), &mut registry, Carrier::from_value)?;

        let offers_pickup = carriers.iter().any(|carrier| carrier.supports_pickup());
        if !offers_pickup && (definition.schedule_pickup.is_some() || definition.cancel_pickups.is_some()) {
            return Err(SdkError::invalid(format!(
                "Invalid carrier app: \"{}\" implements pickup methods but none of its carriers offer pickup services.",
                fields.identity.name()
            )));
        }

        let context = seal(registry, config)?;

        tracing::info!(
            app = %fields.identity.name(),
            carriers = carriers.len(),
            entries = context.registry().len(),
            "carrier app loaded"
        );

        Ok(Self {
            identity: fields.identity,
            logo: fields.logo,
            connection_form: fields.connection_form,
            packaging,
            delivery_confirmations,
            carriers,
            connect: wrap(definition.connect, &context),
            create_shipment: wrap(definition.create_shipment, &context),
            cancel_shipments: wrap(definition.cancel_shipments, &context),
            rate_shipment: wrap(definition.rate_shipment, &context),
            track_shipment: wrap(definition.track_shipment, &context),
            create_manifest: wrap(definition.create_manifest, &context),
            schedule_pickup: wrap(definition.schedule_pickup, &context),
            cancel_pickups: wrap(definition.cancel_pickups, &context),
            context,
        })
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    pub fn logo(&self) -> &PathBuf {
        &self.logo
    }

    /// The opaque connection form shown to users, if any.
    pub fn connection_form(&self) -> Option<&Value> {
        self.connection_form.as_ref()
    }

    pub fn packaging(&self) -> &[Arc<Packaging>] {
        &self.packaging
    }

    pub fn delivery_confirmations(&self) -> &[Arc<DeliveryConfirmation>] {
        &self.delivery_confirmations
    }

    pub fn carriers(&self) -> &[Arc<Carrier>] {
        &self.carriers
    }

    /// The sealed registry holding every definition in this app.
    pub fn registry(&self) -> &ReferenceRegistry {
        self.context.registry()
    }

    pub fn connect(&self) -> Option<&WrappedMethod<Connect>> {
        self.connect.as_ref()
    }

    pub fn create_shipment(&self) -> Option<&WrappedMethod<CreateShipment>> {
        self.create_shipment.as_ref()
    }

    pub fn cancel_shipments(&self) -> Option<&WrappedMethod<CancelShipments>> {
        self.cancel_shipments.as_ref()
    }

    pub fn rate_shipment(&self) -> Option<&WrappedMethod<RateShipment>> {
        self.rate_shipment.as_ref()
    }

    pub fn track_shipment(&self) -> Option<&WrappedMethod<TrackShipment>> {
        self.track_shipment.as_ref()
    }

    pub fn create_manifest(&self) -> Option<&WrappedMethod<CreateManifest>> {
        self.create_manifest.as_ref()
    }

    pub fn schedule_pickup(&self) -> Option<&WrappedMethod<SchedulePickup>> {
        self.schedule_pickup.as_ref()
    }

    pub fn cancel_pickups(&self) -> Option<&WrappedMethod<CancelPickups>> {
        self.cancel_pickups.as_ref()
    }

    /// Names of the methods this app implements.
    pub fn supported_methods(&self) -> Vec<&'static str> {
        [
            self.connect.as_ref().map(WrappedMethod::name),
            self.create_shipment.as_ref().map(WrappedMethod::name),
            self.cancel_shipments.as_ref().map(WrappedMethod::name),
            self.rate_shipment.as_ref().map(WrappedMethod::name),
            self.track_shipment.as_ref().map(WrappedMethod::name),
            self.create_manifest.as_ref().map(WrappedMethod::name),
            self.schedule_pickup.as_ref().map(WrappedMethod::name),
            self.cancel_pickups.as_ref().map(WrappedMethod::name),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
