//! Shipment creation and cancellation values.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::common::{
    date_time_schema, money_schema, resolve, resolve_optional, serialize_optional_reference,
    serialize_reference, Address, Charge, Dimensions, Document, Weight,
};
use super::{Resolvable, ShipmentIdentifier, ShipmentIdentity};
use crate::domain::definitions::{DeliveryConfirmation, DeliveryService, Packaging};
use crate::domain::foundation::{Currency, Identifiable, MonetaryValue, SdkError};
use crate::domain::registry::ReferenceRegistry;
use crate::domain::validation::{decode, Schema, Schematic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutiesPaidBy {
    Sender,
    Recipient,
    ThirdParty,
}

/// Who pays duties and, for third-party billing, which account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub duties_paid_by: DutiesPaidBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Billing {
    pub fn schema() -> Schema {
        Schema::object()
            .required(
                "dutiesPaidBy",
                Schema::string().one_of(&["sender", "recipient", "third_party"]),
            )
            .optional("account", Schema::text())
            .optional("postalCode", Schema::text())
            .optional("country", Schema::text())
            .require_when("dutiesPaidBy", "third_party", &["account", "postalCode", "country"])
            .into()
    }
}

/// One package of a new shipment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    #[serde(serialize_with = "serialize_reference")]
    packaging: Arc<Packaging>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insured_value: Option<MonetaryValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPackageFields {
    #[serde(default)]
    weight: Option<Weight>,
    #[serde(default)]
    dimensions: Option<Dimensions>,
    #[serde(default)]
    insured_value: Option<MonetaryValue>,
}

impl NewPackage {
    fn schema() -> Schema {
        Schema::object()
            .required("packaging", Schema::reference())
            .optional("weight", Weight::schema())
            .optional("dimensions", Dimensions::schema())
            .optional("insuredValue", money_schema())
            .into()
    }

    fn build(
        raw: &Value,
        path: &str,
        service: &DeliveryService,
        registry: &ReferenceRegistry,
    ) -> Result<Self, SdkError> {
        let packaging = resolve::<Packaging>(raw, "packaging", registry)?;
        let fields = decode::<NewPackageFields>(raw, NewShipment::LABEL)?;

        if !service.packaging().is_empty()
            && !service.packaging().iter().any(|p| p.id() == packaging.id())
        {
            return Err(SdkError::invalid(format!(
                "Invalid new shipment: {}.packaging \"{}\" is not offered by the {} delivery service.",
                path,
                packaging.name(),
                service.name()
            )));
        }
        if packaging.requires_weight() && fields.weight.is_none() {
            return Err(SdkError::invalid(format!(
                "Invalid new shipment: {}.weight is required for {} packaging.",
                path,
                packaging.name()
            )));
        }
        if packaging.requires_dimensions() && fields.dimensions.is_none() {
            return Err(SdkError::invalid(format!(
                "Invalid new shipment: {}.dimensions is required for {} packaging.",
                path,
                packaging.name()
            )));
        }

        Ok(Self {
            packaging,
            weight: fields.weight,
            dimensions: fields.dimensions,
            insured_value: fields.insured_value,
        })
    }

    pub fn packaging(&self) -> &Arc<Packaging> {
        &self.packaging
    }

    pub fn weight(&self) -> Option<&Weight> {
        self.weight.as_ref()
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    pub fn insured_value(&self) -> Option<&MonetaryValue> {
        self.insured_value.as_ref()
    }
}

static NEW_SHIPMENT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("deliveryService", Schema::reference())
        .optional("deliveryConfirmation", Schema::reference())
        .required("shipFrom", Address::schema())
        .required("shipTo", Address::schema())
        .optional("returnTo", Address::schema())
        .required("shipDateTime", date_time_schema())
        .required("packages", Schema::array(NewPackage::schema()).min_items(1))
        .optional("billing", Billing::schema())
        .optional("isReturn", Schema::boolean())
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewShipmentFields {
    ship_from: Address,
    ship_to: Address,
    #[serde(default)]
    return_to: Option<Address>,
    ship_date_time: String,
    #[serde(default)]
    billing: Option<Billing>,
    #[serde(default)]
    is_return: bool,
}

/// The shipment a plugin is asked to create a label for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    #[serde(serialize_with = "serialize_reference")]
    delivery_service: Arc<DeliveryService>,
    #[serde(
        serialize_with = "serialize_optional_reference",
        skip_serializing_if = "Option::is_none"
    )]
    delivery_confirmation: Option<Arc<DeliveryConfirmation>>,
    ship_from: Address,
    ship_to: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_to: Option<Address>,
    ship_date_time: String,
    packages: Vec<NewPackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    billing: Option<Billing>,
    is_return: bool,
}

impl NewShipment {
    pub fn delivery_service(&self) -> &Arc<DeliveryService> {
        &self.delivery_service
    }

    pub fn delivery_confirmation(&self) -> Option<&Arc<DeliveryConfirmation>> {
        self.delivery_confirmation.as_ref()
    }

    pub fn ship_from(&self) -> &Address {
        &self.ship_from
    }

    pub fn ship_to(&self) -> &Address {
        &self.ship_to
    }

    /// Where returns go; the ship-from address unless overridden.
    pub fn return_to(&self) -> &Address {
        self.return_to.as_ref().unwrap_or(&self.ship_from)
    }

    pub fn ship_date_time(&self) -> &str {
        &self.ship_date_time
    }

    pub fn packages(&self) -> &[NewPackage] {
        &self.packages
    }

    pub fn billing(&self) -> Option<&Billing> {
        self.billing.as_ref()
    }

    pub fn is_return(&self) -> bool {
        self.is_return
    }

    /// Total declared insured value across all packages.
    pub fn total_insured_value(&self, fallback_currency: &Currency) -> Result<MonetaryValue, SdkError> {
        MonetaryValue::sum(
            self.packages.iter().filter_map(NewPackage::insured_value),
            fallback_currency,
        )
    }
}

impl Schematic for NewShipment {
    const LABEL: &'static str = "new shipment";

    fn schema() -> &'static Schema {
        &NEW_SHIPMENT_SCHEMA
    }
}

impl Resolvable for NewShipment {
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let delivery_service = resolve::<DeliveryService>(raw, "deliveryService", registry)?;
        let delivery_confirmation =
            resolve_optional::<DeliveryConfirmation>(raw, "deliveryConfirmation", registry)?;
        let fields = decode::<NewShipmentFields>(raw, Self::LABEL)?;

        let packages = raw["packages"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, package)| {
                NewPackage::build(package, &format!("packages[{}]", i), &delivery_service, registry)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            delivery_service,
            delivery_confirmation,
            ship_from: fields.ship_from,
            ship_to: fields.ship_to,
            return_to: fields.return_to,
            ship_date_time: fields.ship_date_time,
            packages,
            billing: fields.billing,
            is_return: fields.is_return,
        })
    }
}

/// Per-package result of a created shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfirmation {
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<Document>,
}

impl PackageConfirmation {
    fn schema() -> Schema {
        ShipmentIdentifier::schema_fields()
            .optional("label", Document::schema())
            .into()
    }

    pub fn label(&self) -> Option<&Document> {
        self.label.as_ref()
    }
}

impl ShipmentIdentity for PackageConfirmation {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

static SHIPMENT_CONFIRMATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    ShipmentIdentifier::schema_fields()
        .optional("deliveryDateTime", date_time_schema())
        .required("charges", Schema::array(Charge::schema()))
        .optional("label", Document::schema())
        .optional("packages", Schema::array(PackageConfirmation::schema()))
        .into()
});

/// What the carrier returned after creating a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentConfirmation {
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_date_time: Option<String>,
    charges: Vec<Charge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<Document>,
    #[serde(default)]
    packages: Vec<PackageConfirmation>,
}

impl ShipmentConfirmation {
    pub fn delivery_date_time(&self) -> Option<&str> {
        self.delivery_date_time.as_deref()
    }

    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn label(&self) -> Option<&Document> {
        self.label.as_ref()
    }

    pub fn packages(&self) -> &[PackageConfirmation] {
        &self.packages
    }

    /// Sum of every charge; fails if charges mix currencies.
    pub fn total_amount(&self, fallback_currency: &Currency) -> Result<MonetaryValue, SdkError> {
        MonetaryValue::sum(self.charges.iter().map(|c| &c.amount), fallback_currency)
    }
}

impl ShipmentIdentity for ShipmentConfirmation {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

impl Schematic for ShipmentConfirmation {
    const LABEL: &'static str = "shipment confirmation";

    fn schema() -> &'static Schema {
        &SHIPMENT_CONFIRMATION_SCHEMA
    }
}

impl Resolvable for ShipmentConfirmation {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

static SHIPMENT_CANCELLATION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    ShipmentIdentifier::schema_fields()
        .required("cancellationID", Schema::uuid())
        .into()
});

/// A request to cancel one previously created shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentCancellation {
    #[serde(rename = "cancellationID")]
    cancellation_id: Uuid,
    #[serde(flatten)]
    identifier: ShipmentIdentifier,
}

impl ShipmentCancellation {
    /// Correlates this request with its outcome.
    pub fn cancellation_id(&self) -> Uuid {
        self.cancellation_id
    }
}

impl ShipmentIdentity for ShipmentCancellation {
    fn shipment_identifier(&self) -> &ShipmentIdentifier {
        &self.identifier
    }
}

impl Schematic for ShipmentCancellation {
    const LABEL: &'static str = "shipment cancellation";

    fn schema() -> &'static Schema {
        &SHIPMENT_CANCELLATION_SCHEMA
    }
}

impl Resolvable for ShipmentCancellation {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationStatus {
    Success,
    Error,
    Timeout,
    Skip,
}

impl Default for CancellationStatus {
    /// Plugins may omit the status of a cancellation that went through.
    fn default() -> Self {
        CancellationStatus::Success
    }
}

impl CancellationStatus {
    pub const VALUES: &'static [&'static str] = &["success", "error", "timeout", "skip"];
}

static CANCELLATION_OUTCOME_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("cancellationID", Schema::uuid())
        .optional("status", Schema::string().one_of(CancellationStatus::VALUES))
        .optional("confirmationNumber", Schema::text())
        .optional("code", Schema::text())
        .optional("description", Schema::string().single_line())
        .optional("notes", Schema::array(Schema::string()))
        .into()
});

/// The result of cancelling one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentCancellationOutcome {
    #[serde(rename = "cancellationID")]
    cancellation_id: Uuid,
    #[serde(default)]
    status: CancellationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confirmation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl ShipmentCancellationOutcome {
    /// A successful outcome for `cancellation_id`.
    pub fn succeeded(cancellation_id: Uuid) -> Self {
        Self {
            cancellation_id,
            status: CancellationStatus::Success,
            confirmation_number: None,
            code: None,
            description: None,
            notes: Vec::new(),
        }
    }

    pub fn cancellation_id(&self) -> Uuid {
        self.cancellation_id
    }

    pub fn status(&self) -> CancellationStatus {
        self.status
    }

    pub fn confirmation_number(&self) -> Option<&str> {
        self.confirmation_number.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl Schematic for ShipmentCancellationOutcome {
    const LABEL: &'static str = "shipment cancellation outcome";

    fn schema() -> &'static Schema {
        &CANCELLATION_OUTCOME_SCHEMA
    }
}

impl Resolvable for ShipmentCancellationOutcome {
    fn build(raw: &Value, _registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        decode(raw, Self::LABEL)
    }
}
