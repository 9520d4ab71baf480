//! Rate quoting values.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{
    date_time_schema, resolve, resolve_optional, serialize_optional_reference,
    serialize_reference, serialize_references, Address, Charge, Dimensions, Weight,
};
use super::Resolvable;
use crate::domain::definitions::{DeliveryService, Packaging};
use crate::domain::foundation::{Currency, MonetaryValue, SdkError};
use crate::domain::registry::{ReferenceKey, ReferenceRegistry};
use crate::domain::validation::{decode, Schema, Schematic};

/// A package to quote; packaging is optional when shopping rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePackage {
    #[serde(
        serialize_with = "serialize_optional_reference",
        skip_serializing_if = "Option::is_none"
    )]
    packaging: Option<Arc<Packaging>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
}

#[derive(Deserialize)]
struct RatePackageFields {
    #[serde(default)]
    weight: Option<Weight>,
    #[serde(default)]
    dimensions: Option<Dimensions>,
}

impl RatePackage {
    fn schema() -> Schema {
        Schema::object()
            .optional("packaging", Schema::reference())
            .optional("weight", Weight::schema())
            .optional("dimensions", Dimensions::schema())
            .into()
    }

    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let fields = decode::<RatePackageFields>(raw, RateCriteria::LABEL)?;
        Ok(Self {
            packaging: resolve_optional::<Packaging>(raw, "packaging", registry)?,
            weight: fields.weight,
            dimensions: fields.dimensions,
        })
    }

    pub fn packaging(&self) -> Option<&Arc<Packaging>> {
        self.packaging.as_ref()
    }

    pub fn weight(&self) -> Option<&Weight> {
        self.weight.as_ref()
    }

    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }
}

static RATE_CRITERIA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .optional("deliveryServices", Schema::array(Schema::reference()))
        .required("shipDateTime", date_time_schema())
        .required("shipFrom", Address::schema())
        .required("shipTo", Address::schema())
        .required("packages", Schema::array(RatePackage::schema()).min_items(1))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateCriteriaFields {
    ship_date_time: String,
    ship_from: Address,
    ship_to: Address,
}

/// What to quote: an empty service list means "every service".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCriteria {
    #[serde(serialize_with = "serialize_references")]
    delivery_services: Vec<Arc<DeliveryService>>,
    ship_date_time: String,
    ship_from: Address,
    ship_to: Address,
    packages: Vec<RatePackage>,
}

impl RateCriteria {
    pub fn delivery_services(&self) -> &[Arc<DeliveryService>] {
        &self.delivery_services
    }

    pub fn ship_date_time(&self) -> &str {
        &self.ship_date_time
    }

    pub fn ship_from(&self) -> &Address {
        &self.ship_from
    }

    pub fn ship_to(&self) -> &Address {
        &self.ship_to
    }

    pub fn packages(&self) -> &[RatePackage] {
        &self.packages
    }
}

impl Schematic for RateCriteria {
    const LABEL: &'static str = "rate criteria";

    fn schema() -> &'static Schema {
        &RATE_CRITERIA_SCHEMA
    }
}

impl Resolvable for RateCriteria {
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let fields = decode::<RateCriteriaFields>(raw, Self::LABEL)?;

        let delivery_services = raw
            .get("deliveryServices")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(ReferenceKey::from_value)
            .map(|key| registry.lookup::<DeliveryService>(key))
            .collect::<Result<Vec<_>, _>>()?;
        let packages = raw["packages"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|package| RatePackage::build(package, registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            delivery_services,
            ship_date_time: fields.ship_date_time,
            ship_from: fields.ship_from,
            ship_to: fields.ship_to,
            packages,
        })
    }
}

static RATE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::object()
        .required("deliveryService", Schema::reference())
        .optional("packaging", Schema::reference())
        .optional("shipDateTime", date_time_schema())
        .optional("deliveryDateTime", date_time_schema())
        .optional("isGuaranteed", Schema::boolean())
        .optional("isTrackable", Schema::boolean())
        .required("charges", Schema::array(Charge::schema()))
        .optional("notes", Schema::array(Schema::string()))
        .into()
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateFields {
    #[serde(default)]
    ship_date_time: Option<String>,
    #[serde(default)]
    delivery_date_time: Option<String>,
    #[serde(default)]
    is_guaranteed: bool,
    #[serde(default)]
    is_trackable: bool,
    charges: Vec<Charge>,
    #[serde(default)]
    notes: Vec<String>,
}

/// A price quote for one delivery service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    #[serde(serialize_with = "serialize_reference")]
    delivery_service: Arc<DeliveryService>,
    #[serde(
        serialize_with = "serialize_optional_reference",
        skip_serializing_if = "Option::is_none"
    )]
    packaging: Option<Arc<Packaging>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ship_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivery_date_time: Option<String>,
    is_guaranteed: bool,
    is_trackable: bool,
    charges: Vec<Charge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl Rate {
    pub fn delivery_service(&self) -> &Arc<DeliveryService> {
        &self.delivery_service
    }

    pub fn packaging(&self) -> Option<&Arc<Packaging>> {
        self.packaging.as_ref()
    }

    pub fn ship_date_time(&self) -> Option<&str> {
        self.ship_date_time.as_deref()
    }

    pub fn delivery_date_time(&self) -> Option<&str> {
        self.delivery_date_time.as_deref()
    }

    pub fn is_guaranteed(&self) -> bool {
        self.is_guaranteed
    }

    pub fn is_trackable(&self) -> bool {
        self.is_trackable
    }

    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Sum of every charge; fails if charges mix currencies.
    pub fn total_amount(&self, fallback_currency: &Currency) -> Result<MonetaryValue, SdkError> {
        MonetaryValue::sum(self.charges.iter().map(|c| &c.amount), fallback_currency)
    }
}

impl Schematic for Rate {
    const LABEL: &'static str = "rate";

    fn schema() -> &'static Schema {
        &RATE_SCHEMA
    }
}

impl Resolvable for Rate {
    fn build(raw: &Value, registry: &ReferenceRegistry) -> Result<Self, SdkError> {
        let fields = decode::<RateFields>(raw, Self::LABEL)?;
        Ok(Self {
            delivery_service: resolve::<DeliveryService>(raw, "deliveryService", registry)?,
            packaging: resolve_optional::<Packaging>(raw, "packaging", registry)?,
            ship_date_time: fields.ship_date_time,
            delivery_date_time: fields.delivery_date_time,
            is_guaranteed: fields.is_guaranteed,
            is_trackable: fields.is_trackable,
            charges: fields.charges,
            notes: fields.notes,
        })
    }
}
