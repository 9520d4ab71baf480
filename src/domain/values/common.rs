//! Building blocks shared by several business-method values.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::domain::foundation::{Identifiable, MonetaryValue, SdkError};
use crate::domain::registry::{ReferenceKey, ReferenceRegistry, Referenceable};
use crate::domain::validation::{ObjectSchema, Schema, StringFormat};

static COUNTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("country pattern is valid"));

/// ISO-8601 date-time with a mandatory offset.
pub fn date_time_schema() -> Schema {
    Schema::string()
        .format(StringFormat::DateTime {
            require_timezone: true,
        })
        .into()
}

pub fn money_schema() -> Schema {
    Schema::object()
        .required("value", Schema::number())
        .required("currency", Schema::string().format(StringFormat::Currency))
        .into()
}

/// A postal address with optional contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address_lines: Vec<String>,
    pub city_locality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_residential: Option<bool>,
}

impl Address {
    pub fn schema() -> ObjectSchema {
        Schema::object()
            .optional("company", Schema::text())
            .optional("name", Schema::text())
            .optional("phone", Schema::text())
            .optional("email", Schema::text())
            .required("addressLines", Schema::array(Schema::text()).min_items(1))
            .required("cityLocality", Schema::text())
            .optional("stateProvince", Schema::text())
            .required("postalCode", Schema::text())
            .required("country", Schema::string().pattern(COUNTRY.clone(), "two-letter country code"))
            .optional("isResidential", Schema::boolean())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lb,
    Oz,
    Kg,
    G,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn schema() -> Schema {
        Schema::object()
            .required("value", Schema::number().min(0.0))
            .required("unit", Schema::string().one_of(&["lb", "oz", "kg", "g"]))
            .into()
    }

    /// The weight in grams.
    pub fn grams(&self) -> f64 {
        match self.unit {
            WeightUnit::G => self.value,
            WeightUnit::Kg => self.value * 1000.0,
            WeightUnit::Oz => self.value * 28.349_523_125,
            WeightUnit::Lb => self.value * 453.592_37,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    In,
    Cm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub unit: LengthUnit,
}

impl Dimensions {
    pub fn schema() -> Schema {
        Schema::object()
            .required("length", Schema::number().min(0.0))
            .required("width", Schema::number().min(0.0))
            .required("height", Schema::number().min(0.0))
            .required("unit", Schema::string().one_of(&["in", "cm"]))
            .into()
    }
}

/// A start/end pair of ISO-8601 date-times, optionally pinned to the
/// local time zone of the place they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_date_time: String,
    pub end_date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl TimeRange {
    pub fn schema() -> Schema {
        Schema::object()
            .required("startDateTime", date_time_schema())
            .required("endDateTime", date_time_schema())
            .optional("timeZone", Schema::string().format(StringFormat::TimeZone))
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeType {
    Shipping,
    DeliveryConfirmation,
    Insurance,
    Fuel,
    Tax,
    Duties,
    Pickup,
    Discount,
    Other,
}

impl ChargeType {
    pub const VALUES: &'static [&'static str] = &[
        "shipping",
        "delivery_confirmation",
        "insurance",
        "fuel",
        "tax",
        "duties",
        "pickup",
        "discount",
        "other",
    ];
}

/// One line item of a rate, label, or pickup bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    pub amount: MonetaryValue,
}

impl Charge {
    pub fn schema() -> Schema {
        Schema::object()
            .optional("name", Schema::text())
            .required("type", Schema::string().one_of(ChargeType::VALUES))
            .required("amount", money_schema())
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Label,
    CustomsForm,
    ScanForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Zpl,
    Png,
}

/// A printable document returned by a carrier, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub format: DocumentFormat,
    pub data: String,
}

impl Document {
    pub fn schema() -> Schema {
        Schema::object()
            .optional("name", Schema::text())
            .required("type", Schema::string().one_of(&["label", "customs_form", "scan_form"]))
            .required("format", Schema::string().one_of(&["pdf", "zpl", "png"]))
            .required("data", Schema::string().non_empty())
            .into()
    }
}

/// Resolves a required reference that already passed its schema.
pub(crate) fn resolve<T: Referenceable>(
    raw: &Value,
    field: &str,
    registry: &ReferenceRegistry,
) -> Result<Arc<T>, SdkError> {
    let key = ReferenceKey::from_value(&raw[field])
        .ok_or_else(|| SdkError::invalid(format!("{} is required.", field)))?;
    registry.lookup::<T>(key)
}

/// Resolves an optional reference that already passed its schema.
pub(crate) fn resolve_optional<T: Referenceable>(
    raw: &Value,
    field: &str,
    registry: &ReferenceRegistry,
) -> Result<Option<Arc<T>>, SdkError> {
    let key = raw.get(field).and_then(ReferenceKey::from_value);
    registry.lookup_optional::<T>(key)
}

/// Serializes a resolved definition as its id.
pub(crate) fn serialize_reference<S, T>(value: &Arc<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Identifiable,
{
    value.id().serialize(serializer)
}

pub(crate) fn serialize_optional_reference<S, T>(
    value: &Option<Arc<T>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Identifiable,
{
    value.as_ref().map(|v| v.id()).serialize(serializer)
}

pub(crate) fn serialize_references<S, T>(values: &[Arc<T>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Identifiable,
{
    serializer.collect_seq(values.iter().map(|v| v.id()))
}
