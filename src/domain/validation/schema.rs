//! Declarative schema descriptions.
//!
//! Schemas are plain data built once (usually inside a `Lazy` static) and
//! interpreted by [`super::validate`]. Builders consume and return `self`
//! so a schema reads top to bottom in declaration order, which is also the
//! order violations are reported in.

use regex::Regex;

/// The shape a JSON value must have.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Anything, including opaque UI form schemas.
    Any,
    Boolean,
    Number(NumberSchema),
    String(StringSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    /// Arbitrary non-empty keys, every value matching the inner schema.
    Map(Box<Schema>),
    /// Locale tag → per-locale object, e.g. `{ "en": { "name": ".." } }`.
    Localization(Box<Schema>),
    /// The value must match one of the alternatives, chosen by JSON type.
    OneOf(Vec<Schema>),
}

impl Schema {
    pub fn any() -> Schema {
        Schema::Any
    }

    pub fn boolean() -> Schema {
        Schema::Boolean
    }

    pub fn number() -> NumberSchema {
        NumberSchema::default()
    }

    pub fn integer() -> NumberSchema {
        NumberSchema {
            integer: true,
            ..NumberSchema::default()
        }
    }

    pub fn string() -> StringSchema {
        StringSchema::default()
    }

    /// A non-empty single-line string.
    pub fn text() -> StringSchema {
        StringSchema::default().non_empty().single_line()
    }

    /// A UUID string.
    pub fn uuid() -> StringSchema {
        StringSchema::default().format(StringFormat::Uuid)
    }

    pub fn array(items: impl Into<Schema>) -> ArraySchema {
        ArraySchema {
            items: Box::new(items.into()),
            min_items: 0,
        }
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    /// An object whose contents are not inspected.
    pub fn any_object() -> ObjectSchema {
        ObjectSchema::default().allow_unknown()
    }

    pub fn map(values: impl Into<Schema>) -> Schema {
        Schema::Map(Box::new(values.into()))
    }

    pub fn localization(per_locale: impl Into<Schema>) -> Schema {
        Schema::Localization(Box::new(per_locale.into()))
    }

    pub fn one_of(alternatives: Vec<Schema>) -> Schema {
        Schema::OneOf(alternatives)
    }

    /// A reference to a registered definition: an id/code string or an
    /// object carrying a UUID `id`.
    pub fn reference() -> Schema {
        Schema::OneOf(vec![
            Schema::text().into(),
            Schema::any_object().required("id", Schema::uuid()).into(),
        ])
    }

    /// Human-readable JSON type this schema expects.
    pub fn type_name(&self) -> String {
        match self {
            Schema::Any => "any value".to_string(),
            Schema::Boolean => "boolean".to_string(),
            Schema::Number(n) if n.integer => "integer".to_string(),
            Schema::Number(_) => "number".to_string(),
            Schema::String(_) => "string".to_string(),
            Schema::Array(_) => "array".to_string(),
            Schema::Object(_) | Schema::Map(_) | Schema::Localization(_) => "object".to_string(),
            Schema::OneOf(alternatives) => alternatives
                .iter()
                .map(Schema::type_name)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

/// Special string formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    Uuid,
    /// ISO-8601 date-time; `require_timezone` demands `Z` or an offset.
    DateTime { require_timezone: bool },
    /// A UTC offset (`+05:30`, `Z`) or an IANA zone name.
    TimeZone,
    /// An absolute filesystem path, optionally with a required extension.
    FilePath { extension: Option<&'static str> },
    /// An absolute `http`/`https` URL.
    Website,
    LocaleTag,
    Currency,
}

impl StringFormat {
    pub(crate) fn describe(&self) -> String {
        match self {
            StringFormat::Uuid => "UUID".to_string(),
            StringFormat::DateTime {
                require_timezone: true,
            } => "ISO 8601 date/time with a time zone".to_string(),
            StringFormat::DateTime {
                require_timezone: false,
            } => "ISO 8601 date/time".to_string(),
            StringFormat::TimeZone => "UTC offset or IANA time zone".to_string(),
            StringFormat::FilePath { extension: Some(ext) } => {
                format!("absolute file path ending in .{}", ext)
            }
            StringFormat::FilePath { extension: None } => "absolute file path".to_string(),
            StringFormat::Website => "website URL including http:// or https://".to_string(),
            StringFormat::LocaleTag => "locale tag such as \"en\" or \"en-US\"".to_string(),
            StringFormat::Currency => "ISO 4217 currency code".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub(crate) non_empty: bool,
    pub(crate) single_line: bool,
    pub(crate) max_length: Option<usize>,
    pub(crate) allowed: Option<Vec<&'static str>>,
    pub(crate) format: Option<StringFormat>,
    pub(crate) pattern: Option<(Regex, &'static str)>,
}

impl StringSchema {
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Rejects `\n`, `\r` and `\t`.
    pub fn single_line(mut self) -> Self {
        self.single_line = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Restricts the value to a fixed set.
    pub fn one_of(mut self, allowed: &[&'static str]) -> Self {
        self.allowed = Some(allowed.to_vec());
        self
    }

    pub fn format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Requires the value to match `pattern`; `description` names it in errors.
    pub fn pattern(mut self, pattern: Regex, description: &'static str) -> Self {
        self.pattern = Some((pattern, description));
        self
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::String(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub(crate) integer: bool,
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
}

impl NumberSchema {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

impl From<NumberSchema> for Schema {
    fn from(n: NumberSchema) -> Self {
        Schema::Number(n)
    }
}

#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub(crate) items: Box<Schema>,
    pub(crate) min_items: usize,
}

impl ArraySchema {
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = min;
        self
    }
}

impl From<ArraySchema> for Schema {
    fn from(a: ArraySchema) -> Self {
        Schema::Array(a)
    }
}

/// A named field of an object schema.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: &'static str,
    pub(crate) schema: Schema,
    pub(crate) required: bool,
}

/// "If `field` equals `equals`, then `require` must be present."
#[derive(Debug, Clone)]
pub struct Conditional {
    pub(crate) field: &'static str,
    pub(crate) equals: &'static str,
    pub(crate) require: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub(crate) fields: Vec<Field>,
    pub(crate) conditionals: Vec<Conditional>,
    pub(crate) allow_unknown: bool,
}

impl ObjectSchema {
    pub fn required(mut self, name: &'static str, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            name,
            schema: schema.into(),
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            name,
            schema: schema.into(),
            required: false,
        });
        self
    }

    /// Makes `require` mandatory whenever the sibling `field` equals `equals`.
    pub fn require_when(
        mut self,
        field: &'static str,
        equals: &'static str,
        require: &[&'static str],
    ) -> Self {
        self.conditionals.push(Conditional {
            field,
            equals,
            require: require.to_vec(),
        });
        self
    }

    /// Accepts keys that are not declared as fields.
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    /// Appends every field and conditional of `other`.
    pub fn extend(mut self, other: ObjectSchema) -> Self {
        self.fields.extend(other.fields);
        self.conditionals.extend(other.conditionals);
        self
    }

    pub(crate) fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(o: ObjectSchema) -> Self {
        Schema::Object(o)
    }
}
