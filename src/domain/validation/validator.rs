//! Schema interpreter.
//!
//! Walks a value alongside its [`Schema`], collecting every violation
//! rather than stopping at the first, then folds them into one `Invalid`
//! error.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::formats;
use super::schema::{ArraySchema, Conditional, NumberSchema, ObjectSchema, Schema, StringSchema};
use super::violation::{ConstraintViolation, Violations};
use crate::domain::foundation::{LocaleTag, SdkError};

/// Validates `value` against `schema`.
///
/// Returns the value unchanged when every constraint holds. Otherwise
/// returns a single `Invalid` error whose message lists every violation in
/// declaration order; the structured list is attached as the cause.
pub fn validate<'v>(value: &'v Value, label: &str, schema: &Schema) -> Result<&'v Value, SdkError> {
    if value.is_null() {
        return Err(SdkError::invalid(format!("Invalid {}: a value is required.", label))
            .with_detail("label", label));
    }

    let violations = collect_violations(value, schema);
    if violations.is_empty() {
        return Ok(value);
    }

    let lines: Vec<String> = violations.iter().map(|v| format!("  {}.", v)).collect();
    Err(
        SdkError::invalid(format!("Invalid {}:\n{}", label, lines.join("\n")))
            .with_detail("label", label)
            .caused_by(Arc::new(Violations(violations))),
    )
}

/// Returns every violation of `schema` by `value`, without building an error.
pub fn collect_violations(value: &Value, schema: &Schema) -> Vec<ConstraintViolation> {
    let mut out = Vec::new();
    check(value, schema, "", &mut out);
    out
}

fn check(value: &Value, schema: &Schema, path: &str, out: &mut Vec<ConstraintViolation>) {
    match schema {
        Schema::Any => {}
        Schema::Boolean => {
            if !value.is_boolean() {
                out.push(type_mismatch(path, "boolean", value));
            }
        }
        Schema::Number(rules) => check_number(value, rules, path, out),
        Schema::String(rules) => check_string(value, rules, path, out),
        Schema::Array(rules) => check_array(value, rules, path, out),
        Schema::Object(rules) => check_object(value, rules, path, out),
        Schema::Map(values) => check_map(value, values, path, out),
        Schema::Localization(per_locale) => check_localization(value, per_locale, path, out),
        Schema::OneOf(alternatives) => check_one_of(value, alternatives, path, out),
    }
}

fn check_number(value: &Value, rules: &NumberSchema, path: &str, out: &mut Vec<ConstraintViolation>) {
    let Some(n) = value.as_f64() else {
        out.push(type_mismatch(path, if rules.integer { "integer" } else { "number" }, value));
        return;
    };
    if rules.integer && n.fract() != 0.0 {
        out.push(type_mismatch(path, "integer", value));
    }
    if let Some(min) = rules.min {
        if n < min {
            out.push(ConstraintViolation::TooSmall {
                path: display_path(path),
                min: min.to_string(),
                actual: n.to_string(),
            });
        }
    }
    if let Some(max) = rules.max {
        if n > max {
            out.push(ConstraintViolation::TooLarge {
                path: display_path(path),
                max: max.to_string(),
                actual: n.to_string(),
            });
        }
    }
}

fn check_string(value: &Value, rules: &StringSchema, path: &str, out: &mut Vec<ConstraintViolation>) {
    let Some(s) = value.as_str() else {
        out.push(type_mismatch(path, "string", value));
        return;
    };

    if rules.non_empty && s.trim().is_empty() {
        out.push(ConstraintViolation::Empty {
            path: display_path(path),
        });
        return;
    }
    if rules.single_line && s.contains(&['\n', '\r', '\t'][..]) {
        out.push(ConstraintViolation::MultiLine {
            path: display_path(path),
        });
    }
    if let Some(max) = rules.max_length {
        let len = s.chars().count();
        if len > max {
            out.push(ConstraintViolation::TooLarge {
                path: display_path(path),
                max: format!("{} characters", max),
                actual: len.to_string(),
            });
        }
    }
    if let Some(allowed) = &rules.allowed {
        if !allowed.contains(&s) {
            out.push(ConstraintViolation::NotAllowed {
                path: display_path(path),
                allowed: allowed
                    .iter()
                    .map(|a| format!("\"{}\"", a))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }
    if let Some(format) = &rules.format {
        if !formats::matches(format, s) {
            out.push(ConstraintViolation::InvalidFormat {
                path: display_path(path),
                format: format.describe(),
            });
        }
    }
    if let Some((pattern, description)) = &rules.pattern {
        if !pattern.is_match(s) {
            out.push(ConstraintViolation::InvalidFormat {
                path: display_path(path),
                format: description.to_string(),
            });
        }
    }
}

fn check_array(value: &Value, rules: &ArraySchema, path: &str, out: &mut Vec<ConstraintViolation>) {
    let Some(items) = value.as_array() else {
        out.push(type_mismatch(path, "array", value));
        return;
    };
    if items.len() < rules.min_items {
        out.push(ConstraintViolation::TooFewItems {
            path: display_path(path),
            min: rules.min_items,
            actual: items.len(),
        });
    }
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", display_path(path), i);
        if item.is_null() {
            out.push(ConstraintViolation::MissingRequired { path: item_path });
            continue;
        }
        check(item, &rules.items, &item_path, out);
    }
}

fn check_object(value: &Value, rules: &ObjectSchema, path: &str, out: &mut Vec<ConstraintViolation>) {
    let Some(map) = value.as_object() else {
        out.push(type_mismatch(path, "object", value));
        return;
    };

    for field in &rules.fields {
        let field_path = join(path, field.name);
        match map.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    out.push(ConstraintViolation::MissingRequired { path: field_path });
                } else if let Some(conditional) = triggered_requirement(map, rules, field.name) {
                    out.push(ConstraintViolation::ConditionallyRequired {
                        path: field_path,
                        field: join(path, conditional.field),
                        equals: conditional.equals.to_string(),
                    });
                }
            }
            Some(v) => check(v, &field.schema, &field_path, out),
        }
    }

    // Conditionally required keys with no field declaration of their own.
    for conditional in &rules.conditionals {
        if !is_triggered(map, conditional) {
            continue;
        }
        for required in &conditional.require {
            if !rules.declares(required) && is_absent(map, required) {
                out.push(ConstraintViolation::ConditionallyRequired {
                    path: join(path, required),
                    field: join(path, conditional.field),
                    equals: conditional.equals.to_string(),
                });
            }
        }
    }

    if !rules.allow_unknown {
        for key in map.keys() {
            if !rules.declares(key) {
                out.push(ConstraintViolation::UnknownField {
                    path: join(path, key),
                });
            }
        }
    }
}

fn check_map(value: &Value, values: &Schema, path: &str, out: &mut Vec<ConstraintViolation>) {
    let Some(map) = value.as_object() else {
        out.push(type_mismatch(path, "object", value));
        return;
    };
    for (key, entry) in map {
        let entry_path = join(path, key);
        if key.trim().is_empty() {
            out.push(ConstraintViolation::Empty { path: entry_path });
            continue;
        }
        check(entry, values, &entry_path, out);
    }
}

fn check_localization(value: &Value, per_locale: &Schema, path: &str, out: &mut Vec<ConstraintViolation>) {
    let Some(map) = value.as_object() else {
        out.push(type_mismatch(path, "object", value));
        return;
    };
    for (tag, entry) in map {
        let entry_path = join(path, tag);
        if !LocaleTag::is_valid(tag) {
            out.push(ConstraintViolation::InvalidFormat {
                path: entry_path.clone(),
                format: "locale tag such as \"en\" or \"en-US\"".to_string(),
            });
        }
        check(entry, per_locale, &entry_path, out);
    }
}

fn check_one_of(value: &Value, alternatives: &[Schema], path: &str, out: &mut Vec<ConstraintViolation>) {
    let candidate = alternatives
        .iter()
        .find(|alternative| accepts_json_type(alternative, value));

    match candidate {
        Some(alternative) => check(value, alternative, path, out),
        None => out.push(ConstraintViolation::InvalidType {
            path: display_path(path),
            expected: Schema::OneOf(alternatives.to_vec()).type_name(),
            actual: json_type(value).to_string(),
        }),
    }
}

fn accepts_json_type(schema: &Schema, value: &Value) -> bool {
    match schema {
        Schema::Any => true,
        Schema::Boolean => value.is_boolean(),
        Schema::Number(_) => value.is_number(),
        Schema::String(_) => value.is_string(),
        Schema::Array(_) => value.is_array(),
        Schema::Object(_) | Schema::Map(_) | Schema::Localization(_) => value.is_object(),
        Schema::OneOf(inner) => inner.iter().any(|s| accepts_json_type(s, value)),
    }
}

fn is_absent(map: &Map<String, Value>, key: &str) -> bool {
    matches!(map.get(key), None | Some(Value::Null))
}

fn is_triggered(map: &Map<String, Value>, conditional: &Conditional) -> bool {
    map.get(conditional.field).and_then(Value::as_str) == Some(conditional.equals)
}

fn triggered_requirement<'r>(
    map: &Map<String, Value>,
    rules: &'r ObjectSchema,
    name: &str,
) -> Option<&'r Conditional> {
    rules
        .conditionals
        .iter()
        .find(|c| c.require.iter().any(|r| *r == name) && is_triggered(map, c))
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> ConstraintViolation {
    ConstraintViolation::InvalidType {
        path: display_path(path),
        expected: expected.to_string(),
        actual: json_type(value).to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "value".to_string()
    } else {
        path.to_string()
    }
}
