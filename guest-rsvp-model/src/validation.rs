//! Field-level validation of an incoming guest payload.
//!
//! Payloads are loosely typed JSON. Each field is coerced the way a document
//! store schema would do it (numbers become strings for text fields, `"yes"`
//! becomes `true`, a lone value becomes a one-element list) and then checked
//! against its range or enumeration. All failing fields are reported at once.

use core::fmt::{self, Display};

use serde_json::{Map, Value};

use crate::guest::{DayOfMonth, GuestSubmission, TimeSlot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Guest validation failed: {}", join_field_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|error| error.field).collect()
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

pub fn validate_submission(payload: &Value) -> Result<GuestSubmission, ValidationErrors> {
    let Value::Object(object) = payload else {
        return Err(ValidationErrors(vec![FieldError {
            field: "body",
            message: "expected a JSON object".to_owned(),
        }]));
    };

    let mut collector = Collector { errors: Vec::new() };

    let name = text_field(object, "name", &mut collector);
    let allergies_and_diet = text_field(object, "allergiesAndDiet", &mut collector);
    let needs_accommodation = bool_field(object, "needsAccommodation", &mut collector);
    let available_days = list_field(object, "availableDays", &mut collector, cast_day);
    let available_time = list_field(object, "availableTime", &mut collector, cast_time_slot);

    if collector.errors.is_empty() {
        Ok(GuestSubmission {
            name,
            allergies_and_diet,
            needs_accommodation,
            available_days,
            available_time,
        })
    } else {
        Err(ValidationErrors(collector.errors))
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn text_field(object: &Map<String, Value>, field: &'static str, collector: &mut Collector) -> String {
    match present(object, field) {
        None => String::new(),
        Some(Value::String(text)) => text.trim().to_owned(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => {
            collector.push(field, format!("cannot use {} as text", kind(other)));
            String::new()
        }
    }
}

fn bool_field(object: &Map<String, Value>, field: &'static str, collector: &mut Collector) -> bool {
    let Some(value) = present(object, field) else {
        return false;
    };
    let coerced = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(text) => match text.as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    coerced.unwrap_or_else(|| {
        collector.push(field, format!("cannot use {value} as a boolean"));
        false
    })
}

fn list_field<T>(
    object: &Map<String, Value>,
    field: &'static str,
    collector: &mut Collector,
    cast: fn(&Value) -> Result<T, String>,
) -> Vec<T> {
    let elements = match present(object, field) {
        None => return Vec::new(),
        Some(Value::Array(elements)) => elements.iter().collect::<Vec<_>>(),
        Some(single) => vec![single],
    };
    let mut result = Vec::with_capacity(elements.len());
    for element in elements {
        match cast(element) {
            Ok(value) => result.push(value),
            Err(message) => {
                collector.push(field, message);
                return Vec::new();
            }
        }
    }
    result
}

fn cast_day(value: &Value) -> Result<DayOfMonth, String> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|number| number.is_finite() && number.fract() == 0.0)
        .filter(|number| {
            (f64::from(DayOfMonth::FIRST)..=f64::from(DayOfMonth::LAST)).contains(number)
        })
        .and_then(|number| {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "range checked above"
            )]
            let day = number as u8;
            DayOfMonth::new(day)
        })
        .ok_or_else(|| {
            format!(
                "days must be whole numbers between {} and {}, got {value}",
                DayOfMonth::FIRST,
                DayOfMonth::LAST
            )
        })
}

fn cast_time_slot(value: &Value) -> Result<TimeSlot, String> {
    let token = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => return Err(format!("cannot use {} as a time slot", kind(other))),
    };
    token.parse::<TimeSlot>().map_err(|_| {
        format!(
            "`{token}` is not one of {}",
            TimeSlot::ALL
                .iter()
                .map(|slot| format!("`{slot}`"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
