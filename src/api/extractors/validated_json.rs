//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{AppError, AppResult, FieldErrors};

/// Fields passed through exactly as sent
const UNTRIMMED_FIELDS: &[&str] = &["password", "password_confirmation", "current_password"];

/// Validated JSON extractor that automatically validates requests.
///
/// A body that is not JSON is a `BadRequest`. Everything else is checked
/// field by field: string members are trimmed (passwords excepted), blank
/// strings count as missing, members of the wrong JSON type and rule
/// violations become a `Validation` error with messages grouped by field.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use auth_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct LoginRequest {
///     #[validate(required, email)]
///     email: Option<String>,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        parse_body(body).map(ValidatedJson)
    }
}

/// Turn a decoded JSON body into a validated `T`
fn parse_body<T>(body: Value) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let mut fields = normalize(body);
    let type_errors = take_mistyped::<T>(&mut fields);

    let value: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::bad_request(e.to_string()))?;

    let mut errors = match value.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => format_validation_errors(&e),
    };
    // Mistyped members were cleared, so their "required" message is replaced
    errors.extend(type_errors);

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Trim string members and treat blank strings as absent.
///
/// A body that is not an object carries no fields.
fn normalize(body: Value) -> Map<String, Value> {
    let Value::Object(mut fields) = body else {
        return Map::new();
    };

    for (key, value) in fields.iter_mut() {
        let blank = match value {
            Value::String(text) => {
                if !UNTRIMMED_FIELDS.contains(&key.as_str()) {
                    *text = text.trim().to_string();
                }
                text.is_empty()
            }
            _ => false,
        };
        if blank {
            *value = Value::Null;
        }
    }

    fields
}

/// Clear members whose JSON type the target rejects, returning their messages.
///
/// Each non-string member is tried on its own against a body where the other
/// candidates are null, so one bad member never masks another.
fn take_mistyped<T: DeserializeOwned>(fields: &mut Map<String, Value>) -> FieldErrors {
    let candidates: Vec<String> = fields
        .iter()
        .filter(|(_, value)| !value.is_string() && !value.is_null())
        .map(|(key, _)| key.clone())
        .collect();

    let mut cleared = fields.clone();
    for key in &candidates {
        cleared.insert(key.clone(), Value::Null);
    }

    let mut errors = FieldErrors::new();
    for key in candidates {
        let mut trial = cleared.clone();
        if let Some(value) = fields.get(&key) {
            trial.insert(key.clone(), value.clone());
        }

        if let Err(e) = serde_json::from_value::<T>(Value::Object(trial)) {
            errors.insert(key.clone(), vec![type_message(&key, &e)]);
            fields.insert(key, Value::Null);
        }
    }

    errors
}

fn type_message(field: &str, err: &serde_json::Error) -> String {
    let label = field.replace('_', " ");
    if err.to_string().contains("expected a string") {
        format!("The {} field must be a string.", label)
    } else {
        format!("The {} field is invalid.", label)
    }
}

/// Group validation errors into per-field messages
pub fn format_validation_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();

    for (field, errs) in errors.field_errors() {
        let messages = fields.entry(field.to_string()).or_default();
        for err in errs.iter() {
            let message = describe(&field, err);
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
    }

    fields
}

/// Render one rule violation as a sentence
fn describe(field: &str, err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let label = field.replace('_', " ");
    let value = err.params.get("value").and_then(|v| v.as_str());

    if err.code == "required" || value == Some("") {
        return format!("The {} field is required.", label);
    }

    match err.code.as_ref() {
        "email" => format!("The {} field must be a valid email address.", label),
        "length" => {
            let len = value.map(|v| v.chars().count() as u64);
            let min = err.params.get("min").and_then(|v| v.as_u64());
            let max = err.params.get("max").and_then(|v| v.as_u64());

            match (len, min, max) {
                (Some(len), Some(min), _) if len < min => {
                    format!("The {} field must be at least {} characters.", label, min)
                }
                (_, _, Some(max)) => format!(
                    "The {} field must not be greater than {} characters.",
                    label, max
                ),
                (_, Some(min), None) => {
                    format!("The {} field must be at least {} characters.", label, min)
                }
                _ => format!("The {} field is invalid.", label),
            }
        }
        _ => format!("The {} field is invalid.", label),
    }
}
