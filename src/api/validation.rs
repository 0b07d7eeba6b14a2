use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Render validation errors as `{field: {"errors": [...]}}`, nesting for
/// struct-valued fields such as `company`
pub fn validation_fields(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();

    for (field, kind) in errors.errors() {
        let value = match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation error in field: {}", field))
                    })
                    .collect();
                json!({"errors": messages})
            }
            ValidationErrorsKind::Struct(inner) => validation_fields(inner),
            ValidationErrorsKind::List(items) => Value::Object(
                items
                    .iter()
                    .map(|(index, inner)| (index.to_string(), validation_fields(inner)))
                    .collect(),
            ),
        };
        fields.insert(field.to_string(), value);
    }

    Value::Object(fields)
}

/// Map a body deserialization failure to a client-facing message
fn describe_body_error(err: &str) -> String {
    if err.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload".to_string()
    } else if err.contains("missing field") || err.contains("invalid type") {
        // serde reports e.g. "missing field `title` at line 1 column 2"
        err.split(" at line").next().unwrap_or(err).to_string()
    } else if err.to_lowercase().contains("content type") {
        "Expected Content-Type: application/json".to_string()
    } else if err.contains("overflow") || err.contains("limit") {
        "Request body is too large".to_string()
    } else {
        "Invalid JSON format".to_string()
    }
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config(limit: usize) -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let error_response = match err {
                actix_web_validator::Error::Validate(validation_errors) => ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: validation_fields(&validation_errors),
                },
                other => ErrorResponse {
                    error: "Request validation failed".to_string(),
                    fields: json!({"message": describe_body_error(&other.to_string())}),
                },
            };

            tracing::warn!("Rejected request body: {}", error_response.fields);
            actix_web::error::InternalError::from_response(
                "",
                HttpResponse::BadRequest().json(error_response),
            )
            .into()
        })
}
