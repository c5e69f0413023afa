//! Wire types for the `/generate` endpoint.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request body sent to `POST /generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct GenerateRequest {
    #[schemars(description = "Database schema as an arbitrary JSON document")]
    pub db_schema: Value,
    #[schemars(description = "Natural-language question to translate into SQL")]
    pub question: String,
}

impl GenerateRequest {
    /// Builds a request from raw schema text and a question.
    ///
    /// The question is taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if `schema_text` is not a valid JSON document.
    pub fn from_text(schema_text: &str, question: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            db_schema: serde_json::from_str(schema_text)?,
            question: question.to_string(),
        })
    }
}

/// Response body returned by `POST /generate`
///
/// `success` selects which of `generated_sql` and `error` is meaningful.
/// Decoding is lenient: any JSON object is accepted, a missing or `null`
/// `success` reads as `false`. The text fields keep "absent" (`None`) apart
/// from an explicit `null` (`Some(None)`), since the two render differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct GenerateResponse {
    #[serde(default, deserialize_with = "null_as_false")]
    #[schemars(description = "Whether SQL was generated")]
    pub success: bool,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(description = "Generated SQL, present when success is true")]
    pub generated_sql: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(description = "Failure message, present when success is false")]
    pub error: Option<Option<String>>,
}

impl GenerateResponse {
    #[must_use]
    pub fn generated(sql: impl Into<String>) -> Self {
        Self {
            success: true,
            generated_sql: Some(Some(sql.into())),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            generated_sql: None,
            error: Some(Some(message.into())),
        }
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// Only runs when the key exists, so a missing key stays `None` via `default`
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
