//! Punishment comparison data as returned by the timesheet API
//!
//! These types mirror the JSON payload field for field. A response that is
//! missing a required field is rejected at deserialization time, so anything
//! holding a `PunishmentComparison` can rely on its full shape.

use serde::Deserialize;
use serde_json::Value;

/// Punishment type that is always listed after every other category
pub const NO_CHECK_IN_AND_NO_CHECK_OUT: &str = "NoCheckInAndNoCheckOut";

/// One punishment category's measurements for the period
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishmentDetail {
    pub punishment_type: String,
    pub user_bar_percentage: f64,
    pub company_bar_percentage: f64,
}

impl PunishmentDetail {
    /// Whether the category carries anything worth showing
    #[must_use]
    pub fn is_significant(&self) -> bool {
        self.user_bar_percentage > 0.0 || self.company_bar_percentage > 0.0
    }

    #[must_use]
    pub fn is_no_check_in_and_no_check_out(&self) -> bool {
        self.punishment_type == NO_CHECK_IN_AND_NO_CHECK_OUT
    }
}

/// Aggregate percentages across every category
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TotalBarPercentage {
    pub user: f64,
    pub company: f64,
}

/// The full comparison for one user and month
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishmentComparison {
    pub month: u32,
    pub year: i32,
    pub total_bar_percentage: TotalBarPercentage,
    pub punishment_details: Vec<PunishmentDetail>,
}

/// Wrapper every API response comes in
///
/// `success` and `error` are kept loose: the API is not consistent about
/// their types, and a failure body must still surface as an API error.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Value,
}

impl ApiEnvelope {
    /// Whether `success` is truthy
    #[must_use]
    pub fn is_success(&self) -> bool {
        is_truthy(&self.success)
    }

    /// `error.message` when the error is an object carrying a string message
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.get("message").and_then(Value::as_str)
    }
}

/// JavaScript truthiness of a JSON value
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
