//! API response wrapper types.
//!
//! Provides a unified response format for all API endpoints. An envelope always has
//! one of two shapes:
//!
//! - success: `success = true`, `data` present, code defaults to 200
//! - failure: `success = false`, `data = null`, explicit code
//!
//! The transport status stays 200; the logical outcome lives in `statusCode`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default message for generic success responses.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully";
pub const CREATED_MESSAGE: &str = "Resource created successfully";
pub const UPDATED_MESSAGE: &str = "Resource updated successfully";
pub const DELETED_MESSAGE: &str = "Resource deleted successfully";
pub const BAD_REQUEST_MESSAGE: &str = "Bad request";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";
pub const FORBIDDEN_MESSAGE: &str = "Access forbidden";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation failed";

/// Standard API response wrapper.
///
/// Fields are private so that only the constructors below can build one. Deserializing
/// goes through the same shape check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "RawApiResponse<T>")]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    success: bool,

    /// Response data (present only on success).
    data: Option<T>,

    /// Human-readable outcome message.
    message: String,

    /// Logical status code of the operation.
    status_code: u16,
}

/// Wire form before the shape check.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawApiResponse<T> {
    success: bool,
    data: Option<T>,
    message: String,
    status_code: u16,
}

impl<T> TryFrom<RawApiResponse<T>> for ApiResponse<T> {
    type Error = String;

    fn try_from(raw: RawApiResponse<T>) -> Result<Self, Self::Error> {
        match (raw.success, raw.data.is_some()) {
            (true, false) => Err("success envelope without data".to_string()),
            (false, true) => Err("failure envelope carrying data".to_string()),
            _ => Ok(Self {
                success: raw.success,
                data: raw.data,
                message: raw.message,
                status_code: raw.status_code,
            }),
        }
    }
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with an explicit message and code.
    pub fn success(data: T, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            status_code,
        }
    }

    /// Creates a successful response with the default message and code 200.
    pub fn ok(data: T) -> Self {
        Self::success(data, DEFAULT_SUCCESS_MESSAGE, 200)
    }

    /// Creates a successful response for a created resource (201).
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::success(data, message, 201)
    }

    /// Creates a successful response for an updated resource.
    pub fn updated(data: T, message: impl Into<String>) -> Self {
        Self::success(data, message, 200)
    }

    /// Creates a successful response with an arbitrary status code.
    pub fn with_status_code(data: T, status_code: u16, message: impl Into<String>) -> Self {
        Self::success(data, message, status_code)
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            status_code,
        }
    }

    /// Creates an error response with an arbitrary status code.
    pub fn error_with_status_code(message: impl Into<String>, status_code: u16) -> Self {
        Self::error(message, status_code)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::error(message, 500)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(message, 400)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::error(message, 401)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::error(message, 403)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(message, 404)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::error(message, 422)
    }

    /// Succeeds with `data` when `condition` holds, otherwise a 400 failure.
    pub fn if_condition(
        condition: bool,
        data: T,
        success_message: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        if condition {
            Self::success(data, success_message, 200)
        } else {
            Self::bad_request(failure_message)
        }
    }

    /// Succeeds with the value when present; absence is a 404 failure.
    pub fn if_present(
        data: Option<T>,
        success_message: impl Into<String>,
        not_found_message: impl Into<String>,
    ) -> Self {
        match data {
            Some(data) => Self::success(data, success_message, 200),
            None => Self::not_found(not_found_message),
        }
    }

    /// Whether the envelope has the success shape.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Payload, only ever present on success envelopes.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Always succeeds: an empty collection is reported with `empty_message`, never as
    /// not-found.
    pub fn if_non_empty(
        items: Vec<T>,
        success_message: impl Into<String>,
        empty_message: impl Into<String>,
    ) -> Self {
        if items.is_empty() {
            Self::success(Vec::new(), empty_message, 200)
        } else {
            Self::success(items, success_message, 200)
        }
    }
}

impl ApiResponse<bool> {
    /// Success envelope carrying `true`.
    pub fn deleted(message: impl Into<String>) -> Self {
        Self::success(true, message, 200)
    }

    /// Success envelope carrying the operation's outcome as data.
    pub fn from_result(
        outcome: bool,
        success_message: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Self {
        if outcome {
            bool_true(success_message)
        } else {
            bool_false(failure_message)
        }
    }
}

// Type-specific shorthands.

pub fn bool_true(message: impl Into<String>) -> ApiResponse<bool> {
    ApiResponse::success(true, message, 200)
}

pub fn bool_false(message: impl Into<String>) -> ApiResponse<bool> {
    ApiResponse::success(false, message, 200)
}

pub fn empty_string(message: impl Into<String>) -> ApiResponse<String> {
    ApiResponse::success(String::new(), message, 200)
}

pub fn empty_list<T>(message: impl Into<String>) -> ApiResponse<Vec<T>> {
    ApiResponse::success(Vec::new(), message, 200)
}

pub fn zero(message: impl Into<String>) -> ApiResponse<i64> {
    ApiResponse::success(0, message, 200)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let resp = ApiResponse::success(vec![1, 2], "done", 200);
        assert!(resp.is_success());
        assert_eq!(resp.data(), Some(&vec![1, 2]));
        assert_eq!(resp.message(), "done");
        assert_eq!(resp.status_code(), 200);

        let ok = ApiResponse::ok("x");
        assert_eq!(ok.message(), DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(ok.status_code(), 200);
    }

    #[test]
    fn test_failure_constructors_never_carry_data() {
        let cases: Vec<(ApiResponse<u32>, u16)> = vec![
            (ApiResponse::error("boom", 503), 503),
            (ApiResponse::internal_error(INTERNAL_ERROR_MESSAGE), 500),
            (ApiResponse::bad_request(BAD_REQUEST_MESSAGE), 400),
            (ApiResponse::unauthorized(UNAUTHORIZED_MESSAGE), 401),
            (ApiResponse::forbidden(FORBIDDEN_MESSAGE), 403),
            (ApiResponse::not_found(NOT_FOUND_MESSAGE), 404),
            (ApiResponse::validation_error(VALIDATION_ERROR_MESSAGE), 422),
        ];
        for (resp, code) in cases {
            assert!(!resp.is_success());
            assert!(resp.data().is_none());
            assert_eq!(resp.status_code(), code);
        }
    }

    #[test]
    fn test_created_updated_deleted() {
        assert_eq!(ApiResponse::created(1, CREATED_MESSAGE).status_code(), 201);
        assert_eq!(ApiResponse::updated(1, UPDATED_MESSAGE).status_code(), 200);
        let deleted = ApiResponse::deleted(DELETED_MESSAGE);
        assert!(deleted.is_success());
        assert_eq!(deleted.data(), Some(&true));
    }

    #[test]
    fn test_if_non_empty_treats_empty_as_success() {
        let resp = ApiResponse::<Vec<u8>>::if_non_empty(vec![], "e", "f");
        assert!(resp.is_success());
        assert_eq!(resp.message(), "f");
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.data(), Some(&Vec::new()));

        let full = ApiResponse::if_non_empty(vec![3], "e", "f");
        assert_eq!(full.message(), "e");
    }

    #[test]
    fn test_if_present_treats_absence_as_not_found() {
        let missing = ApiResponse::<String>::if_present(None, "found", "missing");
        assert!(!missing.is_success());
        assert_eq!(missing.status_code(), 404);
        assert_eq!(missing.message(), "missing");

        let found = ApiResponse::if_present(Some("v".to_string()), "found", "missing");
        assert!(found.is_success());
        assert_eq!(found.message(), "found");
    }

    #[test]
    fn test_if_condition_failure_is_bad_request() {
        let resp = ApiResponse::if_condition(false, 5, "yes", "no");
        assert!(!resp.is_success());
        assert_eq!(resp.status_code(), 400);
        assert_eq!(resp.message(), "no");
        assert!(ApiResponse::if_condition(true, 5, "yes", "no").is_success());
    }

    #[test]
    fn test_from_result_is_always_success_shape() {
        let failed = ApiResponse::from_result(false, "ok", "failed");
        assert!(failed.is_success());
        assert_eq!(failed.data(), Some(&false));
        assert_eq!(failed.message(), "failed");
    }

    #[test]
    fn test_type_shorthands() {
        assert_eq!(zero("none").data(), Some(&0));
        assert_eq!(empty_string("none").data(), Some(&String::new()));
        assert!(empty_list::<u8>("none").data().unwrap().is_empty());
        assert_eq!(bool_true("t").data(), Some(&true));
    }

    #[test]
    fn test_wire_format_and_round_trip() {
        let resp = ApiResponse::success(vec!["a".to_string()], "Operation Succesfull", 200);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "data": ["a"],
                "message": "Operation Succesfull",
                "statusCode": 200
            })
        );
        let back: ApiResponse<Vec<String>> = serde_json::from_value(json).unwrap();
        assert_eq!(back, resp);

        let failure = ApiResponse::<Vec<String>>::internal_error("timeout");
        let text = serde_json::to_string(&failure).unwrap();
        assert!(text.contains("\"data\":null"));
        let back: ApiResponse<Vec<String>> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, failure);
    }

    #[test]
    fn test_partial_envelopes_are_rejected_on_read() {
        let failure_with_data = r#"{"success":false,"data":[1,2],"message":"x","statusCode":500}"#;
        let err = serde_json::from_str::<ApiResponse<Vec<u8>>>(failure_with_data).unwrap_err();
        assert!(err.to_string().contains("failure envelope carrying data"));

        let success_without_data = r#"{"success":true,"data":null,"message":"x","statusCode":200}"#;
        assert!(serde_json::from_str::<ApiResponse<Vec<u8>>>(success_without_data).is_err());

        let missing_data = r#"{"success":false,"message":"x","statusCode":404}"#;
        let resp: ApiResponse<Vec<u8>> = serde_json::from_str(missing_data).unwrap();
        assert_eq!(resp, ApiResponse::not_found("x"));
    }
}
