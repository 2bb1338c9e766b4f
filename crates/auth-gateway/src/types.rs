//! Wire types for the identity and receipts endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The authenticated principal's public profile.
///
/// Produced only by gateway responses; replaced wholesale on any update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer credential issued by the server.
    pub access_token: String,
    pub user: Identity,
}

/// Partial profile update; omitted fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A stored receipt, as listed by the receipts endpoint.
///
/// The server serializes `upload_date` as a naive (offset-less) timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
    pub id: i64,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    pub upload_date: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_deserialization() {
        let identity: Identity =
            serde_json::from_str(r#"{"id": 1, "username": "ana", "email": "a@b.com"}"#).unwrap();
        assert_eq!(identity.id, 1);
        assert_eq!(identity.username, "ana");
        assert_eq!(identity.email, "a@b.com");
    }

    #[test]
    fn test_login_response_ignores_extra_fields() {
        let json = r#"{
            "access_token": "tok-C",
            "token_type": "bearer",
            "user": {"id": 2, "username": "bo", "email": "bo@b.com"}
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "tok-C");
        assert_eq!(response.user.username, "bo");
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            username: Some("ana".to_string()),
            email: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("username"));
        assert!(!json.contains("email"));
    }

    #[test]
    fn test_receipt_parses_naive_timestamp() {
        let json = r#"{
            "id": 7,
            "store_name": "Corner Market",
            "total_amount": 23.45,
            "upload_date": "2026-03-14T09:26:53"
        }"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.id, 7);
        assert_eq!(receipt.store_name.as_deref(), Some("Corner Market"));
    }

    #[test]
    fn test_receipt_optional_fields_default() {
        let json = r#"{"id": 8, "upload_date": "2026-03-14T09:26:53"}"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.store_name, None);
        assert_eq!(receipt.total_amount, None);
    }
}
