use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Error body returned by the auth and REST backends.
///
/// The backends are not consistent about the field carrying the message, so
/// every known variant is optional and [`ErrorResponse::message`] picks the
/// most specific one.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub msg: Option<String>,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AuthUser {
        pub id: Uuid,
        pub email: String,
    }

    /// Response of the password grant.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub access_token: String,
        pub user: AuthUser,
    }

    /// Response of the signup endpoint.
    ///
    /// `access_token` is only present when the backend confirms accounts
    /// automatically; otherwise the account waits for email confirmation.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SignUpResponse {
        pub access_token: Option<String>,
        pub user: Option<AuthUser>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Incoming,
        Outgoing,
    }

    /// Store-assigned identifier.
    ///
    /// Opaque to the client. Backends may hand out integers or strings, both
    /// are accepted and kept in their textual form.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    #[serde(transparent)]
    pub struct TransactionId(String);

    impl TransactionId {
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for TransactionId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for TransactionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    impl<'de> Deserialize<'de> for TransactionId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            #[derive(Deserialize)]
            #[serde(untagged)]
            enum Raw {
                Text(String),
                Number(i64),
            }

            Ok(match Raw::deserialize(deserializer)? {
                Raw::Text(text) => Self(text),
                Raw::Number(number) => Self(number.to_string()),
            })
        }
    }

    /// A row of the `transactions` table as the store returns it.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionRecord {
        pub id: TransactionId,
        pub description: String,
        pub amount: i64,
        pub kind: TransactionKind,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<FixedOffset>,
        pub owner_id: Uuid,
    }

    /// Create request for the `transactions` table. The store assigns `id`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionInsert {
        pub description: String,
        pub amount: i64,
        pub kind: TransactionKind,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<FixedOffset>,
        pub owner_id: Uuid,
    }
}

#[cfg(test)]
mod tests {
    use super::transaction::*;
    use super::*;

    #[test]
    fn record_accepts_numeric_and_text_ids() {
        let numeric: TransactionRecord = serde_json::from_str(
            r#"{"id":42,"description":"Gaji","amount":50000,"kind":"incoming",
                "occurredAt":"2024-05-01T00:00:00+07:00",
                "ownerId":"6f1c1f0e-3f53-4f43-9d7a-2f0e2c1b0a11"}"#,
        )
        .unwrap();
        assert_eq!(numeric.id.as_str(), "42");
        assert_eq!(numeric.kind, TransactionKind::Incoming);

        let text: TransactionRecord = serde_json::from_str(
            r#"{"id":"a1","description":"Kopi","amount":20000,"kind":"outgoing",
                "occurredAt":"2024-05-15T10:00:00Z",
                "ownerId":"6f1c1f0e-3f53-4f43-9d7a-2f0e2c1b0a11"}"#,
        )
        .unwrap();
        assert_eq!(text.id, TransactionId::from("a1"));
    }

    #[test]
    fn record_rejects_unknown_kind() {
        let res = serde_json::from_str::<TransactionRecord>(
            r#"{"id":1,"description":"x","amount":1,"kind":"refund",
                "occurredAt":"2024-05-15T10:00:00Z",
                "ownerId":"6f1c1f0e-3f53-4f43-9d7a-2f0e2c1b0a11"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn error_message_prefers_description() {
        let body = ErrorResponse {
            error: Some("invalid_grant".to_string()),
            error_description: Some("Invalid login credentials".to_string()),
            ..Default::default()
        };
        assert_eq!(body.message().as_deref(), Some("Invalid login credentials"));
        assert_eq!(ErrorResponse::default().message(), None);
    }
}
