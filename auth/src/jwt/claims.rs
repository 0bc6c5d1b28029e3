use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// JWT claims carried by session tokens.
///
/// Registered RFC 7519 claims are typed fields; anything else (such as the
/// account role) lives in the flattened `extra` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (account identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    pub const ROLE: &'static str = "role";

    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated subject.
    ///
    /// # Arguments
    /// * `subject` - Account identifier
    /// * `role` - Role name (stored in `extra.role`)
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - Time until the token expires
    ///
    /// # Returns
    /// Claims with sub, role, iat and exp set
    pub fn for_subject(
        subject: impl ToString,
        role: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let expiration = issued_at + lifetime;

        Self::new()
            .with_subject(subject)
            .with_issued_at(issued_at.timestamp())
            .with_expiration(expiration.timestamp())
            .with_extra(Self::ROLE, role.to_string())
    }

    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Role from extra fields. `None` when absent or not a string.
    pub fn role(&self) -> Option<&str> {
        self.extra.get(Self::ROLE).and_then(|v| v.as_str())
    }

    /// Check if token is expired at the given Unix timestamp.
    ///
    /// A token is still valid during its expiry second and rejected after it.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}
