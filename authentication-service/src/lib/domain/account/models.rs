use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use super::errors::AccountIdError;
use super::errors::RoleError;

/// Account aggregate entity.
///
/// Login identity. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Personal and shipping details, linked 1:1 to an [`Account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub account_id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed set of account roles. Self-registration always yields `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw registration input, exactly as received from the transport.
///
/// Nothing here is trusted until the validation engine has passed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

/// Which unique attribute a login looks the account up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Username(String),
    Email(String),
}

impl LoginIdentifier {
    /// Username wins when it is non-blank; otherwise the email is used.
    pub fn from_parts(email: String, username: String) -> Self {
        if username.trim().is_empty() {
            LoginIdentifier::Email(email)
        } else {
            LoginIdentifier::Username(username)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCommand {
    pub identifier: LoginIdentifier,
    pub password: String,
}

/// Successful login: a signed token plus the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub account_id: AccountId,
    pub username: String,
    pub role: Role,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub account_id: AccountId,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!("customer".parse::<Role>(), Ok(Role::Customer));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::Customer.to_string(), "customer");
        assert!(matches!("root".parse::<Role>(), Err(RoleError::Unknown(_))));
    }

    #[test]
    fn test_login_identifier_prefers_username() {
        assert_eq!(
            LoginIdentifier::from_parts("a@example.com".into(), "alice".into()),
            LoginIdentifier::Username("alice".into())
        );
        assert_eq!(
            LoginIdentifier::from_parts("a@example.com".into(), "  ".into()),
            LoginIdentifier::Email("a@example.com".into())
        );
    }

    #[test]
    fn test_account_id_from_string() {
        let id = AccountId::new();
        assert_eq!(AccountId::from_string(&id.to_string()), Ok(id));
        assert!(AccountId::from_string("not-a-uuid").is_err());
    }
}
