use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::account::errors::RepositoryError;
use crate::domain::account::errors::ServiceError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginOutcome;
use crate::domain::account::models::Profile;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::TokenIdentity;

/// Port for authentication operations exposed to inbound adapters.
///
/// Every failure is already classified into the closed [`ServiceError`]
/// taxonomy; adapters only serialize it.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new customer account and its profile.
    ///
    /// # Errors
    /// * `Conflict` - Email or username is already registered
    /// * `Validation` - One or more fields are invalid (all are reported)
    /// * `Internal` - Hashing or persistence failed
    async fn register(&self, command: RegisterCommand) -> Result<(), ServiceError>;

    /// Authenticate by username or email and issue a session token.
    ///
    /// # Errors
    /// * `NotFound` - No account matches the identifier
    /// * `Unauthorized` - Password does not match
    /// * `Internal` - Lookup or token signing failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, ServiceError>;

    /// Verify a session token and return the identity it carries.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is forged, malformed, expired or incomplete
    fn verify_token(&self, token: &str) -> Result<TokenIdentity, ServiceError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve account by email address.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;

    /// Retrieve account by username.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError>;

    /// Persist an account and its profile as one unit.
    ///
    /// Either both rows exist afterwards or neither does.
    ///
    /// # Returns
    /// Identifier of the created account
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_with_profile(
        &self,
        account: Account,
        profile: Profile,
    ) -> Result<AccountId, RepositoryError>;
}

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}
