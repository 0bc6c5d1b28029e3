use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use chrono::Duration;

use crate::domain::account::errors::ServiceError;
use crate::domain::account::errors::ValidationErrors;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginIdentifier;
use crate::domain::account::models::LoginOutcome;
use crate::domain::account::models::Profile;
use crate::domain::account::models::ProfileId;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Role;
use crate::domain::account::models::TokenIdentity;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AuthServicePort;
use crate::domain::account::ports::Clock;
use crate::domain::account::validation::fields;
use crate::domain::account::validation::parse_date_of_birth;
use crate::domain::account::validation::validate_registration;

/// Fixed lifetime of issued session tokens.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Domain service implementation for authentication operations.
///
/// Holds no mutable state; concurrent calls only share the repository.
pub struct AuthService<AR, C>
where
    AR: AccountRepository,
    C: Clock,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
    clock: Arc<C>,
}

impl<AR, C> AuthService<AR, C>
where
    AR: AccountRepository,
    C: Clock,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Hasher and token signer, keyed by the service secret
    /// * `clock` - Source of the current instant for validation and tokens
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>, clock: Arc<C>) -> Self {
        Self {
            repository,
            authenticator,
            clock,
        }
    }

    async fn find_account(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<Account>, ServiceError> {
        let account = match identifier {
            LoginIdentifier::Username(username) => {
                self.repository.find_by_username(username).await?
            }
            LoginIdentifier::Email(email) => self.repository.find_by_email(email).await?,
        };
        Ok(account)
    }
}

#[async_trait]
impl<AR, C> AuthServicePort for AuthService<AR, C>
where
    AR: AccountRepository,
    C: Clock,
{
    async fn register(&self, command: RegisterCommand) -> Result<(), ServiceError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::debug!("Registration rejected: email already registered");
            return Err(ServiceError::user_already_exists());
        }

        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            tracing::debug!(username = %command.username, "Registration rejected: username taken");
            return Err(ServiceError::user_already_exists());
        }

        let now = self.clock.now();

        let errors = validate_registration(&command, now);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                ServiceError::Internal
            })?;

        let date_of_birth = parse_date_of_birth(&command.date_of_birth).ok_or_else(|| {
            ServiceError::Validation(ValidationErrors::single(
                fields::DATE_OF_BIRTH,
                "Invalid date of birth format",
            ))
        })?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: Role::Customer,
            created_at: now,
        };

        let profile = Profile {
            id: ProfileId::new(),
            account_id: account.id,
            first_name: command.first_name,
            last_name: command.last_name,
            phone: command.phone,
            date_of_birth,
            address_line1: command.address_line1,
            address_line2: command
                .address_line2
                .filter(|line| !line.trim().is_empty()),
            city: command.city,
            province: command.province,
            postal_code: command.postal_code,
            country: command.country,
            created_at: now,
        };

        let account_id = self
            .repository
            .create_with_profile(account, profile)
            .await?;

        tracing::info!(account_id = %account_id, "Account registered");

        Ok(())
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, ServiceError> {
        let account = self
            .find_account(&command.identifier)
            .await?
            .ok_or_else(ServiceError::user_not_found)?;

        let claims = Claims::for_subject(
            account.id,
            account.role,
            self.clock.now(),
            Duration::hours(TOKEN_LIFETIME_HOURS),
        );

        let result = self
            .authenticator
            .authenticate(&command.password, &account.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(account_id = %account.id, "Login rejected: incorrect password");
                    ServiceError::incorrect_password()
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(error = %err, "Token generation failed");
                    ServiceError::Internal
                }
            })?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            role = %account.role,
            "User logged in"
        );

        Ok(LoginOutcome {
            token: result.access_token,
            account_id: account.id,
            username: account.username,
            role: account.role,
        })
    }

    fn verify_token(&self, token: &str) -> Result<TokenIdentity, ServiceError> {
        let claims = self
            .authenticator
            .validate_token_at(token, self.clock.now())
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                ServiceError::invalid_token()
            })?;

        identity_from_claims(&claims).ok_or_else(|| {
            tracing::debug!("Token rejected: subject or role claim unusable");
            ServiceError::invalid_token()
        })
    }
}

fn identity_from_claims(claims: &Claims) -> Option<TokenIdentity> {
    let account_id = AccountId::from_string(claims.sub.as_deref()?).ok()?;
    let role = claims.role()?.parse::<Role>().ok()?;
    Some(TokenIdentity { account_id, role })
}
