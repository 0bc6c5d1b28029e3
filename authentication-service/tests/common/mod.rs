use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use authentication_service::domain::account::errors::RepositoryError;
use authentication_service::domain::account::models::Account;
use authentication_service::domain::account::models::AccountId;
use authentication_service::domain::account::models::Profile;
use authentication_service::domain::account::ports::AccountRepository;
use authentication_service::domain::account::ports::Clock;
use authentication_service::domain::account::service::AuthService;
use authentication_service::inbound::grpc::AuthGrpcService;
use authentication_service::proto::RegisterRequest;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use tokio::sync::RwLock;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "Abcdefg1!";

pub type TestService = AuthService<InMemoryAccountRepository, TestClock>;

/// Account store keeping accounts and profiles side by side.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<AccountId, Profile>,
}

impl InMemoryAccountRepository {
    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    pub async fn profile_for(&self, id: &AccountId) -> Option<Profile> {
        self.state.read().await.profiles.get(id).cloned()
    }

    pub async fn find_by_id(&self, id: &AccountId) -> Option<Account> {
        self.state.read().await.accounts.get(id).cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create_with_profile(
        &self,
        account: Account,
        profile: Profile,
    ) -> Result<AccountId, RepositoryError> {
        let mut state = self.state.write().await;

        if state.accounts.values().any(|a| a.username == account.username) {
            return Err(RepositoryError::UsernameAlreadyExists(account.username));
        }
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(RepositoryError::EmailAlreadyExists(account.email));
        }

        let id = account.id;
        state.accounts.insert(id, account);
        state.profiles.insert(id, profile);

        Ok(id)
    }
}

/// Clock the tests can move forward.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Test application wiring the gRPC adapter to in-memory collaborators
pub struct TestApp {
    pub grpc: AuthGrpcService<TestService>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub clock: Arc<TestClock>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let repository = Arc::new(InMemoryAccountRepository::default());
        let clock = Arc::new(TestClock::starting_at(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ));
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            authenticator,
            Arc::clone(&clock),
        ));

        Self {
            grpc: AuthGrpcService::new(service),
            repository,
            clock,
        }
    }
}

/// A registration request that passes every check.
pub fn register_request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        first_name: "Alice".to_string(),
        last_name: "Smith".to_string(),
        phone: "+1 (416) 555-0199".to_string(),
        date_of_birth: "1990-04-12".to_string(),
        address_line1: "100 Queen St W".to_string(),
        address_line2: None,
        city: "Toronto".to_string(),
        province: "ON".to_string(),
        postal_code: "M5H 2N2".to_string(),
        country: "Canada".to_string(),
    }
}

/// Throwaway Postgres database with migrations applied.
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

impl TestDb {
    /// Create a uniquely named database on the server at `DATABASE_URL`.
    ///
    /// Returns `None` when `DATABASE_URL` is unset so the suite still runs
    /// on machines without Postgres.
    pub async fn from_env() -> Option<Self> {
        let server_url = std::env::var("DATABASE_URL").ok()?;
        let db_name = format!(
            "test_authentication_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }

    pub async fn count_accounts(&self, username: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count accounts")
    }

    pub async fn count_profiles(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count profiles")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
