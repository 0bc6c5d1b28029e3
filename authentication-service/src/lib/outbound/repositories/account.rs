use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::RepositoryError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Profile;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, query: &str, value: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

const SELECT_BY_EMAIL: &str = r#"
    SELECT id, username, email, password_hash, role, created_at
    FROM accounts
    WHERE email = $1
"#;

const SELECT_BY_USERNAME: &str = r#"
    SELECT id, username, email, password_hash, role, created_at
    FROM accounts
    WHERE username = $1
"#;

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        self.find_one(SELECT_BY_EMAIL, email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        self.find_one(SELECT_BY_USERNAME, username).await
    }

    async fn create_with_profile(
        &self,
        account: Account,
        profile: Profile,
    ) -> Result<AccountId, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        insert_account(&mut tx, &account).await?;
        insert_profile(&mut tx, &profile).await?;

        // Dropping `tx` on an early return rolls both inserts back.
        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(account.id)
    }
}

async fn insert_account(conn: &mut PgConnection, account: &Account) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO accounts (id, username, email, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(account.id.0)
    .bind(&account.username)
    .bind(&account.email)
    .bind(&account.password_hash)
    .bind(account.role.as_str())
    .bind(account.created_at)
    .execute(conn)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                if db_err.constraint() == Some("accounts_username_key") {
                    return RepositoryError::UsernameAlreadyExists(account.username.clone());
                }
                if db_err.constraint() == Some("accounts_email_key") {
                    return RepositoryError::EmailAlreadyExists(account.email.clone());
                }
            }
        }
        RepositoryError::DatabaseError(e.to_string())
    })?;

    Ok(())
}

async fn insert_profile(conn: &mut PgConnection, profile: &Profile) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (
            id, account_id, first_name, last_name, phone, date_of_birth,
            address_line1, address_line2, city, province, postal_code, country, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(profile.id.0)
    .bind(profile.account_id.0)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.phone)
    .bind(profile.date_of_birth)
    .bind(&profile.address_line1)
    .bind(profile.address_line2.as_deref())
    .bind(&profile.city)
    .bind(&profile.province)
    .bind(&profile.postal_code)
    .bind(&profile.country)
    .bind(profile.created_at)
    .execute(conn)
    .await
    .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::models::Role;

    fn row(role: &str) -> AccountRow {
        AccountRow {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_into_account() {
        let row = row("admin");
        let id = row.id;

        let account = Account::try_from(row).expect("row should convert");
        assert_eq!(account.id, AccountId(id));
        assert_eq!(account.role, Role::Admin);
    }

    #[test]
    fn test_row_with_unknown_role_is_database_error() {
        let result = Account::try_from(row("superuser"));
        assert!(matches!(result, Err(RepositoryError::DatabaseError(_))));
    }
}
