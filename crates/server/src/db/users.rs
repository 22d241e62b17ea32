//! User repository for database operations.
//!
//! `PostgreSQL` implementation of [`UserStore`]. Queries are checked at
//! runtime so the crate builds without a live database.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use user_directory_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::{NewUser, Profile, ProfileUpdate, User};
use crate::store::{RoleTransition, UserStore};

const USER_COLUMNS: &str = r"
    id, email, user_name, role, active_status, hashed_password,
    password_updated_at, created_at, gender, phone, name, address, note
";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `directory.user` queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    user_name: String,
    role: UserRole,
    active_status: bool,
    hashed_password: String,
    password_updated_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    gender: Option<String>,
    phone: Option<String>,
    name: Option<String>,
    address: Option<String>,
    note: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            user_name: row.user_name,
            role: row.role,
            active_status: row.active_status,
            hashed_password: SecretString::from(row.hashed_password),
            password_updated_at: row.password_updated_at,
            created_at: row.created_at,
            profile: Profile {
                gender: row.gender,
                phone: row.phone,
                name: row.name,
                address: row.address,
                note: row.note,
            },
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for account database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for UserRepository {
    async fn ready(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    /// Insert a new account with the default `customer` role.
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO directory.user (email, user_name, hashed_password)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(user.email.as_str())
            .bind(&user.user_name)
            .bind(user.hashed_password.expose_secret())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM directory.user WHERE id = $1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM directory.user WHERE email = $1");

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// `NULL` parameters keep the current column value, so only supplied
    /// fields change. An empty string is written as an empty string.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE directory.user
            SET user_name = COALESCE($2, user_name),
                phone     = COALESCE($3, phone),
                address   = COALESCE($4, address),
                note      = COALESCE($5, note)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(update.user_name.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.address.as_deref())
        .bind(update.note.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// The `role = 'customer'` guard makes concurrent elevations of the same
    /// account resolve to exactly one `Elevated`.
    async fn register_supplier(&self, id: UserId) -> Result<RoleTransition, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE directory.user
            SET role = 'supplier'
            WHERE id = $1 AND role = 'customer'
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(RoleTransition::Elevated);
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM directory.user WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(if exists.is_some() {
            RoleTransition::AlreadyElevated
        } else {
            RoleTransition::Missing
        })
    }
}
