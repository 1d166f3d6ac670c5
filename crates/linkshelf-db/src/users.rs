//! User repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};
use zeroize::Zeroizing;

use linkshelf_core::{Error, Result, Role, User, UserCredentials, UserRepository};
use linkshelf_crypto::Argon2Hasher;

const USER_COLUMNS: &str = "id, name, email, role, created_at";

fn parse_stored_role(raw: &str) -> Result<Role> {
    raw.parse::<Role>()
        .map_err(|e| Error::Internal(format!("Corrupt role in users table: {}", e)))
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let role: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: parse_stored_role(&role)?,
        created_at: row.get("created_at"),
    })
}

/// PostgreSQL implementation of UserRepository.
///
/// Passwords are hashed with Argon2 on the blocking thread pool so the
/// async workers never stall on key derivation.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
    hasher: Argon2Hasher,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_hasher(pool, Argon2Hasher::default())
    }

    pub fn with_hasher(pool: Pool<Postgres>, hasher: Argon2Hasher) -> Self {
        Self { pool, hasher }
    }

    /// The hasher used for new passwords, shared with login verification.
    pub fn hasher(&self) -> &Argon2Hasher {
        &self.hasher
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.to_string());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| Error::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(Error::from)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query(&format!(
            "SELECT {}, password FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|row| {
            Ok(UserCredentials {
                user: user_from_row(&row)?,
                password_hash: row.get("password"),
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = self.hash_password(password).await?;

        let row = sqlx::query(&format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let user = user_from_row(&row)?;
        info!(
            subsystem = "database",
            component = "users",
            op = "create",
            user_id = user.id,
            "User created"
        );
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY name, id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(user_from_row).collect()
    }

    async fn update_role(&self, id: i32, role: &str) -> Result<Option<User>> {
        let role: Role = role.parse().map_err(Error::InvalidInput)?;

        let row = sqlx::query(&format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "users",
            op = "update_role",
            user_id = id,
            role = %role,
            found = row.is_some(),
            "User role update"
        );
        row.as_ref().map(user_from_row).transpose()
    }
}
