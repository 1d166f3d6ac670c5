//! Category repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use linkshelf_core::{Category, CategoryRepository, Error, Result};

/// Maximum category name length, matching the column width.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Validate a category name.
pub fn validate_category_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(format!(
            "Category name must be {} characters or less",
            MAX_CATEGORY_NAME_LEN
        ));
    }
    Ok(())
}

/// PostgreSQL implementation of CategoryRepository.
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM category ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM category WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|row| Category {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn create(&self, name: &str) -> Result<Category> {
        validate_category_name(name).map_err(Error::InvalidInput)?;

        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO category (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Category {
            id: row.get("id"),
            name: row.get("name"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("Food").is_ok());
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name(&"x".repeat(MAX_CATEGORY_NAME_LEN)).is_ok());
        assert!(validate_category_name(&"x".repeat(MAX_CATEGORY_NAME_LEN + 1)).is_err());
    }
}
