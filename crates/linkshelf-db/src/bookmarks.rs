//! Bookmark repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use linkshelf_core::{
    Bookmark, BookmarkFilter, BookmarkRepository, BookmarkWithCategories, CreateBookmarkRequest,
    Error, Result, UpdateBookmarkRequest,
};

use crate::bookmark_filter::{BookmarkFilterQueryBuilder, QueryParam};

/// Bookmark columns plus the aggregated category names.
///
/// Callers append an optional WHERE clause, then [`GROUP_ORDER`].
const SELECT_WITH_CATEGORIES: &str = r#"
    SELECT
        b.id, b.user_id, b.title, b.link, b.created_at,
        COALESCE(
            array_agg(c.name::text ORDER BY c.name) FILTER (WHERE c.name IS NOT NULL),
            '{}'::text[]
        ) AS categories
    FROM bookmark b
    LEFT JOIN bookmark_category bc ON bc.bookmark_id = b.id
    LEFT JOIN category c ON c.id = bc.category_id
"#;

const GROUP_ORDER: &str = "GROUP BY b.id ORDER BY b.created_at DESC, b.id DESC";

const RETURNING_BOOKMARK: &str = "RETURNING id, user_id, title, link, created_at";

const LINK_CATEGORY: &str = "INSERT INTO bookmark_category (bookmark_id, category_id) VALUES ($1, $2) ON CONFLICT (bookmark_id, category_id) DO NOTHING";

fn bookmark_from_row(row: &PgRow) -> Bookmark {
    Bookmark {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        link: row.get("link"),
        created_at: row.get("created_at"),
    }
}

fn bookmark_with_categories_from_row(row: &PgRow) -> BookmarkWithCategories {
    BookmarkWithCategories {
        bookmark: bookmark_from_row(row),
        categories: row.get("categories"),
    }
}

fn with_where(clause: &str) -> String {
    format!("{} WHERE {} {}", SELECT_WITH_CATEGORIES, clause, GROUP_ORDER)
}

/// PostgreSQL implementation of BookmarkRepository.
pub struct PgBookmarkRepository {
    pool: Pool<Postgres>,
}

impl PgBookmarkRepository {
    /// Create a new PgBookmarkRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        title: &str,
        user_id: Option<i32>,
    ) -> Result<Option<BookmarkWithCategories>> {
        let sql = with_where(clause);
        let mut query = sqlx::query(&sql).bind(title);
        if let Some(user_id) = user_id {
            query = query.bind(user_id);
        }
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.as_ref().map(bookmark_with_categories_from_row))
    }
}

#[async_trait]
impl BookmarkRepository for PgBookmarkRepository {
    async fn list_all(&self) -> Result<Vec<BookmarkWithCategories>> {
        let sql = format!("{} {}", SELECT_WITH_CATEGORIES, GROUP_ORDER);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(bookmark_with_categories_from_row).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<BookmarkWithCategories>> {
        let sql = with_where("b.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.as_ref().map(bookmark_with_categories_from_row))
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<BookmarkWithCategories>> {
        self.fetch_one_where("b.title = $1", title, None).await
    }

    async fn get_by_title_and_owner(
        &self,
        title: &str,
        user_id: i32,
    ) -> Result<Option<BookmarkWithCategories>> {
        self.fetch_one_where("b.title = $1 AND b.user_id = $2", title, Some(user_id))
            .await
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<BookmarkWithCategories>> {
        let sql = with_where("b.user_id = $1");
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(bookmark_with_categories_from_row).collect())
    }

    async fn list_by_owner_and_category(
        &self,
        user_id: i32,
        category: &str,
    ) -> Result<Vec<BookmarkWithCategories>> {
        // Filtering through EXISTS keeps every category name in the aggregate,
        // not only the one being filtered on.
        let sql = with_where(
            r#"b.user_id = $1 AND EXISTS (
                SELECT 1 FROM bookmark_category fbc
                JOIN category fc ON fc.id = fbc.category_id
                WHERE fbc.bookmark_id = b.id AND fc.name = $2
            )"#,
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(bookmark_with_categories_from_row).collect())
    }

    async fn create(&self, req: CreateBookmarkRequest) -> Result<Bookmark> {
        let category_ids = req.unique_category_ids();

        let row = sqlx::query(&format!(
            "INSERT INTO bookmark (user_id, title, link) VALUES ($1, $2, $3) {}",
            RETURNING_BOOKMARK
        ))
        .bind(req.user_id)
        .bind(&req.title)
        .bind(&req.link)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        let bookmark = bookmark_from_row(&row);

        // Rows written before a failing link stay committed.
        for category_id in category_ids {
            sqlx::query(LINK_CATEGORY)
                .bind(bookmark.id)
                .bind(category_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;
        }

        Ok(bookmark)
    }

    async fn create_atomic(&self, req: CreateBookmarkRequest) -> Result<Bookmark> {
        let category_ids = req.unique_category_ids();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(&format!(
            "INSERT INTO bookmark (user_id, title, link) VALUES ($1, $2, $3) {}",
            RETURNING_BOOKMARK
        ))
        .bind(req.user_id)
        .bind(&req.title)
        .bind(&req.link)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;
        let bookmark = bookmark_from_row(&row);

        for category_id in category_ids {
            sqlx::query(LINK_CATEGORY)
                .bind(bookmark.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(bookmark)
    }

    async fn update(&self, id: i32, req: UpdateBookmarkRequest) -> Result<Option<Bookmark>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookmark SET
                user_id = COALESCE($2, user_id),
                title = COALESCE($3, title),
                link = COALESCE($4, link)
            WHERE id = $1
            {}
            "#,
            RETURNING_BOOKMARK
        ))
        .bind(id)
        .bind(req.user_id)
        .bind(req.title)
        .bind(req.link)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.as_ref().map(bookmark_from_row))
    }

    async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM bookmark WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn link_category(&self, bookmark_id: i32, category_id: i32) -> Result<()> {
        sqlx::query(LINK_CATEGORY)
            .bind(bookmark_id)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn unlink_category(&self, bookmark_id: i32, category_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM bookmark_category WHERE bookmark_id = $1 AND category_id = $2")
            .bind(bookmark_id)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn search(&self, filter: BookmarkFilter) -> Result<Vec<BookmarkWithCategories>> {
        let start = Instant::now();
        let (clause, params) = BookmarkFilterQueryBuilder::new(filter, 0).build();
        let sql = with_where(&clause);

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                QueryParam::Int(v) => query.bind(v),
                QueryParam::String(v) => query.bind(v),
            };
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "bookmarks",
            op = "search",
            result_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Bookmark search complete"
        );
        Ok(rows.iter().map(bookmark_with_categories_from_row).collect())
    }
}
