//! Schema provisioning and default data seeding.
//!
//! [`ensure_schema`] is idempotent and runs on every start. [`seed_defaults`]
//! fills each table only while it is empty and never aborts startup: a failed
//! step is logged and the remaining steps still run.

use sqlx::{PgPool, Row};
use tracing::{error, info, warn};

use linkshelf_core::{BookmarkRepository, CreateBookmarkRequest, Result, UserRepository};

use crate::Database;

/// DDL statements, in dependency order.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookmark (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title VARCHAR(255) NOT NULL UNIQUE,
        link TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS category (
        id SERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookmark_category (
        bookmark_id INTEGER NOT NULL REFERENCES bookmark(id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
        PRIMARY KEY (bookmark_id, category_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookmark_user_id ON bookmark (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookmark_category_category_id ON bookmark_category (category_id)",
];

/// Default accounts: (name, email, plaintext password, is_admin).
pub const DEFAULT_USERS: &[(&str, &str, &str, bool)] = &[
    ("Student", "student@example.com", "password", false),
    ("Admin", "admin@example.com", "password", true),
];

pub const DEFAULT_CATEGORIES: &[&str] = &["Food", "Travel", "Tech", "Entertainment", "Lifestyle"];

/// Default bookmarks: (owner email, title, link).
pub const DEFAULT_BOOKMARKS: &[(&str, &str, &str)] = &[
    (
        "student@example.com",
        "Delicious Recipes",
        "https://example.com/food-blog",
    ),
    (
        "student@example.com",
        "World Travel Guide",
        "https://example.com/travel-blog",
    ),
    (
        "admin@example.com",
        "Latest Tech Trends",
        "https://example.com/tech-news",
    ),
];

/// Default links: (bookmark title, category name).
pub const DEFAULT_BOOKMARK_CATEGORIES: &[(&str, &str)] = &[
    ("Delicious Recipes", "Food"),
    ("Delicious Recipes", "Lifestyle"),
    ("World Travel Guide", "Travel"),
    ("Latest Tech Trends", "Tech"),
];

/// Create all tables and indexes that don't exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(
        subsystem = "database",
        component = "schema",
        op = "ensure",
        statements = SCHEMA_STATEMENTS.len(),
        "Schema ensured"
    );
    Ok(())
}

/// Which seeding steps ran and which failed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub categories: usize,
    pub bookmarks: usize,
    pub links: usize,
    pub failed_steps: Vec<&'static str>,
}

impl SeedReport {
    pub fn is_clean(&self) -> bool {
        self.failed_steps.is_empty()
    }
}

/// Seed default rows into empty tables. Best-effort; never returns an error.
pub async fn seed_defaults(db: &Database) -> SeedReport {
    let mut report = SeedReport::default();

    match seed_users(db).await {
        Ok(n) => report.users = n,
        Err(e) => {
            error!(subsystem = "database", component = "schema", op = "seed", step = "users", error = %e, "Seeding failed");
            report.failed_steps.push("users");
        }
    }
    match seed_categories(db.pool()).await {
        Ok(n) => report.categories = n,
        Err(e) => {
            error!(subsystem = "database", component = "schema", op = "seed", step = "categories", error = %e, "Seeding failed");
            report.failed_steps.push("categories");
        }
    }
    match seed_bookmarks(db).await {
        Ok(n) => report.bookmarks = n,
        Err(e) => {
            error!(subsystem = "database", component = "schema", op = "seed", step = "bookmarks", error = %e, "Seeding failed");
            report.failed_steps.push("bookmarks");
        }
    }
    match seed_bookmark_categories(db.pool()).await {
        Ok(n) => report.links = n,
        Err(e) => {
            error!(subsystem = "database", component = "schema", op = "seed", step = "bookmark_categories", error = %e, "Seeding failed");
            report.failed_steps.push("bookmark_categories");
        }
    }

    info!(
        subsystem = "database",
        component = "schema",
        op = "seed",
        users = report.users,
        categories = report.categories,
        bookmarks = report.bookmarks,
        links = report.links,
        success = report.is_clean(),
        "Default data seeding finished"
    );
    report
}

async fn table_is_empty(pool: &PgPool, table: &str) -> Result<bool> {
    // Table names come from the constants in this module only.
    let row = sqlx::query(&format!("SELECT COUNT(*) AS count FROM {}", table))
        .fetch_one(pool)
        .await?;
    let count: i64 = row.get("count");
    Ok(count == 0)
}

async fn seed_users(db: &Database) -> Result<usize> {
    if !table_is_empty(db.pool(), "users").await? {
        return Ok(0);
    }

    let mut created = 0;
    for (name, email, password, is_admin) in DEFAULT_USERS {
        let user = db.users.create(name, email, password).await?;
        if *is_admin {
            db.users.update_role(user.id, "admin").await?;
        }
        created += 1;
    }
    Ok(created)
}

async fn seed_categories(pool: &PgPool) -> Result<usize> {
    if !table_is_empty(pool, "category").await? {
        return Ok(0);
    }

    let mut created = 0;
    for name in DEFAULT_CATEGORIES {
        let result =
            sqlx::query("INSERT INTO category (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(pool)
                .await?;
        created += result.rows_affected() as usize;
    }
    Ok(created)
}

async fn seed_bookmarks(db: &Database) -> Result<usize> {
    if !table_is_empty(db.pool(), "bookmark").await? {
        return Ok(0);
    }

    let mut created = 0;
    for (email, title, link) in DEFAULT_BOOKMARKS {
        let Some(owner) = db.users.find_by_email(email).await? else {
            warn!(
                subsystem = "database",
                component = "schema",
                op = "seed",
                email = %email,
                "Default bookmark owner missing, skipping"
            );
            continue;
        };
        db.bookmarks
            .create(CreateBookmarkRequest {
                user_id: owner.user.id,
                title: title.to_string(),
                link: link.to_string(),
                category_ids: Vec::new(),
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

async fn seed_bookmark_categories(pool: &PgPool) -> Result<usize> {
    if !table_is_empty(pool, "bookmark_category").await? {
        return Ok(0);
    }

    let mut created = 0;
    for (title, category) in DEFAULT_BOOKMARK_CATEGORIES {
        let result = sqlx::query(
            r#"
            INSERT INTO bookmark_category (bookmark_id, category_id)
            SELECT b.id, c.id FROM bookmark b, category c
            WHERE b.title = $1 AND c.name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(title)
        .bind(category)
        .execute(pool)
        .await?;
        created += result.rows_affected() as usize;
    }
    Ok(created)
}
