//! Domain models for users, bookmarks, and categories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// USERS
// =============================================================================

/// Access role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// All accepted role values, in storage form.
    pub const ALL: [Role; 2] = [Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!(
                "Invalid role '{}'. Must be \"admin\" or \"user\".",
                other
            )),
        }
    }
}

/// Public-safe view of a user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A user row together with its stored password hash.
///
/// Only used for credential verification; intentionally not `Serialize`.
#[derive(Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// BOOKMARKS & CATEGORIES
// =============================================================================

/// A bookmark row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
}

/// A bookmark annotated with the names of its linked categories.
///
/// `categories` is empty, never absent, when nothing is linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkWithCategories {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Longest bookmark title the `bookmark.title` column accepts, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// True when `title` fits the stored column width.
pub fn title_fits(title: &str) -> bool {
    title.chars().count() <= MAX_TITLE_LEN
}

/// Request for creating a new bookmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookmarkRequest {
    pub user_id: i32,
    pub title: String,
    pub link: String,
    /// Categories to link; duplicates collapse to a single link.
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

impl CreateBookmarkRequest {
    /// Category ids with duplicates removed, first occurrence order kept.
    pub fn unique_category_ids(&self) -> Vec<i32> {
        let mut seen = Vec::with_capacity(self.category_ids.len());
        for id in &self.category_ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }
}

/// Partial bookmark update. Unset fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBookmarkRequest {
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub link: Option<String>,
}

impl UpdateBookmarkRequest {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.title.is_none() && self.link.is_none()
    }
}

/// Search criteria for bookmarks. Every provided criterion must match.
///
/// `title` and `link` are case-insensitive substring matches, `user_id` is
/// exact. Empty strings count as not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFilter {
    pub title: Option<String>,
    pub link: Option<String>,
    pub user_id: Option<i32>,
}

impl BookmarkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Title criterion, if one was actually provided.
    pub fn title_term(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Link criterion, if one was actually provided.
    pub fn link_term(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }

    /// True when no criterion applies (search degenerates to list-all).
    pub fn is_empty(&self) -> bool {
        self.title_term().is_none() && self.link_term().is_none() && self.user_id.is_none()
    }
}
