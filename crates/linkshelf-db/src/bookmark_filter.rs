//! Bookmark search filter query builder.
//!
//! Turns a [`BookmarkFilter`] into a parameterized SQL WHERE fragment. Each
//! provided criterion becomes one clause; clauses are joined with AND.

use linkshelf_core::BookmarkFilter;

use crate::escape_like;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    /// Integer parameter.
    Int(i32),
    /// String parameter.
    String(String),
}

/// Generates SQL WHERE clause fragments for bookmark search.
///
/// The fragment references the bookmark table through the alias `b`.
///
/// # Example
///
/// ```rust,ignore
/// use linkshelf_core::BookmarkFilter;
/// use linkshelf_db::bookmark_filter::{BookmarkFilterQueryBuilder, QueryParam};
///
/// let filter = BookmarkFilter::new().title("rec").user_id(1);
/// let (sql, params) = BookmarkFilterQueryBuilder::new(filter, 0).build();
/// // sql: "b.title ILIKE $1 ESCAPE '\' AND b.user_id = $2"
/// // params: [QueryParam::String("%rec%"), QueryParam::Int(1)]
/// ```
pub struct BookmarkFilterQueryBuilder {
    filter: BookmarkFilter,
    param_offset: usize,
}

impl BookmarkFilterQueryBuilder {
    /// Create a new builder for the given filter.
    ///
    /// * `param_offset` - number of parameters already bound in the query
    pub fn new(filter: BookmarkFilter, param_offset: usize) -> Self {
        Self {
            filter,
            param_offset,
        }
    }

    /// Build the WHERE clause fragment and its parameters, in bind order.
    ///
    /// An empty filter yields `("TRUE", [])`.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        if let Some(title) = self.filter.title_term() {
            param_idx += 1;
            clauses.push(format!("b.title ILIKE ${} ESCAPE '\\'", param_idx));
            params.push(QueryParam::String(contains_pattern(title)));
        }

        if let Some(link) = self.filter.link_term() {
            param_idx += 1;
            clauses.push(format!("b.link ILIKE ${} ESCAPE '\\'", param_idx));
            params.push(QueryParam::String(contains_pattern(link)));
        }

        if let Some(user_id) = self.filter.user_id {
            param_idx += 1;
            clauses.push(format!("b.user_id = ${}", param_idx));
            params.push(QueryParam::Int(user_id));
        }

        if clauses.is_empty() {
            return ("TRUE".to_string(), params);
        }

        (clauses.join(" AND "), params)
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
