//! Batch bookmark import.
//!
//! Entries missing a title or link are skipped, as are titles too long to
//! store and titles the caller already owns or that repeat an earlier title
//! in the same batch.
//! Skips are silent to the client and logged at debug level.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, info, warn};

use linkshelf_core::{title_fits, Bookmark, BookmarkRepository, CreateBookmarkRequest, Result};

/// One entry of a batch request body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

/// Why an entry was left out of the import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingField,
    TitleTooLong,
    DuplicateInBatch,
    AlreadyOwned,
    TitleTaken,
}

/// Turn raw entries into create requests for `user_id`, dropping entries
/// with a blank title or link, an overlong title, and repeats of an earlier
/// title in the batch.
pub fn plan_batch(user_id: i32, entries: Vec<BatchEntry>) -> Vec<CreateBookmarkRequest> {
    let mut seen = HashSet::new();
    let mut planned = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let (Some(title), Some(link)) = (entry.title, entry.link) else {
            debug!(index, reason = ?SkipReason::MissingField, "Skipping batch entry");
            continue;
        };
        if title.is_empty() || link.is_empty() {
            debug!(index, reason = ?SkipReason::MissingField, "Skipping batch entry");
            continue;
        }
        if !title_fits(&title) {
            debug!(index, reason = ?SkipReason::TitleTooLong, "Skipping batch entry");
            continue;
        }
        if !seen.insert(title.clone()) {
            debug!(index, reason = ?SkipReason::DuplicateInBatch, "Skipping batch entry");
            continue;
        }
        planned.push(CreateBookmarkRequest {
            user_id,
            title,
            link,
            category_ids: entry.category_ids,
        });
    }
    planned
}

/// Create every planned bookmark the caller does not already own.
///
/// Entries are processed in order, each with the non-atomic `create`. A title
/// already held by a different owner is skipped. Any other storage error,
/// including an unknown category id, aborts the remainder and is returned;
/// entries created before it stay stored.
pub async fn import_batch<R>(
    repo: &R,
    user_id: i32,
    entries: Vec<BatchEntry>,
) -> Result<Vec<Bookmark>>
where
    R: BookmarkRepository + ?Sized,
{
    let submitted = entries.len();
    let planned = plan_batch(user_id, entries);
    let mut created = Vec::with_capacity(planned.len());

    for req in planned {
        if repo
            .get_by_title_and_owner(&req.title, user_id)
            .await?
            .is_some()
        {
            debug!(title = %req.title, reason = ?SkipReason::AlreadyOwned, "Skipping batch entry");
            continue;
        }

        match repo.create(req).await {
            Ok(bookmark) => created.push(bookmark),
            Err(e) if e.is_unique_violation() => {
                warn!(
                    user_id,
                    reason = ?SkipReason::TitleTaken,
                    "Batch entry title belongs to another user, skipping"
                );
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        subsystem = "api",
        component = "batch_import",
        user_id,
        submitted,
        result_count = created.len(),
        "Batch import finished"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, link: &str) -> BatchEntry {
        BatchEntry {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            category_ids: vec![],
        }
    }

    #[test]
    fn test_blank_and_repeated_titles_are_dropped() {
        let planned = plan_batch(
            1,
            vec![entry("A", "x"), entry("", "y"), entry("A", "z")],
        );
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].title, "A");
        assert_eq!(planned[0].link, "x");
        assert_eq!(planned[0].user_id, 1);
    }

    #[test]
    fn test_missing_fields_are_dropped() {
        let planned = plan_batch(
            1,
            vec![
                BatchEntry {
                    title: Some("No link".into()),
                    ..Default::default()
                },
                BatchEntry {
                    link: Some("https://example.com".into()),
                    ..Default::default()
                },
                entry("Ok", ""),
                entry("Kept", "https://example.com/kept"),
            ],
        );
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].title, "Kept");
    }

    #[test]
    fn test_overlong_titles_are_dropped() {
        let planned = plan_batch(
            1,
            vec![
                entry("A", "x"),
                entry(&"x".repeat(linkshelf_core::MAX_TITLE_LEN + 1), "y"),
                entry(&"y".repeat(linkshelf_core::MAX_TITLE_LEN), "z"),
            ],
        );
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].title, "A");
        assert_eq!(planned[1].link, "z");
    }

    #[test]
    fn test_category_ids_carry_over() {
        let mut e = entry("Tagged", "https://example.com");
        e.category_ids = vec![1, 2];
        let planned = plan_batch(9, vec![e]);
        assert_eq!(planned[0].category_ids, vec![1, 2]);
    }

    #[test]
    fn test_entries_deserialize_without_optional_fields() {
        let entries: Vec<BatchEntry> =
            serde_json::from_str(r#"[{"title":"A","link":"x"},{"link":"y"}]"#).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].category_ids.is_empty());
        assert!(entries[1].title.is_none());
    }
}
