//! Pure validation of bookmark input.
//!
//! Nothing here touches the store or the network. Every check reports all of
//! its violations instead of stopping at the first one, so a caller can show
//! the whole list at once.

use crate::error::{Result, SecondBrainError};
use crate::models::{Bookmark, BookmarkId, CollectionId};
use crate::tags::normalize_tags;

pub const MAX_TITLE_LENGTH: usize = 500;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_TAGS_COUNT: usize = 20;
pub const MIN_SEARCH_QUERY_LENGTH: usize = 2;
pub const MAX_URL_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title cannot exceed {0} characters")]
    TitleTooLong(usize),

    #[error("URL cannot be empty")]
    EmptyUrl,

    #[error("URL cannot exceed {0} characters")]
    UrlTooLong(usize),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Only HTTP and HTTPS URLs are supported: {0}")]
    UnsupportedScheme(String),

    #[error("Description cannot exceed {0} characters")]
    DescriptionTooLong(usize),

    #[error("Cannot have more than {0} tags")]
    TooManyTags(usize),

    #[error("Tag '{tag}' cannot exceed {max} characters")]
    TagTooLong { tag: String, max: usize },

    #[error("Invalid collection ID: {0}")]
    InvalidCollectionId(CollectionId),

    #[error("Invalid bookmark ID: {0}")]
    InvalidBookmarkId(BookmarkId),

    #[error("No bookmarks selected for operation")]
    EmptyBookmarkList,

    #[error("Search query must be at least {0} characters")]
    SearchQueryTooShort(usize),
}

/// Map a violation list to the library error, `Ok` when empty
pub fn ensure_valid(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SecondBrainError::Validation(errors))
    }
}

pub fn validate_for_creation(
    collection_id: CollectionId,
    title: &str,
    url: &str,
    description: Option<&str>,
    tags: &[String],
) -> Vec<ValidationError> {
    let mut errors = validate_collection_id(collection_id);
    errors.extend(validate_content(title, url, description, tags));
    errors
}

pub fn validate_for_update(bookmark: &Bookmark) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let id_ok = if bookmark.is_local_id {
        bookmark.id < 0
    } else {
        bookmark.id > 0
    };
    if !id_ok {
        errors.push(ValidationError::InvalidBookmarkId(bookmark.id));
    }

    // Orphaned bookmarks (collection deleted) stay editable.
    if let Some(collection_id) = bookmark.collection_id {
        errors.extend(validate_collection_id(collection_id));
    }

    errors.extend(validate_content(
        &bookmark.title,
        &bookmark.url,
        bookmark.description.as_deref(),
        &bookmark.tags,
    ));
    errors
}

/// Server ids are positive and local ids negative; zero is never assigned.
pub fn validate_bookmark_id(id: BookmarkId) -> Vec<ValidationError> {
    if id == 0 {
        vec![ValidationError::InvalidBookmarkId(id)]
    } else {
        Vec::new()
    }
}

pub fn validate_collection_id(id: CollectionId) -> Vec<ValidationError> {
    if id > 0 {
        Vec::new()
    } else {
        vec![ValidationError::InvalidCollectionId(id)]
    }
}

pub fn validate_bookmark_ids(ids: &[BookmarkId]) -> Vec<ValidationError> {
    if ids.is_empty() {
        return vec![ValidationError::EmptyBookmarkList];
    }
    ids.iter().flat_map(|&id| validate_bookmark_id(id)).collect()
}

/// Blank queries are allowed and mean "no search".
pub fn validate_search_query(query: &str) -> Vec<ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= MIN_SEARCH_QUERY_LENGTH {
        Vec::new()
    } else {
        vec![ValidationError::SearchQueryTooShort(MIN_SEARCH_QUERY_LENGTH)]
    }
}

fn validate_content(
    title: &str,
    url: &str,
    description: Option<&str>,
    tags: &[String],
) -> Vec<ValidationError> {
    let mut errors = validate_title(title);
    errors.extend(validate_url(url));
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.push(ValidationError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH));
        }
    }
    errors.extend(validate_tags(tags));
    errors
}

fn validate_title(title: &str) -> Vec<ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        vec![ValidationError::EmptyTitle]
    } else if trimmed.chars().count() > MAX_TITLE_LENGTH {
        vec![ValidationError::TitleTooLong(MAX_TITLE_LENGTH)]
    } else {
        Vec::new()
    }
}

fn validate_url(url: &str) -> Vec<ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return vec![ValidationError::EmptyUrl];
    }
    if trimmed.chars().count() > MAX_URL_LENGTH {
        return vec![ValidationError::UrlTooLong(MAX_URL_LENGTH)];
    }

    match reqwest::Url::parse(trimmed) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Vec::new(),
            other => vec![ValidationError::UnsupportedScheme(other.to_string())],
        },
        Err(_) => vec![ValidationError::InvalidUrl(trimmed.to_string())],
    }
}

fn validate_tags(tags: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if tags.len() > MAX_TAGS_COUNT {
        errors.push(ValidationError::TooManyTags(MAX_TAGS_COUNT));
    }
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.chars().count() > MAX_TAG_LENGTH {
            errors.push(ValidationError::TagTooLong {
                tag: trimmed.to_string(),
                max: MAX_TAG_LENGTH,
            });
        }
    }
    errors
}

/// Bookmark input after trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedInput {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

pub fn sanitize(title: &str, url: &str, description: Option<&str>, tags: &[String]) -> SanitizedInput {
    SanitizedInput {
        title: title.trim().to_string(),
        url: url.trim().to_string(),
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        tags: normalize_tags(tags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn valid_bookmark() -> Bookmark {
        let mut bookmark = Bookmark::draft(Some(1), "Rust", "https://rust-lang.org", 0)
            .with_description(Some("The Rust language"))
            .with_tags(["rust", "lang"]);
        bookmark.id = 7;
        bookmark.is_local_id = false;
        bookmark
    }

    #[test]
    fn test_valid_creation() {
        let errors = validate_for_creation(1, "Rust", "https://rust-lang.org", None, &tags(&["rust"]));
        assert!(errors.is_empty());
        assert!(ensure_valid(errors).is_ok());
    }

    #[rstest]
    #[case("", ValidationError::EmptyTitle)]
    #[case("   ", ValidationError::EmptyTitle)]
    fn test_blank_title(#[case] title: &str, #[case] expected: ValidationError) {
        let errors = validate_for_creation(1, title, "https://a.io", None, &[]);
        assert_eq!(errors, vec![expected]);
    }

    #[test]
    fn test_title_too_long() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);
        let errors = validate_for_creation(1, &title, "https://a.io", None, &[]);
        assert_eq!(errors, vec![ValidationError::TitleTooLong(MAX_TITLE_LENGTH)]);

        let title = "a".repeat(MAX_TITLE_LENGTH);
        assert!(validate_for_creation(1, &title, "https://a.io", None, &[]).is_empty());
    }

    #[rstest]
    #[case("", ValidationError::EmptyUrl)]
    #[case("not-a-valid-url", ValidationError::InvalidUrl("not-a-valid-url".to_string()))]
    #[case("ftp://files.example.com", ValidationError::UnsupportedScheme("ftp".to_string()))]
    #[case("javascript:alert(1)", ValidationError::UnsupportedScheme("javascript".to_string()))]
    fn test_bad_urls(#[case] url: &str, #[case] expected: ValidationError) {
        let errors = validate_for_creation(1, "t", url, None, &[]);
        assert_eq!(errors, vec![expected]);
    }

    #[rstest]
    #[case("http://example.com")]
    #[case("https://example.com")]
    #[case("  https://example.com/path?q=1  ")]
    fn test_good_urls(#[case] url: &str) {
        assert!(validate_for_creation(1, "t", url, None, &[]).is_empty());
    }

    #[test]
    fn test_url_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        let errors = validate_for_creation(1, "t", &url, None, &[]);
        assert_eq!(errors, vec![ValidationError::UrlTooLong(MAX_URL_LENGTH)]);
    }

    #[test]
    fn test_description_too_long() {
        let description = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let errors = validate_for_creation(1, "t", "https://a.io", Some(&description), &[]);
        assert_eq!(errors, vec![ValidationError::DescriptionTooLong(MAX_DESCRIPTION_LENGTH)]);
    }

    #[test]
    fn test_tag_limits() {
        let many: Vec<String> = (1..=21).map(|i| format!("tag{}", i)).collect();
        let errors = validate_for_creation(1, "t", "https://a.io", None, &many);
        assert_eq!(errors, vec![ValidationError::TooManyTags(MAX_TAGS_COUNT)]);

        let long = "x".repeat(MAX_TAG_LENGTH + 1);
        let errors = validate_for_creation(1, "t", "https://a.io", None, &[long.clone()]);
        assert_eq!(
            errors,
            vec![ValidationError::TagTooLong {
                tag: long,
                max: MAX_TAG_LENGTH
            }]
        );
    }

    #[test]
    fn test_collects_every_violation() {
        let errors = validate_for_creation(0, " ", "nope", None, &[]);
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidCollectionId(0),
                ValidationError::EmptyTitle,
                ValidationError::InvalidUrl("nope".to_string()),
            ]
        );
        let err = ensure_valid(errors).unwrap_err();
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn test_update_accepts_valid_record() {
        assert!(validate_for_update(&valid_bookmark()).is_empty());
    }

    #[test]
    fn test_update_accepts_local_record() {
        let mut bookmark = valid_bookmark();
        bookmark.id = -3;
        bookmark.is_local_id = true;
        assert!(validate_for_update(&bookmark).is_empty());
    }

    #[rstest]
    #[case(0, false)]
    #[case(-4, false)]
    #[case(0, true)]
    #[case(5, true)]
    fn test_update_rejects_mismatched_id(#[case] id: i64, #[case] is_local: bool) {
        let mut bookmark = valid_bookmark();
        bookmark.id = id;
        bookmark.is_local_id = is_local;
        assert_eq!(
            validate_for_update(&bookmark),
            vec![ValidationError::InvalidBookmarkId(id)]
        );
    }

    #[test]
    fn test_update_allows_orphaned_bookmark() {
        let mut bookmark = valid_bookmark();
        bookmark.collection_id = None;
        assert!(validate_for_update(&bookmark).is_empty());
    }

    #[test]
    fn test_bookmark_id_lists() {
        assert_eq!(validate_bookmark_ids(&[]), vec![ValidationError::EmptyBookmarkList]);
        assert!(validate_bookmark_ids(&[1, -2]).is_empty());
        assert_eq!(
            validate_bookmark_ids(&[1, 0]),
            vec![ValidationError::InvalidBookmarkId(0)]
        );
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("a", false)]
    #[case(" a ", false)]
    #[case("ab", true)]
    fn test_search_query(#[case] query: &str, #[case] ok: bool) {
        assert_eq!(validate_search_query(query).is_empty(), ok);
    }

    #[test]
    fn test_sanitize() {
        let input = sanitize(
            "  Title ",
            " https://a.io ",
            Some("   "),
            &tags(&[" rust ", "", "rust", "web"]),
        );
        assert_eq!(input.title, "Title");
        assert_eq!(input.url, "https://a.io");
        assert_eq!(input.description, None);
        assert_eq!(input.tags, vec!["rust", "web"]);
    }
}
