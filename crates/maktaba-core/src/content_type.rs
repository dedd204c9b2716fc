//! The fixed set of content kinds served by search.
//!
//! Every per-type behavior (collection key, default sort, searchable
//! fields, facet fields) lives in a static table here rather than in
//! per-type impls, so adding a kind means adding table rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A publishable content kind, plus `Scholar` as a facet-only entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// A book, authored by a scholar.
    Book,
    /// A standalone recorded lecture.
    Lecture,
    /// A lesson inside a series.
    Lesson,
    /// A series of lessons.
    Series,
    /// A fatwa (religious ruling).
    Fatwa,
    /// A news item.
    News,
    /// A written article.
    Article,
    /// A scholar profile. Facet-only; has no public item URL.
    Scholar,
}

impl ContentType {
    /// Every content type, in display order.
    pub const ALL: [ContentType; 8] = [
        ContentType::Book,
        ContentType::Lecture,
        ContentType::Lesson,
        ContentType::Series,
        ContentType::Fatwa,
        ContentType::News,
        ContentType::Article,
        ContentType::Scholar,
    ];

    /// The seven publishable kinds. Default search set when none is given.
    pub const PUBLISHABLE: [ContentType; 7] = [
        ContentType::Book,
        ContentType::Lecture,
        ContentType::Lesson,
        ContentType::Series,
        ContentType::Fatwa,
        ContentType::News,
        ContentType::Article,
    ];

    /// Singular key, e.g. `"book"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Book => "book",
            ContentType::Lecture => "lecture",
            ContentType::Lesson => "lesson",
            ContentType::Series => "series",
            ContentType::Fatwa => "fatwa",
            ContentType::News => "news",
            ContentType::Article => "article",
            ContentType::Scholar => "scholar",
        }
    }

    /// Plural key, used for collection names and query-string values.
    pub fn plural(&self) -> &'static str {
        match self {
            ContentType::Book => "books",
            ContentType::Lecture => "lectures",
            ContentType::Lesson => "lessons",
            ContentType::Series => "series",
            ContentType::Fatwa => "fatwas",
            ContentType::News => "news",
            ContentType::Article => "articles",
            ContentType::Scholar => "scholars",
        }
    }

    /// Default sort expression used when browsing (no relevance available).
    pub fn default_sort(&self) -> &'static str {
        match self {
            ContentType::Lesson => "position:asc",
            ContentType::Scholar => "name:asc",
            ContentType::Book
            | ContentType::Lecture
            | ContentType::Series
            | ContentType::Fatwa
            | ContentType::News
            | ContentType::Article => "published_at:desc",
        }
    }

    /// Fields the provider matches the query text against, by weight order.
    pub fn query_fields(&self) -> &'static [&'static str] {
        match self {
            ContentType::Book | ContentType::Lecture | ContentType::Series => {
                &["title", "description", "scholar_name"]
            }
            ContentType::Lesson => &["title", "content_text", "series_title"],
            ContentType::Fatwa | ContentType::Article => &["title", "content_text", "scholar_name"],
            ContentType::News => &["title", "content_text"],
            ContentType::Scholar => &["name", "description"],
        }
    }

    /// Facet fields this content type's collection declares.
    pub fn facet_fields(&self) -> &'static [&'static str] {
        match self {
            ContentType::Book
            | ContentType::Lecture
            | ContentType::Lesson
            | ContentType::Series
            | ContentType::Fatwa
            | ContentType::Article => &["scholar_slug", "media_type", "topic_slugs"],
            ContentType::News => &["topic_slugs"],
            ContentType::Scholar => &[],
        }
    }

    /// Whether this kind is one of the seven publishable kinds.
    pub fn is_publishable(&self) -> bool {
        !matches!(self, ContentType::Scholar)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ContentType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ContentType {
    type Err = Error;

    /// Parses singular or plural keys, trimmed and case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == key || ct.plural() == key)
            .ok_or_else(|| Error::invalid_content_type(s))
    }
}

// ============================================================================
// Tests
// ============================================================================
