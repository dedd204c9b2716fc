//! Content-type URL routing table.
//!
//! | content type | template |
//! |---|---|
//! | book | `/{scholar_slug}/{books}/{slug}` |
//! | lecture | `/{scholar_slug}/{lectures}/{slug}` |
//! | lesson | `/{lessons}/{slug}` |
//! | series | `/{scholar_slug}/{series}/{slug}` |
//! | fatwa | `/{fatwas}/{slug}` |
//! | news | `/{news}/{slug}` |
//! | article | `/{scholar_slug}/{articles}/{slug}` |
//!
//! Lessons carry no scholar prefix because they are reached through their
//! series. Scholars have no row.

use std::sync::LazyLock;

use maktaba_core::{ContentType, Error, Result};
use serde::{Deserialize, Serialize};

/// Routes built from [`RouteTable::default`], shared by [`SearchHit::url`].
///
/// [`SearchHit::url`]: crate::hit::SearchHit::url
pub static DEFAULT_ROUTES: LazyLock<RouteTable> = LazyLock::new(RouteTable::default);

/// URL path segment per routable content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Segment for books.
    pub books: String,
    /// Segment for lectures.
    pub lectures: String,
    /// Segment for lessons.
    pub lessons: String,
    /// Segment for series.
    pub series: String,
    /// Segment for fatwas.
    pub fatwas: String,
    /// Segment for news.
    pub news: String,
    /// Segment for articles.
    pub articles: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            books: "books".to_string(),
            lectures: "lectures".to_string(),
            lessons: "lessons".to_string(),
            series: "series".to_string(),
            fatwas: "fatwas".to_string(),
            news: "news".to_string(),
            articles: "articles".to_string(),
        }
    }
}

impl RouteTable {
    /// Segment for a content type, and whether the URL is scholar-scoped.
    fn route(&self, content_type: ContentType) -> Result<(&str, bool)> {
        match content_type {
            ContentType::Book => Ok((&self.books, true)),
            ContentType::Lecture => Ok((&self.lectures, true)),
            ContentType::Lesson => Ok((&self.lessons, false)),
            ContentType::Series => Ok((&self.series, true)),
            ContentType::Fatwa => Ok((&self.fatwas, false)),
            ContentType::News => Ok((&self.news, false)),
            ContentType::Article => Ok((&self.articles, true)),
            ContentType::Scholar => Err(Error::invalid_content_type(content_type.as_str())),
        }
    }

    /// Path segment for a content type.
    pub fn segment(&self, content_type: ContentType) -> Result<&str> {
        self.route(content_type).map(|(segment, _)| segment)
    }

    /// Fill the content type's template.
    ///
    /// A missing item slug renders as an empty segment. A scholar-scoped
    /// template without a scholar slug drops the prefix, since `//books/x`
    /// would read as a host. Only an unroutable content type is an error.
    pub fn url_for(
        &self,
        content_type: ContentType,
        scholar_slug: Option<&str>,
        slug: Option<&str>,
    ) -> Result<String> {
        let (segment, scholar_scoped) = self.route(content_type)?;
        let slug = slug.unwrap_or_default();
        match scholar_slug.filter(|s| !s.is_empty()) {
            Some(scholar) if scholar_scoped => Ok(format!("/{scholar}/{segment}/{slug}")),
            None if scholar_scoped => {
                log::warn!("{content_type} `{slug}` has no scholar slug; url drops the prefix");
                Ok(format!("/{segment}/{slug}"))
            }
            _ => Ok(format!("/{segment}/{slug}")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
