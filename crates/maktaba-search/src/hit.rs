//! Per-document search hit adapter.
//!
//! A [`SearchHit`] wraps one raw index [`Document`] together with its
//! highlight spans and exposes the same accessor surface for every content
//! type. It never reaches back into a datastore: everything it reports was
//! handed to it at construction.
//!
//! Accessors fall back instead of failing:
//!
//! - `title` reads `title`, then `name` (scholars and some series use `name`)
//! - `description` reads `description`, then `content_text`
//! - `label` is the series title for lessons, the title otherwise

use maktaba_core::{ContentType, Result};
use serde::{Serialize, Serializer};

use crate::document::{id_field, int_field, str_field, Document, Highlight};
use crate::routing::{RouteTable, DEFAULT_ROUTES};

/// One matched document, viewed through a uniform accessor surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    content_type: ContentType,
    document: Document,
    highlights: Vec<Highlight>,
    text_match: Option<u64>,
}

impl SearchHit {
    /// Wrap a document returned by the index.
    pub fn new(content_type: ContentType, document: Document, highlights: Vec<Highlight>) -> Self {
        Self {
            content_type,
            document,
            highlights,
            text_match: None,
        }
    }

    /// Attach the provider's relevance score.
    pub fn with_text_match(mut self, score: u64) -> Self {
        self.text_match = Some(score);
        self
    }

    /// The content type this hit was found under.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// The raw document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All highlight spans for this document.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Provider relevance score, when one was reported.
    pub fn text_match(&self) -> Option<u64> {
        self.text_match
    }

    /// Snippet of the first highlight for `field`.
    pub fn highlight(&self, field: &str) -> Option<&str> {
        self.highlights
            .iter()
            .find(|h| h.field == field)
            .map(|h| h.snippet.as_str())
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    /// Document id.
    pub fn id(&self) -> Option<String> {
        id_field(&self.document, "id")
    }

    /// URL slug.
    pub fn slug(&self) -> Option<&str> {
        str_field(&self.document, "slug")
    }

    /// Title, falling back to `name`.
    pub fn title(&self) -> Option<&str> {
        str_field(&self.document, "title").or_else(|| str_field(&self.document, "name"))
    }

    /// Description, falling back to `content_text`.
    pub fn description(&self) -> Option<&str> {
        str_field(&self.document, "description")
            .or_else(|| str_field(&self.document, "content_text"))
    }

    /// Highlighted title if the index marked one, else [`title`](Self::title).
    pub fn highlighted_title(&self) -> Option<&str> {
        self.highlight("title").or_else(|| self.title())
    }

    /// Highlighted description if the index marked one, else
    /// [`description`](Self::description).
    ///
    /// The highlight is taken from whichever field the description came
    /// from, so a `content_text` match shows up for types without a
    /// `description`.
    pub fn highlighted_description(&self) -> Option<&str> {
        let field = self.description_field()?;
        self.highlight(field)
            .or_else(|| str_field(&self.document, field))
    }

    fn description_field(&self) -> Option<&'static str> {
        ["description", "content_text"]
            .into_iter()
            .find(|f| str_field(&self.document, f).is_some())
    }

    // ------------------------------------------------------------------------
    // Scholar
    // ------------------------------------------------------------------------

    /// Owning scholar's display name.
    pub fn scholar_name(&self) -> Option<&str> {
        str_field(&self.document, "scholar_name")
    }

    /// Owning scholar's slug.
    pub fn scholar_slug(&self) -> Option<&str> {
        str_field(&self.document, "scholar_slug")
    }

    /// Owning scholar's id.
    pub fn scholar_id(&self) -> Option<i64> {
        int_field(&self.document, "scholar_id")
    }

    // ------------------------------------------------------------------------
    // Media
    // ------------------------------------------------------------------------

    /// Media type (`audio`, `video`, `pdf`, ...).
    pub fn media_type(&self) -> Option<&str> {
        str_field(&self.document, "media_type")
    }

    /// Duration in seconds.
    pub fn duration(&self) -> Option<i64> {
        int_field(&self.document, "duration")
    }

    /// Thumbnail image URL.
    pub fn thumbnail_url(&self) -> Option<&str> {
        str_field(&self.document, "thumbnail_url")
    }

    /// Audio file URL.
    pub fn audio_url(&self) -> Option<&str> {
        str_field(&self.document, "audio_url")
    }

    /// Video file URL.
    pub fn video_url(&self) -> Option<&str> {
        str_field(&self.document, "video_url")
    }

    // ------------------------------------------------------------------------
    // Series and reading
    // ------------------------------------------------------------------------

    /// Number of lessons (series only).
    pub fn lesson_count(&self) -> Option<i64> {
        int_field(&self.document, "lesson_count")
    }

    /// Title of the parent series (lessons only).
    pub fn series_title(&self) -> Option<&str> {
        str_field(&self.document, "series_title")
    }

    /// Slug of the parent series (lessons only).
    pub fn series_slug(&self) -> Option<&str> {
        str_field(&self.document, "series_slug")
    }

    /// Estimated reading time in minutes.
    pub fn read_time(&self) -> Option<i64> {
        int_field(&self.document, "read_time")
    }

    /// Publication time, unix seconds.
    pub fn published_at(&self) -> Option<i64> {
        int_field(&self.document, "published_at")
    }

    /// Position within the parent series.
    pub fn position(&self) -> Option<i64> {
        int_field(&self.document, "position")
    }

    // ------------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------------

    /// Public URL using the default route segments.
    ///
    /// Fails with `InvalidContentType` for content types that have no route.
    pub fn url(&self) -> Result<String> {
        self.url_with(&DEFAULT_ROUTES)
    }

    /// Public URL using configured route segments.
    pub fn url_with(&self, routes: &RouteTable) -> Result<String> {
        routes.url_for(self.content_type, self.scholar_slug(), self.slug())
    }

    /// Grouping label: lessons are shown under their series.
    pub fn label(&self) -> Option<&str> {
        match self.content_type {
            ContentType::Lesson => self.series_title(),
            _ => self.title(),
        }
    }
}

/// Flat JSON view of a hit, with derived fields resolved.
#[derive(Serialize)]
struct HitView<'a> {
    content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlighted_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlighted_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scholar_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scholar_slug: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lesson_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series_slug: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    read_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_match: Option<u64>,
}

impl Serialize for SearchHit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        HitView {
            content_type: self.content_type,
            id: self.id(),
            slug: self.slug(),
            title: self.title(),
            highlighted_title: self.highlighted_title(),
            description: self.description(),
            highlighted_description: self.highlighted_description(),
            url: self
                .url()
                .map_err(|e| log::error!("no url for {} hit: {e}", self.content_type))
                .ok(),
            label: self.label(),
            scholar_name: self.scholar_name(),
            scholar_slug: self.scholar_slug(),
            media_type: self.media_type(),
            duration: self.duration(),
            thumbnail_url: self.thumbnail_url(),
            audio_url: self.audio_url(),
            video_url: self.video_url(),
            lesson_count: self.lesson_count(),
            series_title: self.series_title(),
            series_slug: self.series_slug(),
            read_time: self.read_time(),
            text_match: self.text_match,
        }
        .serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================
