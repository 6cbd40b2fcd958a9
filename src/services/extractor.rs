// src/services/extractor.rs

//! Video record extraction from search result pages.
//!
//! Extraction is a chain of independent strategies tried in order; the first
//! one that parses and yields at least one valid record wins:
//!
//! 1. [`InitialDataStrategy`] reads the embedded `ytInitialData` JSON object.
//! 2. [`MarkupStrategy`] scans rendered markup for video containers.
//!
//! Failures never escape [`Extractor::extract`]; a page nobody can read simply
//! yields no records.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::VideoRecord;
use crate::utils::{normalize_whitespace, resolve_url};

/// A single way of turning a raw page into video records.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract at most `max_count` valid records.
    ///
    /// An `Err` means the page is not in the shape this strategy understands.
    fn extract(&self, body: &str, max_count: usize) -> Result<Vec<VideoRecord>>;
}

/// Ordered, first-success-wins chain of extraction strategies.
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Structured-data parse with markup fallback, linking to `origin`.
    pub fn for_platform(origin: &str) -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(InitialDataStrategy::new(origin)?),
            Box::new(MarkupStrategy::new(origin)?),
        ]))
    }

    /// Extract up to `max_count` valid records from a page.
    pub fn extract(&self, body: &str, max_count: usize) -> Vec<VideoRecord> {
        if max_count == 0 {
            return Vec::new();
        }

        for strategy in &self.strategies {
            match strategy.extract(body, max_count) {
                Ok(records) => {
                    let records = retain_valid(records, max_count);
                    if !records.is_empty() {
                        log::debug!("{}: extracted {} records", strategy.name(), records.len());
                        return records;
                    }
                    log::debug!("{}: no records, trying next strategy", strategy.name());
                }
                Err(e) => log::debug!("{}: {}", strategy.name(), e),
            }
        }
        Vec::new()
    }
}

fn retain_valid(records: Vec<VideoRecord>, max_count: usize) -> Vec<VideoRecord> {
    records
        .into_iter()
        .filter(VideoRecord::is_valid)
        .take(max_count)
        .collect()
}

fn watch_url(origin: &Url, video_id: &str) -> String {
    let mut url = resolve_url(origin, "/watch");
    url.push_str("?v=");
    url.push_str(video_id);
    url
}

// --- Structured data ---

/// Reads the `ytInitialData` object embedded in the page's scripts.
pub struct InitialDataStrategy {
    origin: Url,
    marker: Regex,
}

impl InitialDataStrategy {
    pub fn new(origin: &str) -> Result<Self> {
        let marker = Regex::new(
            r#"(?:var\s+ytInitialData|window\[\s*["']ytInitialData["']\s*\])\s*=\s*"#,
        )
        .map_err(|e| AppError::config(format!("Invalid initial data pattern: {e}")))?;
        Ok(Self {
            origin: Url::parse(origin)?,
            marker,
        })
    }

    /// Deserialize exactly one JSON object following the assignment marker.
    fn locate(&self, body: &str) -> Result<InitialData> {
        let found = self
            .marker
            .find(body)
            .ok_or_else(|| AppError::parse("ytInitialData not found"))?;
        let rest = &body[found.end()..];
        if !rest.starts_with('{') {
            return Err(AppError::parse("ytInitialData is not an object"));
        }

        serde_json::Deserializer::from_str(rest)
            .into_iter::<InitialData>()
            .next()
            .ok_or_else(|| AppError::parse("ytInitialData is empty"))?
            .map_err(AppError::from)
    }

    fn to_record(&self, node: &Value) -> Option<VideoRecord> {
        let renderer = match VideoRenderer::deserialize(node) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::debug!("Skipping malformed videoRenderer: {}", e);
                return None;
            }
        };

        let video_id = renderer.video_id.text();
        let url = if video_id.is_empty() {
            String::new()
        } else {
            watch_url(&self.origin, &video_id)
        };

        Some(VideoRecord {
            title: renderer.title.text().trim().to_string(),
            url,
            channel: renderer.owner_text.text(),
            views: renderer.view_count_text.text(),
            upload_time: renderer.published_time_text.text(),
            duration: renderer.length_text.text(),
            thumbnail: renderer.thumbnail.largest_url(),
            description: renderer.description_snippet.text(),
        })
    }
}

impl ExtractionStrategy for InitialDataStrategy {
    fn name(&self) -> &'static str {
        "initial-data"
    }

    fn extract(&self, body: &str, max_count: usize) -> Result<Vec<VideoRecord>> {
        let data = self.locate(body)?;
        let sections = data
            .contents
            .two_column_search_results_renderer
            .primary_contents
            .section_list_renderer
            .contents;
        if sections.is_empty() {
            return Err(AppError::parse("search results container missing"));
        }

        let nodes = sections
            .iter()
            .filter_map(Lenient::valid)
            .filter_map(|section| section.item_section_renderer.as_ref())
            .filter_map(Lenient::valid)
            .flat_map(|items| items.contents.iter())
            .filter_map(|item| item.get("videoRenderer"));

        let mut records = Vec::new();
        for node in nodes {
            if records.len() >= max_count {
                break;
            }
            if let Some(record) = self.to_record(node).filter(VideoRecord::is_valid) {
                records.push(record);
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InitialData {
    contents: Contents,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Contents {
    two_column_search_results_renderer: TwoColumnResults,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TwoColumnResults {
    primary_contents: PrimaryContents,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PrimaryContents {
    section_list_renderer: SectionList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SectionList {
    contents: Vec<Lenient<Section>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Section {
    item_section_renderer: Option<Lenient<ItemSection>>,
}

/// Items stay untyped so one odd item cannot spoil its siblings.
/// Odd sections are skipped the same way through [`Lenient`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemSection {
    contents: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VideoRenderer {
    title: TextField,
    video_id: TextField,
    owner_text: TextField,
    view_count_text: TextField,
    published_time_text: TextField,
    length_text: TextField,
    thumbnail: Lenient<Thumbnail>,
    description_snippet: TextField,
}

/// Inline text as the platform encodes it.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum TextField {
    Runs {
        runs: Vec<Run>,
    },
    Simple {
        #[serde(rename = "simpleText")]
        simple_text: String,
    },
    Plain(String),
    #[default]
    Missing,
    #[allow(dead_code)]
    Other(IgnoredAny),
}

impl TextField {
    fn text(&self) -> String {
        match self {
            TextField::Runs { runs } => runs.iter().map(|run| run.text.as_str()).collect(),
            TextField::Simple { simple_text } => simple_text.clone(),
            TextField::Plain(text) => text.clone(),
            TextField::Missing | TextField::Other(_) => String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Run {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    thumbnails: Vec<ThumbnailImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThumbnailImage {
    url: String,
}

/// Accepts the expected shape or anything else, which reads as absent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    #[allow(dead_code)]
    Invalid(IgnoredAny),
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient::Invalid(IgnoredAny)
    }
}

impl<T> Lenient<T> {
    fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Invalid(_) => None,
        }
    }
}

impl Lenient<Thumbnail> {
    /// Thumbnails are listed smallest first.
    fn largest_url(&self) -> String {
        match self {
            Lenient::Valid(thumbnail) => thumbnail
                .thumbnails
                .last()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
            Lenient::Invalid(_) => String::new(),
        }
    }
}

// --- Markup fallback ---

/// Scans rendered markup for video containers.
pub struct MarkupStrategy {
    origin: Url,
    container: Selector,
    title_link: Selector,
    heading: Selector,
    link: Selector,
    channel: Selector,
}

impl MarkupStrategy {
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            origin: Url::parse(origin)?,
            container: parse_selector(
                "ytd-video-renderer, ytd-compact-video-renderer, \
                 div[class*=\"ytd-video-renderer\"], div[class*=\"ytd-compact-video-renderer\"]",
            )?,
            title_link: parse_selector("a#video-title")?,
            heading: parse_selector("h3")?,
            link: parse_selector("a[href]")?,
            channel: parse_selector("a[class*=\"channel-name\"], ytd-channel-name a")?,
        })
    }

    fn to_record(&self, element: ElementRef<'_>) -> VideoRecord {
        let (title, href) = match element.select(&self.title_link).next() {
            Some(link) => {
                let mut title = element_text(link);
                if title.is_empty() {
                    title = link.value().attr("title").unwrap_or("").trim().to_string();
                }
                (title, link.value().attr("href").map(str::to_string))
            }
            None => match element.select(&self.heading).next() {
                Some(heading) => {
                    let href = heading.value().attr("href").map(str::to_string).or_else(|| {
                        heading
                            .select(&self.link)
                            .next()
                            .and_then(|a| a.value().attr("href"))
                            .map(str::to_string)
                    });
                    (element_text(heading), href)
                }
                None => (String::new(), None),
            },
        };

        let url = href
            .filter(|h| !h.trim().is_empty())
            .map(|h| resolve_url(&self.origin, h.trim()))
            .unwrap_or_default();

        let channel = element
            .select(&self.channel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        VideoRecord {
            title,
            url,
            channel,
            ..VideoRecord::default()
        }
    }
}

impl ExtractionStrategy for MarkupStrategy {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn extract(&self, body: &str, max_count: usize) -> Result<Vec<VideoRecord>> {
        let document = Html::parse_document(body);

        // Inner nodes of a renderer often carry the renderer's class too.
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for element in document.select(&self.container) {
            if records.len() >= max_count {
                break;
            }
            let record = self.to_record(element);
            if record.is_valid() && seen.insert(record.url.clone()) {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
