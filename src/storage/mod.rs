//! Export formats for scrape results.
//!
//! A run is written twice, side by side:
//!
//! ```text
//! {dir}/
//! ├── {prefix}_YYYYmmdd_HHMMSS.csv   # one row per video
//! └── {prefix}_YYYYmmdd_HHMMSS.json  # metadata + per-category blocks
//! ```
//!
//! Rendering is pure; [`ResultExporter`] owns the filesystem side.

pub mod local;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::{AppError, Result};
use crate::models::{CategoryKey, Language, SearchResults, VideoRecord};

pub use local::ResultExporter;

/// Content type label attached to every exported row and category.
pub const CONTENT_TYPE: &str = "Emergency/Distress";

/// CSV column order.
pub const CSV_COLUMNS: [&str; 12] = [
    "search_term",
    "language",
    "hazard_type",
    "content_type",
    "title",
    "url",
    "channel",
    "views",
    "upload_time",
    "duration",
    "thumbnail",
    "description",
];

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub total_videos: usize,
    pub categories: usize,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    search_term: &'a str,
    language: &'a str,
    hazard_type: &'a str,
    content_type: &'a str,
    title: &'a str,
    url: &'a str,
    channel: &'a str,
    views: &'a str,
    upload_time: &'a str,
    duration: &'a str,
    thumbnail: &'a str,
    description: &'a str,
}

/// Render results as CSV, header row included even when empty.
pub fn render_csv(results: &SearchResults) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;

    for (key, videos) in results.iter() {
        let (language, hazard_type) = CategoryKey::describe(&key);
        for video in videos {
            writer.serialize(CsvRow {
                search_term: &key,
                language: &language,
                hazard_type: &hazard_type,
                content_type: CONTENT_TYPE,
                title: &video.title,
                url: &video.url,
                channel: &video.channel,
                views: &video.views,
                upload_time: &video.upload_time,
                duration: &video.duration,
                thumbnail: &video.thumbnail,
                description: &video.description,
            })?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// Top-level JSON export document.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub metadata: ExportMetadata,
    pub results: ExportCategories<'a>,
}

/// Run-level metadata block.
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    pub scrape_date: String,
    pub focus: &'static str,
    pub content_type: &'static str,
    pub excluded: &'static str,
    pub languages: Vec<&'static str>,
    pub total_emergency_videos: usize,
    pub search_categories: usize,
    pub time_filter: &'static str,
}

/// One category block in the JSON export.
#[derive(Debug, Serialize)]
pub struct CategoryExport<'a> {
    pub language: String,
    pub hazard_type: String,
    pub content_type: &'static str,
    pub video_count: usize,
    pub videos: &'a [VideoRecord],
}

/// Category blocks keyed by category key, in run order.
#[derive(Debug)]
pub struct ExportCategories<'a>(pub Vec<(String, CategoryExport<'a>)>);

impl Serialize for ExportCategories<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, block) in &self.0 {
            map.serialize_entry(key, block)?;
        }
        map.end()
    }
}

impl<'a> ExportDocument<'a> {
    pub fn new(results: &'a SearchResults, scraped_at: NaiveDateTime) -> Self {
        let categories = results
            .iter()
            .map(|(key, videos)| {
                let (language, hazard_type) = CategoryKey::describe(&key);
                let block = CategoryExport {
                    language,
                    hazard_type,
                    content_type: CONTENT_TYPE,
                    video_count: videos.len(),
                    videos,
                };
                (key, block)
            })
            .collect();

        Self {
            metadata: ExportMetadata {
                scrape_date: scraped_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
                focus: "Emergency/Distress videos from Indian coastal regions",
                content_type: "Live streams, emergency calls, rescue videos",
                excluded: "News channels, educational content, tourism videos",
                languages: Language::ALL.iter().map(Language::display_name).collect(),
                total_emergency_videos: results.total_videos(),
                search_categories: results.category_count(),
                time_filter: "Recent uploads and live content prioritized",
            },
            results: ExportCategories(categories),
        }
    }
}

/// Render the JSON export, pretty-printed with non-ASCII text kept as is.
pub fn render_json(results: &SearchResults, scraped_at: NaiveDateTime) -> Result<Vec<u8>> {
    let document = ExportDocument::new(results, scraped_at);
    Ok(serde_json::to_vec_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HazardTerm, SearchCategory};
    use chrono::NaiveDate;
    use serde_json::Value;

    fn results() -> SearchResults {
        let mut results = SearchResults::default();
        results.push(SearchCategory {
            key: CategoryKey::new(Language::English, &HazardTerm::new("storm surge", "तूफान")),
            videos: vec![VideoRecord {
                channel: "local".into(),
                description: "water, rising \"fast\"".into(),
                ..VideoRecord::new("Storm surge Puri", "https://www.youtube.com/watch?v=s1")
            }],
        });
        results.push(SearchCategory {
            key: CategoryKey::new(Language::Hindi, &HazardTerm::new("tsunami", "सुनामी")),
            videos: vec![VideoRecord::new(
                "सुनामी भारत मदद",
                "https://www.youtube.com/watch?v=h1",
            )],
        });
        results
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn csv_rows_carry_decoded_key() {
        let bytes = render_csv(&results()).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "english_storm surge_emergency");
        assert_eq!(&rows[0][1], "English");
        assert_eq!(&rows[0][2], "storm surge");
        assert_eq!(&rows[0][3], CONTENT_TYPE);
        assert_eq!(&rows[0][11], "water, rising \"fast\"");
        assert_eq!(&rows[1][1], "Hindi");
        assert_eq!(&rows[1][4], "सुनामी भारत मदद");
    }

    #[test]
    fn csv_of_empty_results_is_header_only() {
        let bytes = render_csv(&SearchResults::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("search_term,language,hazard_type"));
    }

    #[test]
    fn json_document_shape() {
        let bytes = render_json(&results(), timestamp()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("सुनामी भारत मदद"));

        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        let metadata = &doc["metadata"];
        assert_eq!(metadata["scrape_date"], "2024-05-01T10:30:00.000000");
        assert_eq!(metadata["total_emergency_videos"], 2);
        assert_eq!(metadata["search_categories"], 2);
        assert_eq!(metadata["languages"], serde_json::json!(["English", "Hindi"]));

        let hindi = &doc["results"]["hindi_tsunami_emergency"];
        assert_eq!(hindi["language"], "Hindi");
        assert_eq!(hindi["hazard_type"], "tsunami");
        assert_eq!(hindi["content_type"], CONTENT_TYPE);
        assert_eq!(hindi["video_count"], 1);
        assert_eq!(hindi["videos"][0]["url"], "https://www.youtube.com/watch?v=h1");
    }

    #[test]
    fn json_results_keep_run_order() {
        let bytes = render_json(&results(), timestamp()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let english = text.find("english_storm surge_emergency").unwrap();
        let hindi = text.find("hindi_tsunami_emergency").unwrap();
        assert!(english < hindi);
    }
}
