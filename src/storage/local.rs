//! Local filesystem exporter.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{OutputConfig, SearchResults};
use crate::storage::{ExportSummary, render_csv, render_json};

/// Writes timestamped CSV and JSON exports into one directory.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    dir: PathBuf,
    prefix: String,
}

impl ResultExporter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(&output.dir, &output.file_prefix)
    }

    /// Export using the current local time.
    pub async fn export(&self, results: &SearchResults) -> Result<ExportSummary> {
        self.export_at(results, Local::now().naive_local()).await
    }

    /// Export with an explicit timestamp for file names and metadata.
    pub async fn export_at(
        &self,
        results: &SearchResults,
        at: NaiveDateTime,
    ) -> Result<ExportSummary> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let stem = format!("{}_{}", self.prefix, at.format("%Y%m%d_%H%M%S"));
        let csv_path = self.dir.join(format!("{stem}.csv"));
        let json_path = self.dir.join(format!("{stem}.json"));

        write_bytes(&csv_path, &render_csv(results)?).await?;
        log::info!("Emergency video results saved to {}", csv_path.display());

        write_bytes(&json_path, &render_json(results, at)?).await?;
        log::info!("Emergency video results saved to {}", json_path.display());

        Ok(ExportSummary {
            csv_path,
            json_path,
            total_videos: results.total_videos(),
            categories: results.category_count(),
        })
    }
}

/// Write bytes atomically (write to temp, then rename).
async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKey, HazardTerm, Language, SearchCategory, VideoRecord};
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    #[tokio::test]
    async fn export_writes_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = ResultExporter::new(tmp.path().join("output"), "emergency_ocean_hazards");

        let mut results = SearchResults::default();
        results.push(SearchCategory {
            key: CategoryKey::new(Language::English, &HazardTerm::new("cyclone", "चक्रवात")),
            videos: vec![VideoRecord::new(
                "Cyclone Mumbai help",
                "https://www.youtube.com/watch?v=c1",
            )],
        });

        let summary = exporter.export_at(&results, at()).await.unwrap();

        assert_eq!(
            summary.csv_path,
            tmp.path()
                .join("output")
                .join("emergency_ocean_hazards_20240501_090507.csv")
        );
        assert_eq!(summary.total_videos, 1);
        assert_eq!(summary.categories, 1);

        let csv = std::fs::read_to_string(&summary.csv_path).unwrap();
        assert!(csv.contains("english_cyclone_emergency,English,cyclone"));
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&summary.json_path).unwrap()).unwrap();
        assert_eq!(json["results"]["english_cyclone_emergency"]["video_count"], 1);

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path().join("output"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn empty_results_still_export() {
        let tmp = tempfile::tempdir().unwrap();
        let exporter = ResultExporter::new(tmp.path(), "run");

        let summary = exporter
            .export_at(&SearchResults::default(), at())
            .await
            .unwrap();

        assert_eq!(summary.total_videos, 0);
        assert!(summary.json_path.exists());
    }
}
