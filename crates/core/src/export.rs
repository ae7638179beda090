//! Exporting the current results as JSON, CSV or plain text.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::{
    error::{Result, TubekitError},
    format::{format_metrics, format_tags, format_titles},
    session::SessionState,
    types::{ContentMetrics, TagSet},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Txt];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown export format '{s}', expected json, csv or txt"))
    }
}

/// The exported subset of a session.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub timestamp: DateTime<Local>,
    pub titles: &'a [String],
    pub description: &'a str,
    pub tags: &'a TagSet,
    pub metrics: Option<&'a ContentMetrics>,
}

impl<'a> ExportDocument<'a> {
    /// Fails with [`TubekitError::NothingToExport`] unless there are titles or a description.
    pub fn from_session(session: &'a SessionState, timestamp: DateTime<Local>) -> Result<Self> {
        if session.titles.is_empty() && session.description.is_empty() {
            return Err(TubekitError::NothingToExport);
        }

        Ok(Self {
            timestamp,
            titles: &session.titles,
            description: &session.description,
            tags: &session.tags,
            metrics: session.metrics.as_ref(),
        })
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        Ok(match format {
            ExportFormat::Json => serde_json::to_string_pretty(self)?,
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Txt => self.to_text(),
        })
    }

    fn to_csv(&self) -> String {
        let mut rows: Vec<[String; 3]> = vec![
            ["section".into(), "key".into(), "value".into()],
            ["timestamp".into(), String::new(), self.timestamp.to_rfc3339()],
        ];

        for (i, title) in self.titles.iter().enumerate() {
            rows.push(["title".into(), (i + 1).to_string(), title.clone()]);
        }
        if !self.description.is_empty() {
            rows.push(["description".into(), String::new(), self.description.to_string()]);
        }

        let categories: Vec<(&str, &[String])> = if self.tags.categorized {
            vec![
                ("primary", self.tags.primary.as_slice()),
                ("secondary", self.tags.secondary.as_slice()),
                ("trending", self.tags.trending.as_slice()),
            ]
        } else {
            vec![("all", self.tags.all.as_slice())]
        };
        for (category, tags) in categories {
            for tag in tags {
                rows.push(["tag".into(), category.into(), tag.clone()]);
            }
        }

        if let Some(metrics) = self.metrics {
            rows.push(["metric".into(), "word_count".into(), metrics.word_count.to_string()]);
            rows.push(["metric".into(), "char_count".into(), metrics.char_count.to_string()]);
            rows.push([
                "metric".into(),
                "reading_time_minutes".into(),
                metrics.reading_time_minutes.to_string(),
            ]);
            for (word, count) in &metrics.top_keywords {
                rows.push(["keyword".into(), word.clone(), count.to_string()]);
            }
        }

        rows.iter()
            .map(|row| row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","))
            .map(|line| line + "\n")
            .collect()
    }

    fn to_text(&self) -> String {
        let mut output = format!(
            "YouTube content export - {}\n\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        );

        if !self.titles.is_empty() {
            output.push_str("TITLES\n");
            output.push_str(&format_titles(self.titles));
            output.push('\n');
        }
        if !self.description.is_empty() {
            output.push_str("DESCRIPTION\n");
            output.push_str(self.description);
            output.push_str("\n\n");
        }
        if !self.tags.is_empty() {
            output.push_str("TAGS\n");
            output.push_str(&format_tags(self.tags));
            output.push('\n');
        }
        if let Some(metrics) = self.metrics {
            output.push_str("METRICS\n");
            output.push_str(&format_metrics(metrics));
        }
        output
    }
}

/// Quotes a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `youtube_content_YYYYMMDD_HHMMSS.<ext>`
pub fn export_filename(format: ExportFormat, timestamp: &DateTime<Local>) -> String {
    format!(
        "youtube_content_{}.{}",
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Writes the session's results into `dir` and returns the file path.
pub async fn write_export(
    session: &SessionState,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let timestamp = Local::now();
    let document = ExportDocument::from_session(session, timestamp)?;
    let content = document.render(format)?;

    fs::create_dir_all(dir).await?;
    let path = dir.join(export_filename(format, &timestamp));
    fs::write(&path, content).await?;

    info!(path = %path.display(), %format, "exported results");
    Ok(path)
}
