use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metagame_lib::{CrawlReport, SetReport};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Counts a report contributes to the summary table.
pub trait ReportRows {
    fn rows(&self) -> Vec<(&'static str, String)>;
}

impl ReportRows for SetReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Sets listed", self.listed.to_string()),
            ("Sets skipped", self.skipped.to_string()),
            ("Sets written", self.written.to_string()),
            ("Cards extracted", self.cards.to_string()),
        ]
    }
}

impl ReportRows for CrawlReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Listing pages", self.pages.to_string()),
            ("Tournaments listed", self.listed.to_string()),
            ("Already extracted", self.skipped.to_string()),
            ("Standings unavailable", self.unavailable.to_string()),
            ("Without decklists", self.without_decklists.to_string()),
            ("Tournaments written", self.written.to_string()),
        ]
    }
}

/// End-of-run summary of one subcommand.
#[derive(Serialize)]
pub struct Summary<R> {
    pub command: &'static str,
    pub report: R,
    pub output_dir: String,
    /// Record files present in `output_dir` after the run.
    pub files: usize,
    pub elapsed_secs: f64,
    pub finished_at: DateTime<Utc>,
}

impl<R: ReportRows> Summary<R> {
    pub fn new(
        command: &'static str,
        report: R,
        output_dir: &Path,
        files: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            command,
            report,
            output_dir: output_dir.display().to_string(),
            files,
            elapsed_secs: elapsed.as_secs_f64(),
            finished_at: Utc::now(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn build_summary_rows<R: ReportRows>(summary: &Summary<R>) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = summary
        .report
        .rows()
        .into_iter()
        .map(|(metric, value)| SummaryRow {
            metric: metric.to_string(),
            value,
        })
        .collect();
    rows.push(SummaryRow {
        metric: "Files in output".to_string(),
        value: format!("{} ({})", summary.files, summary.output_dir),
    });
    rows.push(SummaryRow {
        metric: "Elapsed".to_string(),
        value: format_elapsed(summary.elapsed_secs),
    });
    rows
}

/// `83.4` -> `1m 23.4s`, `9.26` -> `9.3s`.
pub fn format_elapsed(secs: f64) -> String {
    let minutes = (secs / 60.0).floor();
    let rest = secs - minutes * 60.0;
    if minutes >= 1.0 {
        format!("{}m {:.1}s", minutes as u64, rest)
    } else {
        format!("{:.1}s", rest)
    }
}

pub fn print_summary<R: ReportRows + Serialize>(summary: &Summary<R>, format: &OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new(build_summary_rows(summary));
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(summary),
    }
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
