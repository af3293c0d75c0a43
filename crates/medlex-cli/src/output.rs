//! Output formatting and file writing for the CLI.

use crate::error::Result;
use colored::*;
use medlex_domain::{FailedToken, RunSummary, Wordlist};
use medlex_generator::{to_pretty_json, ProgressEvent};
use std::fs;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// One line per finished token.
    pub fn progress(&self, event: &ProgressEvent) -> String {
        let counter = format!("[{}/{}]", event.completed, event.total);
        if event.success {
            format!("{} {}", counter, self.success(&event.token))
        } else {
            format!("{} {}", counter, self.error(&event.token))
        }
    }

    /// Final summary block.
    pub fn summary(&self, summary: &RunSummary, output: &Path, elapsed_ms: u64) -> String {
        let mut lines = vec![
            self.info(&format!(
                "Processed {} term(s) in {:.1}s",
                summary.total,
                elapsed_ms as f64 / 1000.0
            )),
            self.success(&format!("{} succeeded, written to {}", summary.succeeded, output.display())),
        ];
        if summary.failed > 0 {
            lines.push(self.warning(&format!("{} failed:", summary.failed)));
            lines.push(self.failures_table(&summary.failures));
        }
        lines.join("\n")
    }

    /// Table of failed tokens and reasons.
    pub fn failures_table(&self, failures: &[FailedToken]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Term", "Reason"]);
        for failure in failures {
            builder.push_record([failure.token.as_str(), failure.reason.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Write the wordlist, replacing any existing file.
pub fn write_wordlist(path: &Path, wordlist: &Wordlist) -> Result<()> {
    write_file(path, &to_pretty_json(wordlist)?)
}

/// Write the failed tokens as a JSON array.
pub fn write_failures(path: &Path, failures: &[FailedToken]) -> Result<()> {
    write_file(path, &serde_json::to_string_pretty(failures)?)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medlex_domain::WordEntry;

    fn event(success: bool) -> ProgressEvent {
        ProgressEvent {
            index: 0,
            token: "otitis".to_string(),
            success,
            completed: 2,
            succeeded: 1,
            failed: 1,
            total: 5,
        }
    }

    #[test]
    fn test_progress_lines() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.progress(&event(true)), "[2/5] ✓ otitis");
        assert_eq!(formatter.progress(&event(false)), "[2/5] ✗ otitis");
    }

    #[test]
    fn test_summary_lists_failures() {
        let formatter = Formatter::new(false);
        let summary = RunSummary {
            total: 2,
            succeeded: 1,
            failed: 1,
            failures: vec![FailedToken {
                token: "xyz".to_string(),
                reason: "Exhausted 3 attempts".to_string(),
            }],
        };

        let text = formatter.summary(&summary, Path::new("out.json"), 1500);
        assert!(text.contains("Processed 2 term(s) in 1.5s"));
        assert!(text.contains("1 failed"));
        assert!(text.contains("xyz"));
        assert!(text.contains("Reason"));
    }

    #[test]
    fn test_summary_without_failures_has_no_table() {
        let formatter = Formatter::new(false);
        let summary = RunSummary {
            total: 1,
            succeeded: 1,
            ..RunSummary::default()
        };
        assert!(!formatter.summary(&summary, Path::new("o.json"), 0).contains("Reason"));
    }

    #[test]
    fn test_write_wordlist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wordlist.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale contents that are longer than the new file").unwrap();

        let mut entry = WordEntry::new("carcinoma");
        entry.chinese_translation = "癌".to_string();
        let wordlist = Wordlist {
            version: "1.0".to_string(),
            words: vec![entry],
        };
        write_wordlist(&path, &wordlist).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"癌\""));
        let parsed: Wordlist = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, wordlist);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("wordlist.json");

        write_wordlist(&path, &Wordlist::new("1.0")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.json");
        let failures = vec![FailedToken {
            token: "xyz".to_string(),
            reason: "r".to_string(),
        }];

        write_failures(&path, &failures).unwrap();
        let parsed: Vec<FailedToken> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, failures);
    }
}
