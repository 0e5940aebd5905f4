use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use fxhash::FxHashMap;
use log::info;
use serde::Serialize;

use flatseq_core::{Severity, ValidationMessage};
use flatseq_io::open_entries;

use crate::utils::{input_paths, resolve_format};

///
/// One message together with the file it was found in.
///
#[derive(Serialize)]
struct Report {
    file: String,
    #[serde(flatten)]
    message: ValidationMessage,
}

impl Report {
    /// `file:line severity key message`; `-` when no line applies.
    fn line(&self) -> String {
        let line = self
            .message
            .origins
            .first()
            .and_then(|origin| origin.first_line())
            .map(|line| line.to_string())
            .unwrap_or("-".to_string());
        format!(
            "{}:{} {} {} {}",
            self.file,
            line,
            self.message.severity,
            self.message.key,
            self.message.message()
        )
    }
}

fn validate_file(input: &Path, from: Option<&str>, reports: &mut Vec<Report>) -> Result<usize> {
    let format = resolve_format(input, from)?;
    let mut entries = 0;
    for record in open_entries(input, format)? {
        let (_, result) = record.with_context(|| format!("Failed to read {}", input.display()))?;
        entries += 1;
        reports.extend(result.messages().iter().map(|message| Report {
            file: input.display().to_string(),
            message: message.clone(),
        }));
    }
    info!("{}: {} records validated", input.display(), entries);
    Ok(entries)
}

/// Message counts per key, most frequent first.
fn summarize(reports: &[Report]) -> Vec<(&str, usize)> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for report in reports {
        *counts.entry(report.message.key.as_str()).or_insert(0) += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    counts
}

pub fn run_validate(matches: &ArgMatches) -> Result<()> {
    let from = matches.get_one::<String>("from").map(String::as_str);
    let json = matches.get_flag("json");

    let mut reports = Vec::new();
    let mut entries = 0;
    for input in input_paths(matches) {
        entries += validate_file(&input, from, &mut reports)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report.line());
        }
        for (key, count) in summarize(&reports) {
            println!("{}\t{}", key, count);
        }
    }

    let errors = reports
        .iter()
        .filter(|report| report.message.severity == Severity::Error)
        .count();
    info!("{} records, {} messages, {} errors", entries, reports.len(), errors);
    if errors > 0 {
        bail!("{} errors reported", errors);
    }
    Ok(())
}
