// This file is part of Blackscan
// Copyright (C) 2026 The Blackscan developers
//
// Blackscan is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Blackscan is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Blackscan.  If not, see <https://www.gnu.org/licenses/>.

use std::path::Path;
use colored::Colorize;
use crate::content_parse::{ExtractionRecord, FileSet};
use crate::probe_thread::{ProbeResult, ProbeResults};


pub const RULE_WIDTH: usize = 80;

#[inline]
pub fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

#[inline]
pub fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

// Totals across every file
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub files: usize,
    pub hidden: usize,
    pub external: usize,
    pub internal: usize,
    pub other: usize,
    pub domain_tokens: usize,
    pub suspicious: usize,
}

impl Totals {
    pub fn count(file_set: &FileSet) -> Totals {
        let mut totals = Totals { files: file_set.len(), ..Totals::default() };
        for record in file_set.values() {
            totals.hidden += record.hidden.len();
            totals.external += record.external.len();
            totals.internal += record.internal.len();
            totals.other += record.other.len();
            totals.domain_tokens += record.domain_tokens.len();
            totals.suspicious += record.suspicious.len();
        }
        totals
    }
}

pub fn report_header(totals: &Totals, generated_at: &str, color: bool) -> Vec<String> {
    let mut lines = vec![
        heavy_rule(),
        String::from("URL Extraction Report"),
        format!("Generated: {}", generated_at),
        heavy_rule(),
        format!("Files analysed: {}", totals.files),
        format!("Possible hidden links: {}", totals.hidden),
        format!("External links: {}", totals.external),
        format!("Internal links: {}", totals.internal),
        format!("Other links: {}", totals.other),
        format!("Domain-like strings (including bare domains): {}", totals.domain_tokens),
    ];

    if totals.suspicious > 0 {
        let line = format!("Blacklist hits (suspected black links): {}", totals.suspicious);
        lines.push(if color { line.red().bold().to_string() } else { line });
    }

    lines.push(heavy_rule());
    lines.push(String::new());
    lines
}

// One titled list, or "(none)" when it is empty
pub fn list_section(title: &str, items: &[String], highlight: bool) -> Vec<String> {
    let mut lines = vec![format!("  {} ({}):", title, items.len())];

    if items.is_empty() {
        lines.push(String::from("    (none)"));
        return lines;
    }

    for item in items {
        let line = format!("    - {}", item);
        lines.push(if highlight { line.red().to_string() } else { line });
    }
    lines
}

pub fn file_section(path: &Path, record: &ExtractionRecord, color: bool) -> Vec<String> {
    let title = format!("File: {}", path.display());
    let mut lines = vec![if color { title.bold().to_string() } else { title }];

    lines.extend(list_section("Possible hidden links", &record.hidden, color));
    lines.extend(list_section("External links", &record.external, false));
    lines.extend(list_section("Internal links", &record.internal, false));
    lines.extend(list_section("Other links", &record.other, false));
    lines.extend(list_section("Domain-like strings in source", &record.domain_tokens, false));
    lines.extend(list_section("Blacklisted links/domains", &record.suspicious, color));

    lines.push(light_rule());
    lines.push(String::new());
    lines
}

pub fn probe_section(url: &str, result: &ProbeResult, color: bool) -> Vec<String> {
    let mut lines = vec![format!("URL: {}", url)];

    match result {
        ProbeResult::Error(e) => {
            lines.push(format!("  Probe failed: {}", e.error));
        }
        ProbeResult::Response(response) => {
            lines.push(format!("  Status: {}", response.status_code));

            if !response.final_url.is_empty() && response.final_url != url {
                lines.push(format!("  Final URL: {}", response.final_url));
            }

            if !response.body_keyword_hits.is_empty() {
                let line = format!("  Blacklist keywords in page: {}",
                    response.body_keyword_hits.join(", "));
                lines.push(if color { line.red().to_string() } else { line });
            }

            if !response.headers.is_empty() {
                lines.push(String::from("  Interesting headers:"));
                for (name, value) in &response.headers {
                    lines.push(format!("    {}: {}", name, value));
                }
            }
        }
    }

    lines.push(light_rule());
    lines.push(String::new());
    lines
}

pub fn probe_results_section(probe_results: &ProbeResults, color: bool) -> Vec<String> {
    let mut lines = vec![
        heavy_rule(),
        String::from("HTTP probe results (grouped by URL)"),
        heavy_rule(),
    ];

    // BTreeMap iteration is already sorted by url
    for (url, result) in probe_results {
        lines.extend(probe_section(url, result, color));
    }
    lines
}
