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

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, LineWriter, Write},
    path::Path,
};
use log::{error, info};
use serde::Serialize;
use time::{OffsetDateTime, macros::format_description};
use crate::arg_parse::GlobalOpts;
use crate::content_parse::{ExtractionRecord, FileSet};
use crate::output_format::{self, Totals};
use crate::probe_thread::ProbeResults;

// Shape of the JSON report
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: &'a str,
    pub files: BTreeMap<String, &'a ExtractionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_results: Option<&'a ProbeResults>,
}

// Local time for report headers, falling back to UTC when the offset
// can't be determined
pub fn generated_at() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    now.format(&format).unwrap_or_default()
}

/// Renders the whole report as text
pub fn format_report(file_set: &FileSet, probe_results: Option<&ProbeResults>,
    generated_at: &str, color: bool) -> String
{
    let totals = Totals::count(file_set);
    let mut lines = output_format::report_header(&totals, generated_at, color);

    for (path, record) in file_set {
        lines.extend(output_format::file_section(path, record, color));
    }

    if let Some(probe_results) = probe_results.filter(|results| !results.is_empty()) {
        lines.extend(output_format::probe_results_section(probe_results, color));
    }

    lines.join("\n")
}

pub fn format_json(file_set: &FileSet, probe_results: Option<&ProbeResults>,
    generated_at: &str) -> serde_json::Result<String>
{
    let report = JsonReport {
        generated_at,
        files: file_set.iter()
            .map(|(path, record)| (path.display().to_string(), record))
            .collect(),
        probe_results,
    };
    serde_json::to_string_pretty(&report)
}

// Called once both phases are done: prints the report and saves the
// requested copies. Failing to save is reported but not fatal.
pub fn print_report(file_set: &FileSet, probe_results: Option<&ProbeResults>,
    global_opts: &GlobalOpts)
{
    let generated_at = generated_at();
    let color = global_opts.is_terminal && !global_opts.no_color;

    println!("\n{}", format_report(file_set, probe_results, &generated_at, color));

    if let Some(output_file) = &global_opts.output_file {
        let report = format_report(file_set, probe_results, &generated_at, false);
        match write_file(Path::new(output_file), &report) {
            Ok(()) => info!("Report saved to {}", display_path(output_file)),
            Err(e) => error!("Couldn't write report to {}: {}", output_file, e),
        }
    }

    if let Some(json_file) = &global_opts.json_file {
        let written = format_json(file_set, probe_results, &generated_at)
            .map_err(io::Error::from)
            .and_then(|json| write_file(Path::new(json_file), &json));
        match written {
            Ok(()) => info!("JSON report saved to {}", display_path(json_file)),
            Err(e) => error!("Couldn't write JSON report to {}: {}", json_file, e),
        }
    }
}

pub fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    let mut writer = LineWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}

fn display_path(path: &str) -> String {
    std::path::absolute(path)
        .map(|absolute| absolute.display().to_string())
        .unwrap_or_else(|_| String::from(path))
}
