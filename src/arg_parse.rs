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
    path::PathBuf,
    time::Duration,
};
use clap::Parser;
use simplelog::LevelFilter;
use time::{OffsetDateTime, macros::format_description};
use crate::source_files::ExtensionFilter;

pub const MAX_SCAN_THREADS: usize = 32;
pub const MAX_PROBE_THREADS: usize = 64;

/// Options for a run, fixed once parsing is done and shared between threads
pub struct GlobalOpts {
    pub directory: PathBuf,
    pub base_domain: Option<String>,
    pub recursive: bool,
    pub extension_filter: ExtensionFilter,
    pub max_threads: usize,
    pub blacklist_file: Option<PathBuf>,
    pub probe: bool,
    pub probe_timeout: Duration,
    pub probe_workers: usize,
    pub max_body_bytes: usize,
    pub user_agent: String,
    pub output_file: Option<String>,
    pub json_file: Option<String>,
    pub is_terminal: bool,
    pub no_color: bool,
    pub log_level: LevelFilter,
    // Notes about adjusted options, logged once the logger is up
    pub warnings: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "blackscan",
    version = version_string(),
    about = "Finds hidden, external and blacklisted links in a source tree",
    after_help = "Examples:\n  \
        blackscan -d /var/www/html\n  \
        blackscan --all -t 8\n  \
        blackscan -e html,php,js -b https://example.com\n  \
        blackscan --blacklist extra.txt --probe",
)]
struct Args {
    /// Directory to scan
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    directory: PathBuf,

    /// Site the files belong to, used to tell external links apart (e.g. https://example.com)
    #[arg(short, long, value_name = "URL")]
    base_domain: Option<String>,

    /// Text report location, by default a timestamped file in the current directory
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Leave the timestamp out of the default report file name
    #[arg(long)]
    no_timestamp: bool,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<String>,

    /// Descend into subdirectories (the default)
    #[arg(short, long)]
    recursive: bool,

    /// Only scan files directly inside the directory
    #[arg(long, conflicts_with = "recursive")]
    no_recursive: bool,

    /// Comma separated extensions to scan (html,php,js or .html,.php,.js)
    #[arg(short, long, value_name = "LIST", conflicts_with = "all")]
    extensions: Option<String>,

    /// Scan every file regardless of extension
    #[arg(short, long)]
    all: bool,

    /// Number of scanning threads
    #[arg(short, long, value_name = "N", default_value_t = 4)]
    threads: usize,

    /// Extra blacklist keywords or domain fragments, one per line, # for comments
    #[arg(long, value_name = "FILE")]
    blacklist: Option<PathBuf>,

    /// Fetch hidden, external and suspicious links and check their content
    #[arg(long)]
    probe: bool,

    /// Timeout for each probe request in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5.0, value_parser = positive_seconds)]
    probe_timeout: f64,

    /// Number of probing threads
    #[arg(long, value_name = "N", default_value_t = 8)]
    probe_workers: usize,

    /// Maximum number of response body bytes checked per probe
    #[arg(long, value_name = "BYTES", default_value_t = 200_000)]
    max_body_bytes: usize,

    /// User agent sent with probe requests
    #[arg(long, value_name = "UA", default_value = concat!("blackscan/", env!("CARGO_PKG_VERSION")))]
    user_agent: String,

    /// Show debug output
    #[arg(short, long, conflicts_with = "silent")]
    verbose: bool,

    /// Only show the final report and errors
    #[arg(short = 'q', long)]
    silent: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

pub fn get_args() -> GlobalOpts {
    GlobalOpts::from(Args::parse())
}

#[cfg(test)]
pub fn try_get_args_from<I, T>(args: I) -> Result<GlobalOpts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args).map(GlobalOpts::from)
}

impl From<Args> for GlobalOpts {
    fn from(args: Args) -> GlobalOpts {
        let mut warnings = Vec::new();

        let max_threads = clamp_threads(args.threads, MAX_SCAN_THREADS, "thread", &mut warnings);
        let probe_workers = clamp_threads(args.probe_workers, MAX_PROBE_THREADS,
            "probe worker", &mut warnings);

        let extension_filter = if args.all {
            ExtensionFilter::All
        } else {
            match &args.extensions {
                Some(list) => ExtensionFilter::from_list(list),
                None => ExtensionFilter::Default,
            }
        };

        let output_file = match args.output {
            Some(output) => output,
            None => default_output_name(args.no_timestamp),
        };

        let log_level = if args.silent {
            LevelFilter::Warn
        } else if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        GlobalOpts {
            directory: args.directory,
            base_domain: args.base_domain.filter(|base| !base.trim().is_empty()),
            recursive: args.recursive || !args.no_recursive,
            extension_filter,
            max_threads,
            blacklist_file: args.blacklist,
            probe: args.probe,
            probe_timeout: Duration::from_secs_f64(args.probe_timeout),
            probe_workers,
            max_body_bytes: args.max_body_bytes,
            user_agent: args.user_agent,
            output_file: Some(output_file),
            json_file: args.json,
            is_terminal: atty::is(atty::Stream::Stdout),
            no_color: args.no_color,
            log_level,
            warnings,
        }
    }
}

// Keeps a thread count within 1..=max, noting any change
fn clamp_threads(requested: usize, max: usize, what: &str, warnings: &mut Vec<String>) -> usize {
    let clamped = requested.clamp(1, max);
    if clamped != requested {
        warnings.push(format!("{} count {} is out of range, using {}", what, requested, clamped));
    }
    clamped
}

pub fn default_output_name(no_timestamp: bool) -> String {
    if no_timestamp {
        return String::from("url_extraction_results.txt");
    }

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    match now.format(&format) {
        Ok(stamp) => format!("url_extraction_results_{}.txt", stamp),
        Err(_) => String::from("url_extraction_results.txt"),
    }
}

// Below a millisecond curl would be handed a zero timeout, which disables it
const MIN_PROBE_TIMEOUT: f64 = 0.001;
const MAX_PROBE_TIMEOUT: f64 = 86_400.0;

fn positive_seconds(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(seconds) if (MIN_PROBE_TIMEOUT..=MAX_PROBE_TIMEOUT).contains(&seconds) => Ok(seconds),
        _ => Err(format!("The probe timeout must be between {} and {} seconds",
            MIN_PROBE_TIMEOUT, MAX_PROBE_TIMEOUT)),
    }
}

#[cfg(feature = "release_version_string")]
fn version_string() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(not(feature = "release_version_string"))]
fn version_string() -> &'static str {
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) if !sha.is_empty() => sha,
        _ => env!("CARGO_PKG_VERSION"),
    }
}
