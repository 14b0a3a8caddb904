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
    io,
    process::exit,
    sync::Arc,
};
use log::{debug, error, info, warn};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use crate::arg_parse::GlobalOpts;
use crate::blacklist::Blacklist;
use crate::content_parse::{Extractor, FileSet};
use crate::probe_thread::ProbeResults;

mod arg_parse;
mod blacklist;
mod content_parse;
mod output;
mod output_format;
mod probe_thread;
#[cfg(feature = "probe")]
mod request;
mod scan_thread;
mod source_files;
mod tld;

#[cfg(test)]
mod tests;
#[cfg(all(test, feature = "probe"))]
mod test_server;
#[cfg(all(test, feature = "probe"))]
mod integration_testing;

fn main() {
    let global_opts = arg_parse::get_args();

    let color_choice = if global_opts.is_terminal && !global_opts.no_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    if let Err(e) = TermLogger::init(global_opts.log_level, simplelog::Config::default(),
        TerminalMode::Mixed, color_choice)
    {
        eprintln!("Error creating terminal logger: {}", e);
    }

    if let Err(e) = blackscan_main(global_opts) {
        error!("{}", e);
        exit(2);
    }
}

/// Scans the configured directory, probes if asked to and reports.
/// Only problems with the directory itself are returned as errors.
pub fn blackscan_main(global_opts: GlobalOpts)
    -> io::Result<(FileSet, Option<ProbeResults>)>
{
    for warning in &global_opts.warnings {
        warn!("{}", warning);
    }

    let global_opts = Arc::new(global_opts);
    let blacklist = Arc::new(Blacklist::load(global_opts.blacklist_file.as_deref()));

    print_config(&global_opts, &blacklist);

    let files = source_files::collect_files(&global_opts.directory,
        global_opts.recursive, &global_opts.extension_filter)
        .map_err(|e| io::Error::new(e.kind(),
            format!("Can't scan directory \"{}\": {}", global_opts.directory.display(), e)))?;

    if files.is_empty() {
        warn!("No files found to process");
        return Ok((FileSet::new(), None));
    }

    info!("Found {} files to process, using {} threads",
        files.len(), global_opts.max_threads.min(files.len()));

    let extractor = Arc::new(Extractor::new(global_opts.base_domain.as_deref(),
        blacklist.clone()));
    let mut file_set = scan_thread::scan_files(files, extractor, global_opts.max_threads);

    info!("Scan finished, {} files processed successfully", file_set.len());

    if file_set.is_empty() {
        warn!("No files could be processed");
        return Ok((file_set, None));
    }

    let probe_results = if global_opts.probe {
        run_probe(&mut file_set, blacklist, global_opts.clone())
    } else {
        None
    };

    output::print_report(&file_set, probe_results.as_ref(), &global_opts);

    Ok((file_set, probe_results))
}

#[cfg(feature = "probe")]
fn run_probe(file_set: &mut FileSet, blacklist: Arc<Blacklist>,
    global_opts: Arc<GlobalOpts>) -> Option<ProbeResults>
{
    Some(probe_thread::probe_all(file_set, blacklist, global_opts))
}

#[cfg(not(feature = "probe"))]
fn run_probe(_file_set: &mut FileSet, _blacklist: Arc<Blacklist>,
    _global_opts: Arc<GlobalOpts>) -> Option<ProbeResults>
{
    warn!("This build has no HTTP support (the \"probe\" feature is disabled), skipping probing");
    None
}

fn print_config(global_opts: &GlobalOpts, blacklist: &Blacklist) {
    info!("Target directory: {}", global_opts.directory.display());
    info!("Recursive: {}", if global_opts.recursive { "yes" } else { "no" });
    info!("Scanning: {}", global_opts.extension_filter.describe());
    info!("Threads: {}", global_opts.max_threads);
    if let Some(output_file) = &global_opts.output_file {
        info!("Report file: {}", output_file);
    }
    if let Some(json_file) = &global_opts.json_file {
        info!("JSON report file: {}", json_file);
    }
    if let Some(base_domain) = &global_opts.base_domain {
        info!("Base domain: {}", base_domain);
    }
    info!("Built-in blacklist keywords: {}", blacklist::BLACKLINK_KEYWORDS.len());
    if let Some(blacklist_file) = &global_opts.blacklist_file {
        info!("Extra blacklist file: {}", blacklist_file.display());
    }
    info!("Blacklist patterns after merging: {}", blacklist.len());
    debug!("Blacklist: {}", blacklist.patterns().join(", "));
    if global_opts.probe {
        info!("HTTP probing: on ({} threads, {:.1}s timeout, {} body bytes)",
            global_opts.probe_workers, global_opts.probe_timeout.as_secs_f64(),
            global_opts.max_body_bytes);
    } else {
        info!("HTTP probing: off");
    }
}
