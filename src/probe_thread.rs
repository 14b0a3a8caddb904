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
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};
use serde::Serialize;
use crate::content_parse::FileSet;

#[cfg(feature = "probe")]
use std::{
    sync::{Arc, mpsc},
    thread,
};
#[cfg(feature = "probe")]
use log::{error, info, warn};
#[cfg(feature = "probe")]
use crate::{arg_parse::GlobalOpts, blacklist::Blacklist, request, scan_thread::Stride};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResponse {
    pub status_code: u32,
    pub final_url: String,
    pub headers: BTreeMap<String, String>,
    pub body_keyword_hits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeError {
    pub error: String,
}

/// Outcome of fetching one probe target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProbeResult {
    Response(ProbeResponse),
    Error(ProbeError),
}

impl ProbeResult {
    pub fn error<S: Into<String>>(message: S) -> ProbeResult {
        ProbeResult::Error(ProbeError { error: message.into() })
    }

    pub fn keyword_hits(&self) -> &[String] {
        match self {
            ProbeResult::Response(response) => &response.body_keyword_hits,
            ProbeResult::Error(_) => &[],
        }
    }
}

pub type ProbeResults = BTreeMap<String, ProbeResult>;

// The files, and the exact strings in them, that led to a probe target
pub type ProbeSources = BTreeSet<(PathBuf, String)>;

/// Turns an extracted string into something that can be fetched.
/// Root-relative paths are dropped, there is no site to resolve them against.
pub fn normalize_probe_target(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(String::from(value));
    }
    if value.starts_with("//") {
        return Some(format!("http:{}", value));
    }
    if value.starts_with('/') {
        return None;
    }

    Some(format!("http://{}", value))
}

/// Collects every distinct url worth probing along with where it came from
pub fn build_probe_targets(file_set: &FileSet) -> BTreeMap<String, ProbeSources> {
    let mut targets: BTreeMap<String, ProbeSources> = BTreeMap::new();

    for (path, record) in file_set {
        let candidates = record.suspicious.iter()
            .chain(&record.hidden)
            .chain(&record.external)
            .chain(&record.domain_tokens);

        for original in candidates {
            if let Some(url) = normalize_probe_target(original) {
                targets.entry(url)
                    .or_default()
                    .insert((path.clone(), original.clone()));
            }
        }
    }

    targets
}

/// Marks the original strings behind a target as suspicious in their files,
/// returns how many entries were new
pub fn backfill(file_set: &mut FileSet, sources: &ProbeSources) -> usize {
    sources.iter()
        .filter(|(path, original)| {
            file_set.get_mut(path)
                .is_some_and(|record| record.add_suspicious(original))
        })
        .count()
}

#[cfg(feature = "probe")]
pub fn thread_spawn(tx: mpsc::Sender<(String, ProbeResult)>, targets: Stride<String>,
    blacklist: Arc<Blacklist>, global_opts: Arc<GlobalOpts>)
{
    let mut easy = match request::generate_easy(&global_opts) {
        Ok(easy) => easy,
        Err(e) => {
            // Without a handle every target of this thread fails the same way
            for (_, url) in targets {
                if tx.send((url, ProbeResult::error(e.to_string()))).is_err() {
                    break;
                }
            }
            return;
        }
    };

    for (_, url) in targets {
        let result = request::probe_url(&mut easy, &url, &blacklist);
        if tx.send((url, result)).is_err() {
            break;
        }
    }
}

/// Probes every target derived from the file set, then back-fills the
/// suspicious lists of the files behind any target whose body hit the
/// blacklist. Back-filling happens on this thread as results arrive, so
/// the file set has a single writer.
#[cfg(feature = "probe")]
pub fn probe_all(file_set: &mut FileSet, blacklist: Arc<Blacklist>,
    global_opts: Arc<GlobalOpts>) -> ProbeResults
{
    let mut results = ProbeResults::new();

    let targets = build_probe_targets(file_set);
    if targets.is_empty() {
        info!("No links need HTTP probing");
        return results;
    }

    let urls: Arc<Vec<String>> = Arc::new(targets.keys().cloned().collect());
    let workers = global_opts.probe_workers.clamp(1, urls.len());

    info!("Probing {} links (timeout {:.1}s, {} threads)",
        urls.len(), global_opts.probe_timeout.as_secs_f64(), workers);

    let (tx, rx) = mpsc::channel::<(String, ProbeResult)>();
    let mut handles = Vec::with_capacity(workers);
    for index in 0..workers {
        let tx = tx.clone();
        let stride = Stride::new(urls.clone(), index, workers);
        let blacklist = blacklist.clone();
        let global_opts = global_opts.clone();
        handles.push(thread::spawn(move || thread_spawn(tx, stride, blacklist, global_opts)));
    }
    drop(tx);

    for (url, result) in rx {
        log_probe_result(&url, &result);

        if !result.keyword_hits().is_empty() {
            if let Some(sources) = targets.get(&url) {
                backfill(file_set, sources);
            }
        }
        results.insert(url, result);
    }

    for handle in handles {
        if handle.join().is_err() {
            error!("A probing thread panicked, some links were not probed");
        }
    }

    results
}

#[cfg(feature = "probe")]
fn log_probe_result(url: &str, result: &ProbeResult) {
    match result {
        ProbeResult::Error(e) => {
            warn!("[probe failed] {} -> {}", url, e.error);
        }
        ProbeResult::Response(response) if !response.body_keyword_hits.is_empty() => {
            warn!("[keyword hit] {} -> {} hits: {}", url, response.status_code,
                response.body_keyword_hits.join(", "));
        }
        ProbeResult::Response(response) => {
            info!("[probe ok] {} -> {} {}", url, response.status_code, response.final_url);
        }
    }
}
