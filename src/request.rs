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

use std::collections::BTreeMap;
use curl::easy::{Easy2, Handler, WriteError};
use encoding::{DecoderTrap, Encoding, all::UTF_8};
use crate::arg_parse::GlobalOpts;
use crate::blacklist::Blacklist;
use crate::probe_thread::{ProbeResponse, ProbeResult};

// Response headers worth showing in the report
pub const INTERESTING_HEADERS: &[&str] = &[
    "Server",
    "X-Powered-By",
    "Location",
    "Set-Cookie",
    "Content-Type",
    "Referrer-Policy",
    "Content-Security-Policy",
];

const MAX_REDIRECTS: u32 = 10;

// Gathers the body, up to a limit, and the headers of the last response
pub struct Collector {
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    pub truncated: bool,
    max_body_bytes: usize,
}

impl Collector {
    pub fn new(max_body_bytes: usize) -> Collector {
        Collector {
            body: Vec::new(),
            headers: Vec::new(),
            truncated: false,
            max_body_bytes,
        }
    }

    pub fn reset(&mut self) {
        self.body.clear();
        self.headers.clear();
        self.truncated = false;
    }
}

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        let room = self.max_body_bytes.saturating_sub(self.body.len());
        if data.len() > room {
            // Returning a short count makes curl abort the transfer
            self.body.extend_from_slice(&data[..room]);
            self.truncated = true;
            return Ok(room);
        }
        self.body.extend_from_slice(data);
        Ok(data.len())
    }

    fn header(&mut self, data: &[u8]) -> bool {
        let line = String::from_utf8_lossy(data);
        let line = line.trim_end();

        // Each response in a redirect chain starts with a status line,
        // only the final response's headers are kept
        if line.starts_with("HTTP/") {
            self.headers.clear();
        }
        else if let Some((name, value)) = line.split_once(':') {
            self.headers.push((String::from(name.trim()), String::from(value.trim())));
        }
        true
    }
}

// Creates a handle set up for probing untrusted hosts: redirects are
// followed and certificate problems are ignored
pub fn generate_easy(global_opts: &GlobalOpts) -> Result<Easy2<Collector>, curl::Error> {
    let mut easy = Easy2::new(Collector::new(global_opts.max_body_bytes));
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.ssl_verify_peer(false)?;
    easy.ssl_verify_host(false)?;
    easy.timeout(global_opts.probe_timeout)?;
    // Empty string offers every encoding curl can decode
    easy.accept_encoding("")?;
    easy.useragent(&global_opts.user_agent)?;
    Ok(easy)
}

/// Fetches a url and checks the start of its body against the blacklist
pub fn probe_url(easy: &mut Easy2<Collector>, url: &str, blacklist: &Blacklist) -> ProbeResult {
    easy.get_mut().reset();

    if let Err(e) = easy.url(url) {
        return ProbeResult::error(e.to_string());
    }

    if let Err(e) = easy.perform() {
        // Stopping at the body limit is not a failure
        if !(e.is_write_error() && easy.get_ref().truncated) {
            return ProbeResult::error(e.to_string());
        }
    }

    let status_code = match easy.response_code() {
        Ok(code) => code,
        Err(e) => return ProbeResult::error(e.to_string()),
    };

    let final_url = match easy.effective_url() {
        Ok(Some(effective)) => String::from(effective),
        _ => String::from(url),
    };

    let collector = easy.get_ref();
    let body = body_text(&collector.body);

    ProbeResult::Response(ProbeResponse {
        status_code,
        final_url,
        headers: interesting_headers(&collector.headers),
        body_keyword_hits: blacklist.keyword_hits(&body),
    })
}

// Decoded like source files, bytes that aren't UTF-8 are dropped
pub fn body_text(body: &[u8]) -> String {
    UTF_8.decode(body, DecoderTrap::Ignore).unwrap_or_default()
}

// Picks the allow-listed headers, matching names case-insensitively and
// joining repeated ones
pub fn interesting_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    let mut output = BTreeMap::new();

    for wanted in INTERESTING_HEADERS {
        let values: Vec<&str> = headers.iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, value)| value.as_str())
            .collect();

        if !values.is_empty() {
            output.insert(String::from(*wanted), values.join(", "));
        }
    }

    output
}
