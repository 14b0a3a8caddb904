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
    sync::{Arc, LazyLock},
};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use url::Url;
use crate::blacklist::Blacklist;
use crate::tld::KNOWN_TLDS;

// Patterns that yield link candidates. Where a pattern has a capture
// group the first group is the candidate, otherwise the whole match.
// Rust regexes have no lookbehind, so "not preceded by" conditions are
// written as a non-capturing prefix in front of group 1.
const LINK_PATTERNS: &[&str] = &[
    // Complete URLs
    r#"https?://[^\s"'<>)]+"#,
    // href/src/action attribute values, quoted and unquoted
    r#"href\s*=\s*["']([^"']+)["']"#,
    r#"href\s*=\s*([^\s>"'][^\s>]*)"#,
    r#"src\s*=\s*["']([^"']+)["']"#,
    r#"src\s*=\s*([^\s>"'][^\s>]*)"#,
    r#"action\s*=\s*["']([^"']+)["']"#,
    r#"action\s*=\s*([^\s>"'][^\s>]*)"#,
    r#"<link[^>]*href\s*=\s*["']([^"']+)["']"#,
    // Script navigation
    r#"location\s*[=:]\s*["']([^"']+)["']"#,
    r#"window\.open\(\s*["']([^"']+)["']"#,
    r#"window\.location\s*=\s*["']([^"']+)["']"#,
    // Protocol-relative, but not the // of a scheme
    r#"(?:^|[^:/])(//[^\s"'<>)]+)"#,
    // data-* attributes carrying absolute URLs
    r#"data-[a-z-]+\s*=\s*["'](https?://[^"']+)["']"#,
    // CSS url()
    r#"url\(\s*["']?([^"'()]+)["']?\s*\)"#,
    // fetch and ajax option objects
    r#"fetch\(\s*["']([^"']+)["']"#,
    r#"ajax\([^)]*url\s*:\s*["']([^"']+)["']"#,
    // Root-relative paths, not preceded by : or /
    r#"(?:^|[^:/])(/[a-z0-9][^\s"'<>)]*)"#,
];

// A zero CSS length or opacity, followed by something that ends the value
const ZERO: &str = r"0(?:\.0+)?(?:px|em|rem|%)?(?:[^0-9.a-z%>]|$)";

const HREF: &str = r#"href\s*=\s*["']([^"']+)["']"#;

static LINK_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LINK_PATTERNS.iter()
        .map(|pattern| case_insensitive(pattern))
        .collect()
});

// Inline styles that make an element invisible, each checked with the
// style before and after the href inside the same tag
static HIDDEN_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let styles = [
        String::from(r"display\s*:\s*none"),
        String::from(r"visibility\s*:\s*hidden"),
        format!(r"width\s*:\s*{ZERO}[^>]*height\s*:\s*{ZERO}"),
        format!(r"opacity\s*:\s*{ZERO}"),
    ];

    styles.iter()
        .flat_map(|style| [
            format!("{style}[^>]*{HREF}"),
            format!("{HREF}[^>]*{style}"),
        ])
        .map(|pattern| case_insensitive(&pattern))
        .collect()
});

// Whole-word DNS labels ending in a known TLD. ASCII word boundaries so
// that a domain directly next to CJK text is still found.
static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i-u)\b((?:[a-z0-9-]+\.)+(?:{}))\b", KNOWN_TLDS.join("|"));
    Regex::new(&pattern).expect("domain token pattern is valid")
});

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("link pattern is valid")
}

/// Everything found in a single file. The four link lists partition the
/// extracted links; domain tokens and suspicious entries may repeat them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    pub hidden: Vec<String>,
    pub external: Vec<String>,
    pub internal: Vec<String>,
    pub other: Vec<String>,
    pub domain_tokens: Vec<String>,
    pub suspicious: Vec<String>,
}

impl ExtractionRecord {
    // Adds an entry to the suspicious list keeping it sorted and unique
    pub fn add_suspicious(&mut self, value: &str) -> bool {
        match self.suspicious.binary_search_by(|s| s.as_str().cmp(value)) {
            Ok(_) => false,
            Err(index) => {
                self.suspicious.insert(index, String::from(value));
                true
            }
        }
    }
}

/// Records for every scanned file, keyed by absolute path
pub type FileSet = BTreeMap<PathBuf, ExtractionRecord>;

// The site a scan belongs to, used to tell internal from external links
#[derive(Debug, Clone)]
struct BaseDomain {
    prefix: String,
    host: Option<String>,
}

impl BaseDomain {
    fn parse(base_domain: &str) -> Option<BaseDomain> {
        let base_domain = base_domain.trim().trim_end_matches('/');
        if base_domain.is_empty() {
            return None;
        }

        // Bare hosts are treated as plain http sites
        let prefix = if base_domain.contains("://") {
            String::from(base_domain)
        } else {
            format!("http://{}", base_domain)
        };

        let host = Url::parse(&prefix).ok().and_then(|url| authority(&url));

        Some(BaseDomain { prefix, host })
    }
}

/// Extracts and classifies the links of one file. Built once per scan and
/// shared between the scanning threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    base: Option<BaseDomain>,
    blacklist: Arc<Blacklist>,
}

impl Extractor {
    pub fn new(base_domain: Option<&str>, blacklist: Arc<Blacklist>) -> Extractor {
        Extractor {
            base: base_domain.and_then(BaseDomain::parse),
            blacklist,
        }
    }

    pub fn extract(&self, source: &str) -> ExtractionRecord {
        let links = candidate_links(source);
        let hidden_links = hidden_links(source);
        let tokens = domain_tokens(source);

        let mut hidden = BTreeSet::new();
        let mut external = BTreeSet::new();
        let mut internal = BTreeSet::new();
        let mut other = BTreeSet::new();
        let mut suspicious = BTreeSet::new();

        for link in links {
            let resolved = self.resolve(&link);

            if self.blacklist.is_match(&resolved) {
                suspicious.insert(link.clone());
            }

            if hidden_links.contains(&link) {
                hidden.insert(link);
            }
            else if self.is_external(&resolved) {
                external.insert(link);
            }
            else if is_web_link(&resolved) {
                internal.insert(link);
            }
            else {
                other.insert(link);
            }
        }

        for token in &tokens {
            if self.blacklist.is_match(token) {
                suspicious.insert(token.clone());
            }
        }

        ExtractionRecord {
            hidden: hidden.into_iter().collect(),
            external: external.into_iter().collect(),
            internal: internal.into_iter().collect(),
            other: other.into_iter().collect(),
            domain_tokens: tokens.into_iter().collect(),
            suspicious: suspicious.into_iter().collect(),
        }
    }

    // Protocol-relative links become https, root-relative ones are joined
    // onto the base domain when there is one
    fn resolve(&self, link: &str) -> String {
        if link.starts_with("//") {
            return format!("https:{}", link);
        }
        match &self.base {
            Some(base) if link.starts_with('/') => format!("{}{}", base.prefix, link),
            _ => String::from(link),
        }
    }

    // Links whose host can't be parsed are never external
    fn is_external(&self, resolved: &str) -> bool {
        let Some(base_host) = self.base.as_ref().and_then(|base| base.host.as_deref()) else {
            return false;
        };
        if !has_http_scheme(resolved) {
            return false;
        }

        Url::parse(resolved).ok()
            .and_then(|url| authority(&url))
            .is_some_and(|host| host != base_host)
    }
}

/// Runs every link pattern over the text and returns the distinct,
/// trimmed candidates
pub fn candidate_links(source: &str) -> BTreeSet<String> {
    LINK_REGEXES.iter()
        .flat_map(|regex| captured_values(regex, source))
        .collect()
}

/// Hrefs of elements hidden by their inline style
pub fn hidden_links(source: &str) -> BTreeSet<String> {
    HIDDEN_REGEXES.iter()
        .flat_map(|regex| captured_values(regex, source))
        .collect()
}

/// Bare domain names appearing anywhere in the text, lower-cased
pub fn domain_tokens(source: &str) -> BTreeSet<String> {
    DOMAIN_REGEX.captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .map(|token| token.as_str().trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn captured_values(regex: &Regex, source: &str) -> Vec<String> {
    regex.captures_iter(source)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(0)))
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect()
}

fn has_http_scheme(link: &str) -> bool {
    let prefix: String = link.chars().take(8).collect::<String>().to_ascii_lowercase();
    prefix.starts_with("http://") || prefix.starts_with("https://")
}

fn is_web_link(link: &str) -> bool {
    has_http_scheme(link) || link.starts_with("//")
}

// Host plus any non-default port
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(String::from(host)),
    }
}
