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
    fs::File,
    io::{self, prelude::*},
    path::Path,
};
use chardet::{charset2encoding, detect};
use encoding::{DecoderTrap, label::encoding_from_whatwg_label};
use log::{debug, warn};

// Vocabulary commonly found in injected spam, gambling and fraud links
pub const BLACKLINK_KEYWORDS: &[&str] = &[
    "casino", "poker", "viagra", "cialis", "porn", "xxx", "sex",
    "gambling", "loan", "credit", "pharmacy", "pills",
    "博彩", "赌博", "色情", "成人", "贷款", "办证", "发票", "代开",
    "六合彩", "时时彩", "彩票", "私服", "外挂", "游戏币", "代理",
    "Telegram", "VPN", "区块链", "体育", "直播", "棋牌", "赌场",
    "娱乐城", "提款", "洗钱", "黑网", "黑产", "黑客", "破解", "木马",
    "病毒", "钓鱼", "诈骗",
];

/// Set of lower-cased keywords and domain fragments. A candidate is
/// blacklisted when it contains any of them as a plain substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    patterns: Vec<String>,
}

impl Blacklist {
    /// The built-in keyword list only
    pub fn builtin() -> Blacklist {
        let mut blacklist = Blacklist::default();
        blacklist.extend(BLACKLINK_KEYWORDS.iter().copied());
        blacklist
    }

    /// Built-in keywords merged with the patterns from an optional file.
    /// A file that can't be read is reported and otherwise ignored.
    pub fn load(extra_file: Option<&Path>) -> Blacklist {
        let mut blacklist = Blacklist::builtin();

        if let Some(path) = extra_file {
            match lines_from_file(path) {
                Ok(lines) => {
                    let added = blacklist.extend(pattern_lines(&lines));
                    debug!("Loaded {} new blacklist patterns from {}",
                        added, path.display());
                }
                Err(e) => {
                    warn!("Reading blacklist file \"{}\" failed: {}", path.display(), e);
                }
            }
        }

        blacklist
    }

    /// Adds a pattern, returns false if it was empty or already present
    pub fn add(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim().to_lowercase();
        if pattern.is_empty() || self.patterns.contains(&pattern) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    /// Adds each pattern in turn and returns how many were new
    pub fn extend<'a, I>(&mut self, patterns: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        patterns.into_iter()
            .filter(|pattern| self.add(pattern))
            .count()
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        let candidate = candidate.to_lowercase();
        self.patterns.iter().any(|pattern| candidate.contains(pattern.as_str()))
    }

    // Every pattern found in the text, sorted
    pub fn keyword_hits(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let mut hits: Vec<String> = self.patterns.iter()
            .filter(|pattern| text.contains(pattern.as_str()))
            .cloned()
            .collect();
        hits.sort();
        hits.dedup();
        hits
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

// Skips blank lines and # comments
fn pattern_lines(lines: &[String]) -> impl Iterator<Item = &str> {
    lines.iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

// Reads a line-delimited file in whatever charset it appears to use
fn lines_from_file(path: &Path) -> io::Result<Vec<String>> {
    let mut reader: Vec<u8> = Vec::new();
    File::open(path)?.read_to_end(&mut reader)?;

    // result.0 is the guessed charset
    let result = detect(&reader);

    let coder = encoding_from_whatwg_label(charset2encoding(&result.0))
        .unwrap_or(encoding::all::UTF_8);

    let decoded = coder.decode(&reader, DecoderTrap::Ignore)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.into_owned()))?;

    Ok(decoded.lines().map(String::from).collect())
}
