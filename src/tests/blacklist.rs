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

use std::io::Write;
use pretty_assertions::assert_eq;
use crate::blacklist::{Blacklist, BLACKLINK_KEYWORDS};

#[test]
fn builtin_patterns_are_lowercase() {
    let blacklist = Blacklist::builtin();

    assert_eq!(blacklist.len(), BLACKLINK_KEYWORDS.len());
    assert!(blacklist.patterns().contains(&String::from("telegram")));
    assert!(blacklist.patterns().contains(&String::from("vpn")));
    assert!(!blacklist.patterns().contains(&String::from("VPN")));
}

#[test]
fn add_ignores_duplicates_and_blanks() {
    let mut blacklist = Blacklist::default();

    assert!(blacklist.add("Casino"));
    assert!(!blacklist.add("  casino "), "Patterns differing only in case or padding are duplicates");
    assert!(!blacklist.add("   "));
    assert_eq!(blacklist.extend(["loan", "LOAN", "poker"]), 2);
    assert_eq!(blacklist.patterns(), ["casino", "loan", "poker"]);
}

#[test]
fn matching_is_a_case_insensitive_substring_test() {
    let blacklist = Blacklist::builtin();

    assert!(blacklist.is_match("http://MyCasinoSite.com/"));
    assert!(blacklist.is_match("https://example.com/贷款/apply"));
    assert!(!blacklist.is_match("https://example.com/about"));
    assert!(!blacklist.is_match(""));
}

#[test]
fn keyword_hits_are_sorted() {
    let mut blacklist = Blacklist::default();
    blacklist.extend(["poker", "casino", "loan"]);

    assert_eq!(
        blacklist.keyword_hits("Best POKER and Casino bonuses"),
        vec![String::from("casino"), String::from("poker")],
    );
    assert!(blacklist.keyword_hits("Nothing to see here").is_empty());
}

#[test]
fn load_merges_file_patterns() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "CeShi.xyz\n# note\n\n  casino  \nCESHI.XYZ\n").unwrap();

    let blacklist = Blacklist::load(Some(file.path()));

    assert_eq!(blacklist.len(), BLACKLINK_KEYWORDS.len() + 1);
    assert!(blacklist.patterns().contains(&String::from("ceshi.xyz")));
    assert!(!blacklist.patterns().iter().any(|p| p.starts_with('#')),
        "Comment lines must not become patterns");
    assert!(blacklist.is_match("http://www.ceshi.xyz/index"));
}

#[test]
fn load_falls_back_to_builtin_when_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    assert_eq!(Blacklist::load(Some(&missing)), Blacklist::builtin());
    assert_eq!(Blacklist::load(None), Blacklist::builtin());
}
