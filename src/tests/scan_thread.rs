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

use std::{fs, sync::Arc};
use pretty_assertions::assert_eq;
use crate::blacklist::Blacklist;
use crate::content_parse::Extractor;
use crate::scan_thread::{scan_files, Stride};
use crate::source_files::{collect_files, ExtensionFilter};

fn extractor() -> Arc<Extractor> {
    Arc::new(Extractor::new(Some("https://example.com"), Arc::new(Blacklist::builtin())))
}

#[test]
fn stride_visits_its_share() {
    let items = Arc::new((0..10).collect::<Vec<u32>>());

    let visited: Vec<(usize, u32)> = Stride::new(items.clone(), 1, 3).collect();
    assert_eq!(visited, vec![(1, 1), (4, 4), (7, 7)]);

    let mut covered: Vec<u32> = (0..3)
        .flat_map(|index| Stride::new(items.clone(), index, 3).map(|(_, item)| item))
        .collect();
    covered.sort();
    assert_eq!(covered, (0..10).collect::<Vec<u32>>());
}

#[test]
fn result_does_not_depend_on_worker_count() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..7 {
        let body = format!(
            "<a href=\"https://site{i}.test/\">{i}</a> <a href=\"/page/{i}\">p</a> casino{i}.com"
        );
        fs::write(dir.path().join(format!("page{}.html", i)), body).unwrap();
    }
    let files = collect_files(dir.path(), true, &ExtensionFilter::Default).unwrap();

    let single = scan_files(files.clone(), extractor(), 1);
    let several = scan_files(files.clone(), extractor(), 4);
    let too_many = scan_files(files, extractor(), 32);

    assert_eq!(single.len(), 7);
    assert_eq!(single, several);
    assert_eq!(single, too_many);
    assert!(single.values().all(|record| record.suspicious.len() == 1));
}

#[test]
fn unreadable_files_are_left_out() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.html");
    fs::write(&good, "<a href=\"https://other.test/\">x</a>").unwrap();
    let missing = dir.path().join("missing.html");

    let file_set = scan_files(vec![good.clone(), missing.clone()], extractor(), 2);

    assert_eq!(file_set.len(), 1);
    assert_eq!(file_set[&good].external, vec![String::from("https://other.test/")]);
    assert!(!file_set.contains_key(&missing));
}

#[test]
fn no_files_no_records() {
    assert!(scan_files(Vec::new(), extractor(), 4).is_empty());
}
