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

use std::{fs, time::Duration};
use pretty_assertions::assert_eq;
use crate::arg_parse::GlobalOpts;
use crate::blacklist::Blacklist;
use crate::probe_thread::ProbeResult;
use crate::request;
use crate::test_server::{self, SERVER_NAME};

fn probe(port: u16, page: &str, global_opts: &GlobalOpts) -> ProbeResult {
    let mut easy = request::generate_easy(global_opts).unwrap();
    request::probe_url(&mut easy, &test_server::url(port, page), &Blacklist::builtin())
}

#[test]
fn probe_finds_body_keywords() {
    let port = test_server::launch();
    let global_opts = GlobalOpts::default();

    let ProbeResult::Response(response) = probe(port, "offers", &global_opts) else {
        panic!("Probe of a running server failed");
    };

    assert_eq!(response.status_code, 200);
    assert_eq!(response.final_url, test_server::url(port, "offers"));
    assert_eq!(response.body_keyword_hits, vec![String::from("loan")]);
    assert_eq!(response.headers.get("Server").map(String::as_str), Some(SERVER_NAME));

    let ProbeResult::Response(response) = probe(port, "gone", &global_opts) else {
        panic!("Probe of a running server failed");
    };
    assert_eq!(response.status_code, 410);
    assert!(response.body_keyword_hits.is_empty());
}

#[test]
fn probe_follows_redirects() {
    let port = test_server::launch();

    let ProbeResult::Response(response) = probe(port, "redirect", &GlobalOpts::default()) else {
        panic!("Probe of a running server failed");
    };

    assert_eq!(response.status_code, 200);
    assert_eq!(response.final_url, test_server::url(port, "offers"));
    assert_eq!(response.body_keyword_hits, vec![String::from("loan")]);
    assert!(!response.headers.contains_key("Location"),
        "Headers come from the final response only");
}

#[test]
fn probe_body_limit() {
    let port = test_server::launch();
    let global_opts = GlobalOpts {
        max_body_bytes: 5,
        ..GlobalOpts::default()
    };

    // Only "Casin" is read
    let ProbeResult::Response(response) = probe(port, "promo", &global_opts) else {
        panic!("Stopping at the body limit is not a failure");
    };
    assert_eq!(response.status_code, 200);
    assert!(response.body_keyword_hits.is_empty());
}

#[test]
fn probe_connection_failure() {
    let global_opts = GlobalOpts {
        probe_timeout: Duration::from_secs(2),
        ..GlobalOpts::default()
    };
    let mut easy = request::generate_easy(&global_opts).unwrap();

    let result = request::probe_url(&mut easy, "http://127.0.0.1:1/", &Blacklist::builtin());

    assert!(matches!(result, ProbeResult::Error(_)), "{:?}", result);
}

#[test]
fn scan_and_probe() {
    let port = test_server::launch();
    let site = tempfile::tempdir().unwrap();
    let reports = tempfile::tempdir().unwrap();

    let offers = test_server::url(port, "offers");
    let clean = test_server::url(port, "clean");
    fs::write(site.path().join("index.html"), format!(
        "<a style=\"display:none\" href=\"{offers}\">x</a>\n<a href=\"{clean}\">ok</a>\n"
    )).unwrap();
    fs::write(site.path().join("about.html"), format!("<a href=\"{clean}\">ok</a>")).unwrap();

    let text_report = reports.path().join("report.txt");
    let json_report = reports.path().join("report.json");
    let global_opts = GlobalOpts {
        directory: site.path().to_path_buf(),
        base_domain: Some(String::from("https://example.com")),
        probe: true,
        output_file: Some(text_report.display().to_string()),
        json_file: Some(json_report.display().to_string()),
        ..GlobalOpts::default()
    };

    let (file_set, probe_results) = crate::blackscan_main(global_opts).unwrap();
    let probe_results = probe_results.unwrap();

    let index = file_set.iter()
        .find(|(path, _)| path.ends_with("index.html"))
        .map(|(_, record)| record)
        .unwrap();
    assert_eq!(index.hidden, vec![offers.clone()]);
    assert_eq!(index.external, vec![clean.clone()]);
    assert_eq!(index.suspicious, vec![offers.clone()], "The hidden link serves blacklisted content");

    let about = file_set.iter()
        .find(|(path, _)| path.ends_with("about.html"))
        .map(|(_, record)| record)
        .unwrap();
    assert!(about.suspicious.is_empty());

    assert_eq!(probe_results.len(), 2);
    assert_eq!(probe_results[&offers].keyword_hits(), ["loan"]);
    assert!(probe_results[&clean].keyword_hits().is_empty());

    let text = fs::read_to_string(&text_report).unwrap();
    let (_, probe_section) = text.split_once("HTTP probe results (grouped by URL)\n").unwrap();
    insta::with_settings!({
        filters => vec![
            (r"127\.0\.0\.1:[0-9]{1,5}", "127.0.0.1:[port]"),
        ]}, {
            insta::assert_snapshot!(probe_section.trim_end(), @r"
            ================================================================================
            URL: http://127.0.0.1:[port]/clean
              Status: 200
              Interesting headers:
                Content-Type: text/plain; charset=utf-8
                Server: blackscan-test
            --------------------------------------------------------------------------------

            URL: http://127.0.0.1:[port]/offers
              Status: 200
              Blacklist keywords in page: loan
              Interesting headers:
                Content-Type: text/plain; charset=utf-8
                Server: blackscan-test
            --------------------------------------------------------------------------------
            ");
    });

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_report).unwrap()).unwrap();
    assert_eq!(json["probe_results"][&offers]["body_keyword_hits"], serde_json::json!(["loan"]));
    assert_eq!(json["files"].as_object().unwrap().len(), 2);
}

#[test]
fn two_hitting_links_in_one_file() {
    let port = test_server::launch();
    let site = tempfile::tempdir().unwrap();

    let offers = test_server::url(port, "offers");
    let promo = test_server::url(port, "promo");
    let clean = test_server::url(port, "clean");
    fs::write(site.path().join("index.html"), format!(
        "<a href=\"{offers}\">a</a> <a href=\"{promo}\">b</a> <a href=\"{clean}\">c</a>"
    )).unwrap();

    let global_opts = GlobalOpts {
        directory: site.path().to_path_buf(),
        base_domain: Some(String::from("https://example.com")),
        probe: true,
        probe_workers: 3,
        ..GlobalOpts::default()
    };

    let (file_set, probe_results) = crate::blackscan_main(global_opts).unwrap();
    let probe_results = probe_results.unwrap();

    assert_eq!(probe_results.len(), 3);
    assert_eq!(probe_results[&offers].keyword_hits(), ["loan"]);
    assert_eq!(probe_results[&promo].keyword_hits(), ["casino", "poker"]);

    let record = file_set.values().next().unwrap();
    assert_eq!(record.external.len(), 3);
    assert_eq!(record.suspicious, vec![offers, promo],
        "Each link whose page hit is marked in the file");
}
