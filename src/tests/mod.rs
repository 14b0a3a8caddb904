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
use log::LevelFilter::Info;
use crate::arg_parse::GlobalOpts;
use crate::source_files::ExtensionFilter;

mod blacklist;
mod scan_thread;

impl Default for GlobalOpts {
    fn default() -> Self {
        GlobalOpts {
            directory: PathBuf::from("."),
            base_domain: None,
            recursive: true,
            extension_filter: ExtensionFilter::Default,
            max_threads: 4,
            blacklist_file: None,
            probe: false,
            probe_timeout: Duration::from_secs(5),
            probe_workers: 8,
            max_body_bytes: 200_000,
            user_agent: "blackscan-tests".into(),
            output_file: None,
            json_file: None,
            is_terminal: false,
            no_color: true,
            log_level: Info,
            warnings: Vec::new(),
        }
    }
}
