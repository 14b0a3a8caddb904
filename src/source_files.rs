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
    collections::BTreeSet,
    fs,
    io,
    path::{Path, PathBuf},
};
use encoding::{DecoderTrap, Encoding, all::UTF_8};
use log::warn;
use walkdir::WalkDir;

// Extensions scanned when none are given on the command line
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[
    // Web front end
    ".html", ".htm", ".xhtml", ".shtml", ".dhtml",
    ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs",
    ".css", ".scss", ".sass", ".less", ".styl", ".stylus",
    ".vue", ".svelte", ".astro",
    // Web back end
    ".php", ".php3", ".php4", ".php5", ".phtml",
    ".asp", ".aspx", ".ascx", ".ashx", ".asmx",
    ".jsp", ".jspx", ".jhtml",
    ".cgi", ".pl", ".pm",
    // Programming languages
    ".py", ".pyw", ".pyi", ".pyc",
    ".java", ".class", ".jar",
    ".c", ".h", ".cpp", ".cxx", ".cc", ".hpp", ".hxx",
    ".cs", ".vb", ".fs", ".fsx",
    ".go", ".rs",
    ".rb", ".rake", ".rbw",
    ".swift", ".kt", ".kts",
    ".scala", ".groovy",
    ".lua", ".r",
    // Scripts and configuration
    ".sh", ".bash", ".zsh", ".fish",
    ".bat", ".cmd", ".ps1", ".psm1",
    ".yaml", ".yml", ".toml", ".ini", ".cfg", ".conf", ".config",
    ".json", ".json5", ".jsonc",
    ".xml", ".xsl", ".xslt", ".xsd",
    // Templates
    ".tmpl", ".tpl", ".template",
    ".ejs", ".pug", ".jade", ".hbs", ".handlebars",
    ".erb", ".haml", ".slim",
    ".ftl", ".vm", ".twig",
    // Documentation
    ".md", ".markdown", ".mdown", ".mkd",
    ".rst", ".txt", ".text",
    ".adoc", ".asciidoc",
    // Data and the rest
    ".sql", ".db", ".sqlite",
    ".csv", ".tsv",
    ".log",
    ".env", ".env.local", ".env.production",
    ".properties", ".gradle", ".maven",
    ".dockerfile", ".makefile", ".cmake",
    ".htaccess", ".htpasswd", ".nginx",
];

/// Which files in the tree get scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    All,
    Default,
    Only(BTreeSet<String>),
}

impl ExtensionFilter {
    /// Builds a filter from a comma separated list such as "html,.php,JS"
    pub fn from_list(list: &str) -> ExtensionFilter {
        let extensions: BTreeSet<String> = list.split(',')
            .map(|extension| extension.trim().to_lowercase())
            .filter(|extension| !extension.is_empty() && extension != ".")
            .map(|extension| {
                if extension.starts_with('.') { extension }
                else { format!(".{}", extension) }
            })
            .collect();

        if extensions.is_empty() {
            ExtensionFilter::Default
        } else {
            ExtensionFilter::Only(extensions)
        }
    }

    // A name matches when it ends with one of the extensions, which also
    // covers dotfiles like .htaccess and compound ones like .env.local
    pub fn accepts(&self, file_name: &str) -> bool {
        let file_name = file_name.to_lowercase();
        match self {
            ExtensionFilter::All => true,
            ExtensionFilter::Default => DEFAULT_SOURCE_EXTENSIONS.iter()
                .any(|extension| file_name.ends_with(extension)),
            ExtensionFilter::Only(extensions) => extensions.iter()
                .any(|extension| file_name.ends_with(extension.as_str())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ExtensionFilter::All => String::from("all files"),
            ExtensionFilter::Default => format!("default extensions ({} types)",
                DEFAULT_SOURCE_EXTENSIONS.len()),
            ExtensionFilter::Only(extensions) => format!("extensions {}",
                extensions.iter().cloned().collect::<Vec<_>>().join(", ")),
        }
    }
}

/// Lists the eligible files below the root, sorted. Errors here mean the
/// root itself can't be used; unreadable entries inside it are skipped.
pub fn collect_files(root: &Path, recursive: bool, filter: &ExtensionFilter)
    -> io::Result<Vec<PathBuf>>
{
    let root = fs::canonicalize(root)?;
    if !root.is_dir() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput,
            format!("{} is not a directory", root.display())));
    }
    // Fail now rather than from inside the walk
    fs::read_dir(&root)?;

    let mut walker = WalkDir::new(&root);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && filter.accepts(&entry.file_name().to_string_lossy())
                {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!("Skipping entry during directory walk: {}", e),
        }
    }

    files.sort();
    Ok(files)
}

/// Reads a file as UTF-8, dropping any byte sequences that don't decode
pub fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    UTF_8.decode(&bytes, DecoderTrap::Ignore)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.into_owned()))
}
