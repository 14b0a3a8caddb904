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
    path::PathBuf,
    sync::{Arc, mpsc},
    thread,
};
use log::{error, info, warn};
use crate::content_parse::{ExtractionRecord, Extractor, FileSet};
use crate::source_files;

// Walks a shared list starting at an offset, taking every step_size-th
// item, so that each worker gets its own disjoint slice of the work
pub struct Stride<T> {
    items: Arc<Vec<T>>,
    current_index: usize,
    step_size: usize,
}

impl<T> Stride<T> {
    pub fn new(items: Arc<Vec<T>>, index: usize, step: usize) -> Stride<T> {
        Stride {
            items,
            current_index: index,
            step_size: step.max(1),
        }
    }
}

impl<T: Clone> Iterator for Stride<T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get(self.current_index)?.clone();
        let index = self.current_index;
        self.current_index += self.step_size;
        Some((index, item))
    }
}

// Sent from a scanning thread for every file it was given
pub enum ScanMessage {
    Extracted {
        index: usize,
        path: PathBuf,
        record: ExtractionRecord,
    },
    Failed {
        index: usize,
        path: PathBuf,
        error: io::Error,
    },
}

pub fn thread_spawn(tx: mpsc::Sender<ScanMessage>, files: Stride<PathBuf>,
    extractor: Arc<Extractor>)
{
    for (index, path) in files {
        let message = match source_files::read_source(&path) {
            Ok(source) => ScanMessage::Extracted {
                index,
                record: extractor.extract(&source),
                path,
            },
            Err(error) => ScanMessage::Failed { index, path, error },
        };

        // The receiver only goes away if the collecting thread died
        if tx.send(message).is_err() {
            break;
        }
    }
}

/// Runs the extractor over every file using up to `workers` threads and
/// gathers the results by path. Files that can't be read are logged and
/// left out.
pub fn scan_files(files: Vec<PathBuf>, extractor: Arc<Extractor>, workers: usize) -> FileSet {
    let mut file_set = FileSet::new();
    let total = files.len();
    if total == 0 {
        return file_set;
    }

    let files = Arc::new(files);
    let workers = workers.clamp(1, total);
    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let mut handles = Vec::with_capacity(workers);
    for index in 0..workers {
        let tx = tx.clone();
        let stride = Stride::new(files.clone(), index, workers);
        let extractor = extractor.clone();
        handles.push(thread::spawn(move || thread_spawn(tx, stride, extractor)));
    }
    // Only the workers hold senders now, so the loop below ends with them
    drop(tx);

    for message in rx {
        match message {
            ScanMessage::Extracted { index, path, record } => {
                info!("[{}/{}] Processed: {}", index + 1, total, path.display());
                file_set.insert(path, record);
            }
            ScanMessage::Failed { index, path, error } => {
                warn!("[{}/{}] Error processing {}: {}", index + 1, total, path.display(), error);
            }
        }
    }

    for handle in handles {
        if handle.join().is_err() {
            error!("A scanning thread panicked, some files may be missing from the report");
        }
    }

    file_set
}
