// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reloading song content.
//!
//! Modified song files are re-parsed after a quiet period and handed to the
//! frame loop, which swaps the new song in without stopping the engine.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use super::SongFile;

/// Events emitted by the song watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Song file was modified and successfully reloaded
    Reloaded(Box<SongFile>),
    /// Song file was modified but failed to parse
    Error(String),
    /// A new file was created in the watch directory
    FileCreated(PathBuf),
    /// A file was deleted from the watch directory
    FileDeleted(PathBuf),
}

/// Song file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new watcher for a song file or a directory of song files
    ///
    /// # Arguments
    /// * `path` - Path to watch (file or directory)
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let root = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let mut pending_paths: Vec<PathBuf> = Vec::new();

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => match event.kind {
                        EventKind::Create(_) => {
                            for path in event.paths {
                                let _ = event_tx.send(ConfigEvent::FileCreated(path));
                            }
                        }
                        EventKind::Remove(_) => {
                            for path in event.paths {
                                let _ = event_tx.send(ConfigEvent::FileDeleted(path));
                            }
                        }
                        EventKind::Modify(_) => {
                            for path in event.paths {
                                if !pending_paths.contains(&path) {
                                    pending_paths.push(path);
                                }
                            }
                            last_event_time = Some(Instant::now());
                        }
                        _ => {}
                    },
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let settled = last_event_time.is_some_and(|t| t.elapsed() >= debounce_duration);
                        if settled {
                            for path in pending_paths.drain(..) {
                                if is_song_path(&path, &root) {
                                    debug!(path = ?path, "reloading song file");
                                    let _ = event_tx.send(reload(&path));
                                }
                            }
                            last_event_time = None;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// YAML files, or the watched file itself whatever its extension
fn is_song_path(path: &Path, root: &Path) -> bool {
    match path.extension() {
        Some(ext) => ext == "yaml" || ext == "yml" || path == root,
        None => path == root,
    }
}

fn reload(path: &Path) -> ConfigEvent {
    match SongFile::load(path) {
        Ok(song) => ConfigEvent::Reloaded(Box::new(song)),
        Err(e) => ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e)),
    }
}

/// Validate a song file without applying it
pub fn validate_song_file<P: AsRef<Path>>(path: P) -> Result<SongFile> {
    let file = SongFile::load(path)?;
    file.clone().into_song()?;
    Ok(file)
}
