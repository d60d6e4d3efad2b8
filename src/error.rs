// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for song content.

use thiserror::Error;

/// Errors raised while building a song from authored content.
///
/// Most integrity problems are reported as warnings and tolerated; only
/// content the engine cannot play at all ends up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SongError {
    /// The song references no music nodes
    #[error("song '{0}' has no music nodes")]
    EmptySong(String),
    /// A node references an instrument that is not declared
    #[error("node for section {section} in song '{song}' has an empty instrument name")]
    UnnamedInstrument { song: String, section: usize },
    /// A node's section index is beyond what a song may hold
    #[error("node for section {section} in song '{song}' is past the section limit of {limit}")]
    SectionOutOfRange { song: String, section: usize, limit: usize },
}
