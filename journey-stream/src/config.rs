// Copyright 2026 The Journey Stream Project
// SPDX-License-Identifier: Apache-2.0

// Segmenter configuration.
//
// This crate has no file or CLI surface of its own. The config struct
// is Deserialize so a host service can embed it in whatever config
// format it already loads.

use serde::Deserialize;

/// The marker the model emits inline as a channel-switch signal.
pub const DEFAULT_MARKER: &str = "BREAK_TOKEN";

/// Errors produced by config validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("marker must not be empty")]
    EmptyMarker,
}

/// Configuration for marker scanning, shared by every session a
/// registry creates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmenterConfig {
    /// The inline control marker to strip from visible output.
    /// Fixed at construction; never changes over a session's lifetime.
    #[serde(default = "default_marker")]
    pub marker: String,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

impl SegmenterConfig {
    /// Validate the config. An empty marker would make every position
    /// in the stream a match, so it is rejected up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(())
    }
}
