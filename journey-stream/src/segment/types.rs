// Copyright 2026 The Journey Stream Project
// SPDX-License-Identifier: Apache-2.0

// Segmentation event vocabulary.
//
// One tagged union covers everything the emitter can put on the wire.
// `MarkerScanner::feed`/`flush_at_end` produce only `ContentDelta` and
// `MarkerFound`; the lifecycle and passthrough variants are built by the
// emitter from source events and mode dispatch.

/// An event produced while segmenting a response.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEvent {
    /// Visible text to deliver. Concatenated across a stream, these
    /// reproduce the input byte-for-byte with every marker removed.
    ContentDelta(String),
    /// One complete marker occurrence was located. Carries no text.
    MarkerFound,
    /// Stream lifecycle start, passed through from the chunk source.
    MessageStart(serde_json::Value),
    /// Stream lifecycle end, passed through from the chunk source.
    MessageStop(serde_json::Value),
    /// A single already-complete text (non-streaming mode only).
    WholeMessage(String),
    /// An out-of-band structured notification. Never scanned for markers.
    Info(serde_json::Value),
}
