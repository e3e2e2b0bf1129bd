// Copyright 2026 The Journey Stream Project
// SPDX-License-Identifier: Apache-2.0

// Chunk source classification.
//
// The chunk source hands over an ordered stream of JSON events. Each
// event is a single-key object naming its kind; classification decides
// how the emitter handles it: scan the delta text, pass the lifecycle
// payload through, skip it, or warn.

use serde_json::Value;

/// Classification of one source event.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// A text fragment. Carries the full delta envelope so non-text
    /// fields survive re-emission.
    Delta(Value),
    /// Stream lifecycle start, payload passed through.
    Start(Value),
    /// Stream lifecycle end, payload passed through. Signals the
    /// segmenter flush before the stop event itself is delivered.
    Stop(Value),
    /// Known event kind with nothing to deliver (content block stops,
    /// usage metadata). Consumed without emission.
    Ignorable,
    /// Unrecognized shape. Logged and dropped by the emitter.
    Unknown,
}

/// Classify one event from the chunk source.
pub fn classify(event: &Value) -> SourceKind {
    let Some(obj) = event.as_object() else {
        return SourceKind::Unknown;
    };
    if let Some(delta) = obj.get("contentBlockDelta") {
        return SourceKind::Delta(delta.clone());
    }
    if let Some(start) = obj.get("messageStart") {
        return SourceKind::Start(start.clone());
    }
    if let Some(stop) = obj.get("messageStop") {
        return SourceKind::Stop(stop.clone());
    }
    if obj.contains_key("contentBlockStop") || obj.contains_key("metadata") {
        return SourceKind::Ignorable;
    }
    SourceKind::Unknown
}

/// Extract the text fragment from a delta envelope. A delta without a
/// text payload contributes nothing to the visible stream.
pub fn delta_text(envelope: &Value) -> &str {
    envelope
        .get("delta")
        .and_then(|d| d.get("text"))
        .and_then(Value::as_str)
        .unwrap_or("")
}
