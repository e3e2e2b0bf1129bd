// Copyright 2026 The Journey Stream Project
// SPDX-License-Identifier: Apache-2.0

// Wire event shapes.
//
// Field names here are contractual: the consumer on the other side of
// the sink dispatches on them. `ContentDelta` re-emits the originating
// delta envelope with only the text replaced, so provider metadata
// (block indices, delta siblings) survives marker trimming untouched.

use serde_json::{json, Map, Value};

/// One wire-ready event, delivered to the sink exactly once, in
/// emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum WireEvent {
    /// Visible text inside its (possibly trimmed) delta envelope.
    ContentDelta { data: Value },
    /// A marker occurrence. Carries no payload.
    MarkerFound,
    /// Lifecycle start passthrough.
    MessageStart { data: Value },
    /// Lifecycle end passthrough.
    MessageStop { data: Value },
    /// A complete response in non-streaming mode.
    WholeMessage { message: String },
    /// An out-of-band structured notification.
    Info { data: Value },
}

impl WireEvent {
    /// Serialize to the wire JSON shape.
    pub fn to_json(&self) -> Value {
        match self {
            WireEvent::ContentDelta { data } => {
                json!({"type": "contentBlockDelta", "data": data})
            }
            WireEvent::MarkerFound => json!({"type": "breakTokenType"}),
            WireEvent::MessageStart { data } => json!({"type": "messageStart", "data": data}),
            WireEvent::MessageStop { data } => json!({"type": "messageStop", "data": data}),
            WireEvent::WholeMessage { message } => json!({"message": message}),
            WireEvent::Info { data } => json!({"type": "info", "data": data}),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            WireEvent::ContentDelta { .. } => "contentBlockDelta",
            WireEvent::MarkerFound => "breakTokenType",
            WireEvent::MessageStart { .. } => "messageStart",
            WireEvent::MessageStop { .. } => "messageStop",
            WireEvent::WholeMessage { .. } => "message",
            WireEvent::Info { .. } => "info",
        }
    }
}

/// Splice visible text into a delta envelope. Every field of the
/// envelope and of its `delta` object is preserved except `delta.text`,
/// which is replaced by the trimmed fragment.
pub fn content_delta(envelope: &Value, text: &str) -> WireEvent {
    let mut data = match envelope.as_object() {
        Some(map) => map.clone(),
        None => Map::new(),
    };
    let mut delta = match data.get("delta").and_then(Value::as_object) {
        Some(map) => map.clone(),
        None => Map::new(),
    };
    delta.insert("text".to_string(), Value::String(text.to_string()));
    data.insert("delta".to_string(), Value::Object(delta));
    WireEvent::ContentDelta {
        data: Value::Object(data),
    }
}

/// Envelope for text flushed at stream end. A false start has no
/// originating delta, so it travels in a minimal envelope.
pub fn content_flush(text: &str) -> WireEvent {
    WireEvent::ContentDelta {
        data: json!({"delta": {"text": text}}),
    }
}
