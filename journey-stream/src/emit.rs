// Event emitter and mode dispatch.
//
// Three emission modes share one sink contract:
// - streaming: drive a session's scanner over the classified source
//   stream, delivering visible content, marker events, and lifecycle
//   passthrough in emission order
// - whole-message: one already-complete text, raw or extracted from a
//   structured model result; never scanned for markers
// - informational: one structured payload, delivered unconditionally
//
// Delivery failure aborts the stream immediately. Ordering cannot be
// guaranteed past a dropped event, so nothing further is attempted.

use crate::event::{self, WireEvent};
use crate::segment::{MarkerScanner, SegmentEvent};
use crate::session::StreamSession;
use crate::sink::{EventSink, SinkError};
use crate::source::{self, SourceKind};
use serde_json::Value;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

/// Errors surfaced by emission.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EmitError {
    /// The sink failed to deliver. Propagated immediately; the caller
    /// is expected to tear the session down.
    #[error("sink delivery failed: {0}")]
    Sink(#[from] SinkError),
    /// A structured model result carried no text at the expected path.
    #[error("model output has no text at output.message.content[0].text")]
    MalformedModelOutput,
}

/// Counters for one streaming pump, reported when the stream completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Source events consumed, including ignored and dropped ones.
    pub source_events: u64,
    /// Visible content deltas delivered.
    pub content_deltas: u64,
    /// Marker occurrences delivered.
    pub markers: u64,
}

/// Emits wire events to an injected sink.
pub struct ResponseEmitter {
    sink: Arc<dyn EventSink>,
}

impl ResponseEmitter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Informational mode: wrap the payload into one `Info` event,
    /// bypassing the scanner and the whole-message path.
    pub async fn send_info(&self, payload: Value) -> Result<(), EmitError> {
        self.deliver(to_wire(SegmentEvent::Info(payload), None))
            .await
    }

    /// Whole-message mode with an already-complete raw string. Assumed
    /// marker-free: the marker is a streaming-only control signal.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), EmitError> {
        self.deliver(to_wire(SegmentEvent::WholeMessage(text.into()), None))
            .await
    }

    /// Whole-message mode with a structured model result. The text is
    /// extracted from `output.message.content[0].text`; a result
    /// missing that path is rejected rather than delivered corrupt.
    pub async fn send_model_output(&self, response: &Value) -> Result<(), EmitError> {
        let text = response
            .get("output")
            .and_then(|o| o.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .ok_or(EmitError::MalformedModelOutput)?;
        self.deliver(to_wire(SegmentEvent::WholeMessage(text.to_string()), None))
            .await
    }

    /// Streaming mode: consume the source stream, segment delta text
    /// through the session's scanner, and deliver wire events in
    /// emission order.
    ///
    /// The scanner lock is held for the whole pump, making `feed` calls
    /// strictly sequential for this session. The flush runs when the
    /// source signals stream end (`messageStop`), and again as a no-op
    /// safety net if the stream is exhausted without one.
    pub async fn stream_response<S>(
        &self,
        session: &StreamSession,
        mut events: S,
    ) -> Result<StreamStats, EmitError>
    where
        S: Stream<Item = Value> + Unpin,
    {
        let mut scanner = session.scanner().lock().await;
        let stream_id = Uuid::new_v4();
        let mut stats = StreamStats::default();

        while let Some(event) = events.next().await {
            stats.source_events += 1;
            match source::classify(&event) {
                SourceKind::Delta(envelope) => {
                    let text = source::delta_text(&envelope);
                    for seg in scanner.feed(text) {
                        self.deliver_segment(seg, Some(&envelope), &mut stats)
                            .await?;
                    }
                }
                SourceKind::Start(data) => {
                    if lifecycle_ok(&data, "role") {
                        self.deliver(to_wire(SegmentEvent::MessageStart(data), None))
                            .await?;
                    } else {
                        tracing::warn!(
                            session = %session.id(),
                            %stream_id,
                            "dropping malformed messageStart payload"
                        );
                    }
                }
                SourceKind::Stop(data) => {
                    // The end-of-stream signal arrived; resolve any
                    // pending partial match before the stop goes out.
                    self.flush_scanner(&mut scanner, &mut stats).await?;
                    if lifecycle_ok(&data, "stopReason") {
                        self.deliver(to_wire(SegmentEvent::MessageStop(data), None))
                            .await?;
                    } else {
                        tracing::warn!(
                            session = %session.id(),
                            %stream_id,
                            "dropping malformed messageStop payload"
                        );
                    }
                }
                SourceKind::Ignorable => {}
                SourceKind::Unknown => {
                    tracing::warn!(
                        session = %session.id(),
                        %stream_id,
                        event = %event,
                        "unhandled source event type"
                    );
                }
            }
        }

        // Truncated streams never see a messageStop; a trailing false
        // start must still surface. No-op after a clean stop.
        self.flush_scanner(&mut scanner, &mut stats).await?;

        tracing::info!(
            session = %session.id(),
            %stream_id,
            source_events = stats.source_events,
            content_deltas = stats.content_deltas,
            markers = stats.markers,
            "stream complete"
        );
        Ok(stats)
    }

    async fn flush_scanner(
        &self,
        scanner: &mut MarkerScanner,
        stats: &mut StreamStats,
    ) -> Result<(), EmitError> {
        for seg in scanner.flush_at_end() {
            self.deliver_segment(seg, None, stats).await?;
        }
        Ok(())
    }

    async fn deliver_segment(
        &self,
        seg: SegmentEvent,
        envelope: Option<&Value>,
        stats: &mut StreamStats,
    ) -> Result<(), EmitError> {
        match &seg {
            SegmentEvent::ContentDelta(_) => stats.content_deltas += 1,
            SegmentEvent::MarkerFound => stats.markers += 1,
            _ => {}
        }
        self.deliver(to_wire(seg, envelope)).await
    }

    async fn deliver(&self, event: WireEvent) -> Result<(), EmitError> {
        self.sink.deliver(event).await?;
        Ok(())
    }
}

/// Map a segment event to its wire shape. Content produced while
/// processing a delta travels in that delta's envelope; content flushed
/// at stream end has none and gets the minimal envelope.
fn to_wire(seg: SegmentEvent, envelope: Option<&Value>) -> WireEvent {
    match seg {
        SegmentEvent::ContentDelta(text) => match envelope {
            Some(envelope) => event::content_delta(envelope, &text),
            None => event::content_flush(&text),
        },
        SegmentEvent::MarkerFound => WireEvent::MarkerFound,
        SegmentEvent::MessageStart(data) => WireEvent::MessageStart { data },
        SegmentEvent::MessageStop(data) => WireEvent::MessageStop { data },
        SegmentEvent::WholeMessage(message) => WireEvent::WholeMessage { message },
        SegmentEvent::Info(data) => WireEvent::Info { data },
    }
}

/// A lifecycle payload must be an object carrying the field its
/// consumer dispatches on; anything else would corrupt the wire
/// contract and is dropped instead of forwarded.
fn lifecycle_ok(data: &Value, required: &str) -> bool {
    data.as_object().is_some_and(|obj| obj.contains_key(required))
}
