// Copyright 2026 The Journey Stream Project
// SPDX-License-Identifier: Apache-2.0

// Event sink abstraction.
//
// Delivery is the transport's concern. The emitter calls `deliver` once
// per event, in emission order, and treats any error as fatal for the
// stream: ordering cannot be guaranteed past a dropped event.

use crate::event::WireEvent;

/// Errors a sink implementation can surface.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SinkError {
    /// The consumer connection is gone.
    #[error("connection closed")]
    Closed,
    /// The transport failed to deliver.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Abstraction over the transport that carries events to the consumer
/// (e.g. a live connection).
///
/// Implementations must be Send + Sync so one sink can be shared across
/// sessions via `Arc`. Blocking, if any, happens here: a slow sink
/// backpressures the calling stream loop directly.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, event: WireEvent) -> Result<(), SinkError>;
}
