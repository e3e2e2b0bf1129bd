// Marker scanner
//
// Two logical states: Idle (pending buffer empty) and Pending (buffer
// holds a proper, non-empty prefix of the marker observed at the tail of
// processed input). A full match is resolved synchronously inside the
// `feed` call that completes it; there is no "matched" state.
//
// Correctness invariant: for any finite delta sequence whose
// concatenation is S, the concatenation of all emitted ContentDelta
// texts equals S with every non-overlapping, left-to-right marker
// occurrence removed, and the number of MarkerFound events equals the
// number of occurrences removed. A partial match that never completes is
// flushed as literal content at stream end, never dropped.

use super::types::SegmentEvent;

/// Single-pass scanner that separates visible text from inline marker
/// occurrences across arbitrary chunk boundaries.
///
/// One scanner exists per logical stream. Calls to `feed` must be
/// sequential and in delta arrival order; the pending buffer mutation is
/// not atomic across calls. Scanners for different streams share no
/// state.
#[derive(Debug, Clone)]
pub struct MarkerScanner {
    marker: String,
    /// Always a proper, non-empty prefix of `marker` while pending,
    /// empty while idle. Never equal to the full marker.
    pending: String,
}

impl MarkerScanner {
    /// Create a scanner for the given marker. The marker must be
    /// non-empty; `SegmenterConfig::validate` enforces this before any
    /// scanner is built.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            pending: String::new(),
        }
    }

    /// The marker this scanner strips.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// The buffered partial match, empty while idle. Exposed for
    /// diagnostics and tests.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Consume one delta and return the events it resolves, in emission
    /// order. Empty deltas are legal and produce no events.
    pub fn feed(&mut self, delta: &str) -> Vec<SegmentEvent> {
        let mut events = Vec::new();
        if delta.is_empty() {
            return events;
        }

        let mut window = std::mem::take(&mut self.pending);
        window.push_str(delta);

        // Extract every complete occurrence, leftmost first. No
        // backtracking once a full match is confirmed.
        while let Some(pos) = window.find(self.marker.as_str()) {
            if pos > 0 {
                events.push(SegmentEvent::ContentDelta(window[..pos].to_string()));
            }
            events.push(SegmentEvent::MarkerFound);
            window.drain(..pos + self.marker.len());
        }

        // Whatever remains holds no full occurrence. Retain the longest
        // suffix that is still a proper prefix of the marker; everything
        // before it is disambiguated visible text.
        let keep = self.longest_prefix_suffix(&window);
        let cut = window.len() - keep;
        if cut > 0 {
            let tail = window.split_off(cut);
            events.push(SegmentEvent::ContentDelta(window));
            window = tail;
        }
        self.pending = window;

        events
    }

    /// Flush the scanner when the chunk source signals a clean stream
    /// end. A buffered partial match was a false start: it is emitted as
    /// literal content. Calling again emits nothing (buffer already
    /// empty). An aborted stream skips this entirely; its buffer is
    /// discarded with the scanner.
    pub fn flush_at_end(&mut self) -> Vec<SegmentEvent> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let leftover = std::mem::take(&mut self.pending);
        tracing::warn!(
            prefix = %leftover,
            marker = %self.marker,
            "unterminated marker prefix at stream end, flushing as content"
        );
        vec![SegmentEvent::ContentDelta(leftover)]
    }

    /// Length of the longest suffix of `window` that is a proper prefix
    /// of the marker (0 if none). Candidate lengths are tested longest
    /// first so markers with internal repetition (e.g. "ABAB") match
    /// correctly; only char-boundary lengths of the marker are valid
    /// prefixes.
    fn longest_prefix_suffix(&self, window: &str) -> usize {
        let max = self.marker.len().saturating_sub(1).min(window.len());
        (1..=max)
            .rev()
            .filter(|&k| self.marker.is_char_boundary(k))
            .find(|&k| window.ends_with(&self.marker[..k]))
            .unwrap_or(0)
    }
}
