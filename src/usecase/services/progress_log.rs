use crate::domain::entities::log::{progress_for_message, LogEntry};
use crate::usecase::ports::stream::LogConnection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Listening,
    Terminated,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Appended { progress: u8 },
    Malformed,
    Ignored,
}

/// Log buffer and coarse progress of one processing run.
///
/// The reducer owns the run's connection. It is closed on transport error,
/// on `stop`, before a new run is installed, and when the reducer is dropped.
pub struct ProgressLogReducer<C: LogConnection> {
    state: RunState,
    run: RunId,
    entries: Vec<LogEntry>,
    progress: u8,
    dropped: usize,
    opened: bool,
    connection: Option<C>,
}

impl<C: LogConnection> Default for ProgressLogReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LogConnection> ProgressLogReducer<C> {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            run: RunId(0),
            entries: Vec::new(),
            progress: 0,
            dropped: 0,
            opened: false,
            connection: None,
        }
    }

    /// Reserves the id of the next run. Use it to tag the stream before
    /// handing the connection to `start_run`.
    pub fn next_run_id(&self) -> RunId {
        RunId(self.run.0 + 1)
    }

    pub fn start_run(&mut self, connection: C) -> RunId {
        self.close_connection();
        self.run = self.next_run_id();
        self.entries.clear();
        self.progress = 0;
        self.dropped = 0;
        self.opened = false;
        self.connection = Some(connection);
        self.state = RunState::Listening;
        tracing::info!(run = self.run.0, "log stream run started");
        self.run
    }

    /// The server accepted the stream request; the run counts as connected
    /// from here on.
    pub fn mark_opened(&mut self, run: RunId) {
        if !self.accepts(run) {
            return;
        }
        tracing::debug!(run = self.run.0, "log stream opened");
        self.opened = true;
    }

    pub fn on_message(&mut self, run: RunId, payload: &str) -> MessageOutcome {
        if !self.accepts(run) {
            return MessageOutcome::Ignored;
        }

        let entry: LogEntry = match serde_json::from_str(payload) {
            Ok(entry) => entry,
            Err(err) => {
                self.dropped += 1;
                tracing::warn!(run = self.run.0, error = %err, "dropping malformed log payload");
                return MessageOutcome::Malformed;
            }
        };

        // A later message may match a lower trigger; progress follows it.
        if let Some(percent) = progress_for_message(&entry.message) {
            self.progress = percent;
        }
        self.entries.push(entry);

        MessageOutcome::Appended {
            progress: self.progress,
        }
    }

    pub fn on_transport_error(&mut self, run: RunId) {
        if !self.accepts(run) {
            return;
        }
        tracing::warn!(run = self.run.0, "log stream disconnected");
        self.close_connection();
        self.state = RunState::Errored;
    }

    pub fn stop(&mut self) {
        if self.state != RunState::Listening {
            return;
        }
        tracing::info!(run = self.run.0, entries = self.entries.len(), "log stream run stopped");
        self.close_connection();
        self.state = RunState::Terminated;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == RunState::Listening && self.opened
    }

    /// Short connection status for the log panel indicator.
    pub fn status_label(&self) -> String {
        let status = match self.state() {
            RunState::Idle => "Idle",
            RunState::Listening if self.opened => "Connected",
            RunState::Listening => "Connecting",
            RunState::Terminated => "Stopped",
            RunState::Errored => "Disconnected",
        };
        match self.dropped() {
            0 => status.to_string(),
            1 => format!("{status} (1 malformed message skipped)"),
            count => format!("{status} ({count} malformed messages skipped)"),
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn accepts(&self, run: RunId) -> bool {
        self.state == RunState::Listening && run == self.run
    }

    fn close_connection(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}

impl<C: LogConnection> Drop for ProgressLogReducer<C> {
    fn drop(&mut self) {
        self.close_connection();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::entities::log::LogLevel;

    #[derive(Clone, Default)]
    struct FakeConnection {
        closes: Rc<Cell<usize>>,
    }

    impl FakeConnection {
        fn closes(&self) -> usize {
            self.closes.get()
        }
    }

    impl LogConnection for FakeConnection {
        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn payload(level: &str, message: &str) -> String {
        serde_json::json!({
            "level": level,
            "message": message,
            "timestamp": "2025-06-15T13:53:49Z",
        })
        .to_string()
    }

    #[test]
    fn pipeline_messages_advance_progress_in_order() {
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(FakeConnection::default());

        let trace: Vec<u8> = [
            "Starting OCR processing...",
            "Processing file: temp/ballot.pdf",
            "Compiling Voter Record Data...",
            "Matching petition signatures to voter records...",
            "OCR processing completed successfully",
        ]
        .iter()
        .map(|message| {
            reducer.on_message(run, &payload("info", message));
            reducer.progress()
        })
        .collect();

        assert_eq!(trace, vec![10, 30, 50, 70, 100]);
        assert_eq!(reducer.entries().len(), 5);
    }

    #[test]
    fn buffer_keeps_every_message_in_arrival_order() {
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(FakeConnection::default());

        for message in ["b", "a", "b", "b", "c"] {
            reducer.on_message(run, &payload("info", message));
        }

        let messages: Vec<&str> = reducer
            .entries()
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(messages, vec!["b", "a", "b", "b", "c"]);
    }

    #[test]
    fn unmatched_message_leaves_progress_alone() {
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(FakeConnection::default());

        reducer.on_message(run, &payload("info", "Processing file: x.pdf"));
        let outcome = reducer.on_message(run, &payload("warning", "No voter records file found."));

        assert_eq!(outcome, MessageOutcome::Appended { progress: 30 });
        assert_eq!(reducer.entries()[1].level, LogLevel::Warning);
    }

    #[test]
    fn progress_can_move_backwards() {
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(FakeConnection::default());

        reducer.on_message(run, &payload("info", "Matching petition signatures"));
        reducer.on_message(run, &payload("info", "Processing file: second.pdf"));

        assert_eq!(reducer.progress(), 30);
    }

    #[test]
    fn malformed_payload_is_dropped_and_stream_stays_open() {
        let connection = FakeConnection::default();
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(connection.clone());
        reducer.mark_opened(run);

        assert_eq!(reducer.on_message(run, "{not json"), MessageOutcome::Malformed);
        assert_eq!(
            reducer.on_message(run, r#"{"message": "no level"}"#),
            MessageOutcome::Malformed
        );
        reducer.on_message(run, &payload("info", "Starting OCR processing"));

        assert_eq!(reducer.dropped(), 2);
        assert_eq!(reducer.entries().len(), 1);
        assert!(reducer.is_connected());
        assert_eq!(connection.closes(), 0);
    }

    #[test]
    fn transport_error_closes_but_keeps_buffer() {
        let connection = FakeConnection::default();
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(connection.clone());
        reducer.on_message(run, &payload("info", "Starting OCR processing"));

        reducer.on_transport_error(run);

        assert_eq!(reducer.state(), RunState::Errored);
        assert!(!reducer.is_connected());
        assert_eq!(connection.closes(), 1);
        assert_eq!(reducer.entries().len(), 1);
        assert_eq!(reducer.progress(), 10);

        assert_eq!(
            reducer.on_message(run, &payload("info", "late")),
            MessageOutcome::Ignored
        );
        assert_eq!(reducer.entries().len(), 1);
    }

    #[test]
    fn stop_terminates_and_closes_once() {
        let connection = FakeConnection::default();
        let mut reducer = ProgressLogReducer::new();
        reducer.start_run(connection.clone());

        reducer.stop();
        reducer.stop();
        drop(reducer);

        assert_eq!(connection.closes(), 1);
    }

    #[test]
    fn new_run_closes_previous_connection_and_resets() {
        let first = FakeConnection::default();
        let second = FakeConnection::default();
        let mut reducer = ProgressLogReducer::new();
        let old_run = reducer.start_run(first.clone());
        reducer.on_message(old_run, &payload("info", "Processing file: a.pdf"));

        let new_run = reducer.start_run(second.clone());
        reducer.mark_opened(new_run);

        assert_eq!(first.closes(), 1);
        assert_eq!(second.closes(), 0);
        assert!(reducer.entries().is_empty());
        assert_eq!(reducer.progress(), 0);
        assert_ne!(old_run, new_run);

        assert_eq!(
            reducer.on_message(old_run, &payload("info", "stale")),
            MessageOutcome::Ignored
        );
        reducer.on_transport_error(old_run);
        assert!(reducer.is_connected());
    }

    #[test]
    fn dropping_reducer_closes_live_connection() {
        let connection = FakeConnection::default();
        let mut reducer = ProgressLogReducer::new();
        reducer.start_run(connection.clone());

        drop(reducer);

        assert_eq!(connection.closes(), 1);
    }

    #[test]
    fn run_is_connecting_until_stream_opens() {
        let mut reducer = ProgressLogReducer::new();
        let run = reducer.start_run(FakeConnection::default());

        assert_eq!(reducer.state(), RunState::Listening);
        assert!(!reducer.is_connected());
        assert_eq!(reducer.status_label(), "Connecting");

        reducer.mark_opened(run);
        assert!(reducer.is_connected());
        assert_eq!(reducer.status_label(), "Connected");

        reducer.on_message(run, "oops");
        reducer.on_transport_error(run);
        assert!(!reducer.is_connected());
        assert_eq!(
            reducer.status_label(),
            "Disconnected (1 malformed message skipped)"
        );

        let next = reducer.start_run(FakeConnection::default());
        reducer.mark_opened(run);
        assert!(!reducer.is_connected(), "a stale open must not mark the new run");
        reducer.mark_opened(next);
        assert!(reducer.is_connected());
    }

    #[test]
    fn idle_reducer_ignores_messages() {
        let mut reducer: ProgressLogReducer<FakeConnection> = ProgressLogReducer::new();
        let run = reducer.next_run_id();

        assert_eq!(reducer.state(), RunState::Idle);
        assert_eq!(
            reducer.on_message(run, &payload("info", "Starting OCR processing")),
            MessageOutcome::Ignored
        );
        assert_eq!(reducer.progress(), 0);
    }
}
