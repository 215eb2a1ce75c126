use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::Task;
use dioxus::prelude::*;

use crate::infra::http::client::ApiClient;
use crate::usecase::ports::stream::LogConnection;
use crate::usecase::services::progress_log::ProgressLogReducer;

/// A spawned stream-reading task. Closing it cancels the task, which drops
/// the HTTP response and with it the connection.
pub struct TaskConnection {
    task: Task,
    finished: Rc<Cell<bool>>,
}

impl LogConnection for TaskConnection {
    fn close(&mut self) {
        if !self.finished.replace(true) {
            self.task.cancel();
        }
    }
}

/// Starts a new run on `logs` and spawns the task that feeds it. Any previous
/// run's connection is closed before the new one is installed.
pub fn start_log_stream(client: Arc<ApiClient>, mut logs: Signal<ProgressLogReducer<TaskConnection>>) {
    let run = logs.peek().next_run_id();
    let finished = Rc::new(Cell::new(false));
    let task_finished = finished.clone();

    let task = spawn(async move {
        let failure = match client.open_log_stream().await {
            Ok(mut stream) => {
                logs.write().mark_opened(run);
                loop {
                    match stream.next_event().await {
                        Ok(Some(payload)) => {
                            logs.write().on_message(run, &payload);
                        }
                        Ok(None) => break None,
                        Err(err) => break Some(err),
                    }
                }
            }
            Err(err) => Some(err),
        };

        match failure {
            Some(err) => tracing::warn!(error = %err, "log stream failed"),
            None => tracing::info!("log stream closed by server"),
        }
        // The task is ending on its own; nothing left to cancel.
        task_finished.set(true);
        logs.write().on_transport_error(run);
    });

    logs.write().start_run(TaskConnection { task, finished });
}
