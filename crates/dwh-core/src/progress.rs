//! Progress reporting for long-running task waits
//!
//! [`wait_for`] drives a [`FutureResult`] one poll step at a time,
//! emitting [`ProgressEvent`]s so callers can render spinners or log
//! lines without the wait loop knowing anything about presentation.

use std::time::{Duration, Instant};

use dwh_api::{FutureResult, PollHandler, PollStatus};
use tokio::time::sleep;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Default maximum time to wait for a task to resolve
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default delay between poll attempts
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(5);

/// Events emitted while waiting on an asynchronous task
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The wait loop has started
    Started { poll_uri: String },
    /// One poll attempt finished without resolving the task
    Polling { poll_uri: String, elapsed: Duration },
    /// The task resolved successfully
    Completed { poll_uri: String },
    /// The task resolved with a failure
    Failed { poll_uri: String, error: String },
}

/// Callback invoked with progress events during a wait
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

/// Wait for an asynchronous task to resolve, polling at `interval`
/// until `timeout` elapses.
///
/// A timeout leaves the task unresolved and returns
/// [`CoreError::TaskTimeout`]; the caller may wait again on the same
/// future. A resolved future replays its outcome without further
/// polling.
pub async fn wait_for<H: PollHandler>(
    future: &FutureResult<H>,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<H::Output> {
    let poll_uri = future.poll_uri().to_string();
    let start = Instant::now();

    emit(
        &on_progress,
        ProgressEvent::Started {
            poll_uri: poll_uri.clone(),
        },
    );

    loop {
        match future.poll_once().await {
            PollStatus::Pending => {
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    debug!("task {poll_uri} still pending after {elapsed:?}");
                    return Err(CoreError::TaskTimeout(timeout));
                }
                emit(
                    &on_progress,
                    ProgressEvent::Polling {
                        poll_uri: poll_uri.clone(),
                        elapsed,
                    },
                );
                sleep(interval).await;
            }
            PollStatus::Succeeded => {
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        poll_uri: poll_uri.clone(),
                    },
                );
                return Ok(future.get().await?);
            }
            PollStatus::Failed => {
                let outcome = future.get().await;
                let message = match &outcome {
                    Err(e) => e.to_string(),
                    Ok(_) => "task failed".to_string(),
                };
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        poll_uri: poll_uri.clone(),
                        error: message,
                    },
                );
                return Ok(outcome?);
            }
        }
    }
}
