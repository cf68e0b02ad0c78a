//! Poll-until-done driver for asynchronous API operations
//!
//! Mutating calls against the DWH API are asynchronous: the submit returns
//! a task envelope with a poll URI, and the real outcome is observed by
//! re-fetching that URI until it reports a terminal signal. This module
//! decouples "submit a long-running operation" from "wait for its result":
//!
//! - [`PollHandler`] is the per-operation policy object. It knows the poll
//!   location, when an observation is terminal, how to turn the terminal
//!   envelope into the final value (often one more fetch of an embedded
//!   resource URI), how to translate a failed poll into a domain error,
//!   and any post-condition to enforce on the produced value.
//! - [`FutureResult`] is the generic driver. It owns the three-state
//!   machine `Pending -> Succeeded | Failed`, polls at a bounded cadence,
//!   and exposes blocking ([`get`], [`get_within`]), non-blocking
//!   ([`is_done`]) and single-step ([`poll_once`]) access to the outcome.
//!
//! A resolved future replays the same outcome on every later call without
//! touching the transport again. A `get_within` timeout does not resolve
//! the future: the remote operation keeps running and a later `get` can
//! still succeed.
//!
//! [`get`]: FutureResult::get
//! [`get_within`]: FutureResult::get_within
//! [`is_done`]: FutureResult::is_done
//! [`poll_once`]: FutureResult::poll_once

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::client::{WarehouseClient, extract_error_message};
use crate::error::{ApiError, Result};

/// Default delay between poll attempts
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One observation obtained from the poll location: the raw protocol
/// status plus the body, whose shape may differ between in-progress and
/// terminal states.
#[derive(Debug, Clone)]
pub struct PollObservation {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl PollObservation {
    /// Deserialize the observation body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Err(ApiError::InvalidResponse(
                "empty poll response body".to_string(),
            ));
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::InvalidResponse(format!("poll response: {e}")))
    }

    /// Map an error-status observation to the matching [`ApiError`]
    pub(crate) fn to_error(&self) -> ApiError {
        ApiError::from_status(self.status, extract_error_message(self.status, &self.body))
    }
}

/// Per-operation polling policy
///
/// Implementations bind an envelope type (the body shape returned by the
/// poll location) and an output type (the caller-visible result, `()` for
/// delete-style operations).
#[async_trait]
pub trait PollHandler: Send + Sync {
    /// Body shape returned while polling and on completion
    type Envelope: DeserializeOwned + Send;

    /// Final caller-visible value. `Clone` because a resolved
    /// [`FutureResult`] hands the same value to every caller.
    type Output: Clone + Send + Sync;

    /// Fixed location to re-poll; immutable for the handler's lifetime
    fn poll_uri(&self) -> &str;

    /// Decide whether this observation is terminal. The default stops on
    /// `201 Created`; implementations may also recognize other signals,
    /// such as a terminal task state in the body.
    fn is_finished(&self, observation: &PollObservation) -> bool {
        observation.status == StatusCode::CREATED
    }

    /// Produce the final value from the terminal envelope. Invoked exactly
    /// once, when [`is_finished`](PollHandler::is_finished) first returns
    /// true. May perform a follow-up fetch of a resource URI embedded in
    /// the envelope; a missing URI or a failing fetch must yield a
    /// descriptive error, never a partial result.
    async fn on_success(&self, envelope: Self::Envelope) -> Result<Self::Output>;

    /// Translate a failed poll into the operation's domain error. Both
    /// transport failures and terminal error statuses funnel through this
    /// single hook; the driver stops polling afterwards either way.
    fn on_poll_error(&self, error: ApiError) -> ApiError {
        error
    }

    /// Post-condition check, invoked once after a successful result is
    /// produced and before it is surfaced.
    async fn on_finish(&self, _result: &Self::Output) -> Result<()> {
        Ok(())
    }
}

/// Terminal check shared by the concrete DWH operations: a poll is
/// finished on `201 Created`, or when the envelope body itself reports a
/// terminal task state under a non-terminal status.
///
/// Parses the body as a [`TaskEnvelope`](crate::models::TaskEnvelope) for
/// the state check; the driver parses the terminal body once more as the
/// handler's envelope type for `on_success`. At most one observation per
/// operation takes both parses.
pub fn task_finished(observation: &PollObservation) -> bool {
    if observation.status == StatusCode::CREATED {
        return true;
    }
    observation
        .json::<crate::models::TaskEnvelope>()
        .ok()
        .and_then(|envelope| envelope.state)
        .is_some_and(|state| state.is_finished())
}

/// Resolution state reported by [`FutureResult::poll_once`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Pending,
    Succeeded,
    Failed,
}

enum PollState<T> {
    Pending,
    Succeeded(T),
    Failed(ApiError),
}

/// Future-like handle to one in-flight asynchronous operation
///
/// Exactly one logical operation per instance. The state is guarded by a
/// mutex so concurrent callers observe a single authoritative resolution
/// and the terminal fetch side effects happen once.
pub struct FutureResult<H: PollHandler> {
    client: WarehouseClient,
    handler: H,
    interval: Duration,
    state: Mutex<PollState<H::Output>>,
}

impl<H: PollHandler> std::fmt::Debug for FutureResult<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FutureResult")
            .field("client", &self.client)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<H: PollHandler> FutureResult<H> {
    pub fn new(client: WarehouseClient, handler: H) -> Self {
        Self {
            client,
            handler,
            interval: DEFAULT_POLL_INTERVAL,
            state: Mutex::new(PollState::Pending),
        }
    }

    /// Delay between poll attempts (default 5s)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Location this future polls
    pub fn poll_uri(&self) -> &str {
        self.handler.poll_uri()
    }

    /// Drive the operation to completion and return its result. Resolved
    /// futures return the stored outcome without polling again.
    pub async fn get(&self) -> Result<H::Output> {
        self.drive(None).await
    }

    /// As [`get`](FutureResult::get), but give up with
    /// [`ApiError::PollTimeout`] once `timeout` elapses. The operation is
    /// not cancelled server-side and stays `Pending` here, so a later call
    /// can still resolve it.
    pub async fn get_within(&self, timeout: Duration) -> Result<H::Output> {
        self.drive(Some(timeout)).await
    }

    /// Perform at most one poll attempt and report the resolution state
    pub async fn poll_once(&self) -> PollStatus {
        let mut state = self.state.lock().await;
        if matches!(*state, PollState::Pending) {
            self.attempt(&mut state).await;
        }
        match *state {
            PollState::Pending => PollStatus::Pending,
            PollState::Succeeded(_) => PollStatus::Succeeded,
            PollState::Failed(_) => PollStatus::Failed,
        }
    }

    /// Non-blocking check: at most one poll attempt, true once the
    /// operation has resolved (successfully or not)
    pub async fn is_done(&self) -> bool {
        self.poll_once().await != PollStatus::Pending
    }

    async fn drive(&self, timeout: Option<Duration>) -> Result<H::Output> {
        let start = Instant::now();
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(outcome) = Self::outcome(&state) {
                    return outcome;
                }
                if let Some(timeout) = timeout
                    && start.elapsed() >= timeout
                {
                    debug!(
                        "gave up waiting for {} after {:?}",
                        self.handler.poll_uri(),
                        timeout
                    );
                    return Err(ApiError::PollTimeout(timeout));
                }
                self.attempt(&mut state).await;
                if let Some(outcome) = Self::outcome(&state) {
                    return outcome;
                }
            }
            // Lock released while waiting out the cadence; never sleep
            // past the deadline
            let pause = match timeout {
                Some(timeout) => self.interval.min(timeout.saturating_sub(start.elapsed())),
                None => self.interval,
            };
            tokio::time::sleep(pause).await;
        }
    }

    fn outcome(state: &PollState<H::Output>) -> Option<Result<H::Output>> {
        match state {
            PollState::Pending => None,
            PollState::Succeeded(value) => Some(Ok(value.clone())),
            PollState::Failed(error) => Some(Err(error.clone())),
        }
    }

    /// One poll attempt. The single place the state machine leaves
    /// `Pending`; callers hold the lock.
    async fn attempt(&self, state: &mut PollState<H::Output>) {
        let poll_uri = self.handler.poll_uri();
        trace!("polling {}", poll_uri);

        let resolution = match self.client.get_observation(poll_uri).await {
            Err(error) => Some(Err(self.handler.on_poll_error(error))),
            Ok(observation)
                if observation.status.is_client_error()
                    || observation.status.is_server_error() =>
            {
                Some(Err(self.handler.on_poll_error(observation.to_error())))
            }
            Ok(observation) if self.handler.is_finished(&observation) => {
                match observation.json::<H::Envelope>() {
                    Err(error) => Some(Err(self.handler.on_poll_error(error))),
                    Ok(envelope) => match self.handler.on_success(envelope).await {
                        Err(error) => Some(Err(error)),
                        Ok(output) => match self.handler.on_finish(&output).await {
                            Err(error) => Some(Err(error)),
                            Ok(()) => Some(Ok(output)),
                        },
                    },
                }
            }
            Ok(observation) => {
                trace!(
                    "operation at {} still pending (status {})",
                    poll_uri, observation.status
                );
                None
            }
        };

        match resolution {
            Some(Ok(output)) => {
                debug!("operation at {} succeeded", poll_uri);
                *state = PollState::Succeeded(output);
            }
            Some(Err(error)) => {
                debug!("operation at {} failed: {}", poll_uri, error);
                *state = PollState::Failed(error);
            }
            None => {}
        }
    }
}
