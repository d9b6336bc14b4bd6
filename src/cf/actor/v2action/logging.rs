use super::Actor;
use crate::actor::ActionError;
use crate::api::ccv2::CloudControllerV2;
use crate::api::logcache::{LogCacheClient, LogMessage};
use crate::error::Error;
use chrono::Utc;
use crossbeam_channel::{bounded, select, Receiver, RecvTimeoutError, Sender};
use std::thread::Scope;
use std::time::Duration;
use tracing::debug;

/// Consecutive failed reads after which the stream gives up.
pub const LOG_CACHE_RETRIES: usize = 5;

/// Stops a log stream. Dropping the handle stops it too; stopping twice is a no-op.
#[derive(Debug)]
pub struct StopHandle {
    tx: Option<Sender<()>>,
}

impl StopHandle {
    /// A handle and the receiver that disconnects once it is stopped.
    pub fn new() -> (Self, Receiver<()>) {
        let (tx, rx) = bounded(0);
        (Self { tx: Some(tx) }, rx)
    }

    pub fn stop(&mut self) {
        self.tx.take();
    }

    pub fn stopped(&self) -> bool {
        self.tx.is_none()
    }
}

/// Sends `value` unless the stream was stopped first. False means the consumer is gone.
fn forward<T>(tx: &Sender<T>, value: T, stop: &Receiver<()>) -> bool {
    select! {
        send(tx, value) -> res => res.is_ok(),
        recv(stop) -> _ => false,
    }
}

fn tail_logs<L: LogCacheClient>(
    client: &L,
    app_guid: &str,
    interval: Duration,
    messages: Sender<LogMessage>,
    errors: Sender<Error>,
    stop: Receiver<()>,
) {
    let mut start_time = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut failures = 0;

    loop {
        match client.read(app_guid, start_time) {
            Ok(batch) => {
                failures = 0;
                for message in batch {
                    start_time = start_time.max(message.nanos() + 1);
                    if !forward(&messages, message, &stop) {
                        return;
                    }
                }
            }
            Err(err) => {
                failures += 1;
                debug!(app_guid, failures, error = %err, "log cache read failed");
                if failures >= LOG_CACHE_RETRIES {
                    forward(&errors, Error::from(ActionError::LogCacheTimeout), &stop);
                    return;
                }
            }
        }

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            _ => return,
        }
    }
}

impl<C: CloudControllerV2> Actor<C> {
    /// Tails the app's logs on a thread of `scope` until the handle is stopped or dropped.
    /// Messages arrive oldest first and are never repeated.
    pub fn get_streaming_logs<'scope, 'env, L>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        app_guid: &str,
        client: &'env L,
        interval: Duration,
    ) -> (Receiver<LogMessage>, Receiver<Error>, StopHandle)
    where
        L: LogCacheClient + Sync,
    {
        let (message_tx, message_rx) = bounded(0);
        let (error_tx, error_rx) = bounded(0);
        let (handle, stop_rx) = StopHandle::new();
        let app_guid = app_guid.to_string();

        scope.spawn(move || tail_logs(client, &app_guid, interval, message_tx, error_tx, stop_rx));

        (message_rx, error_rx, handle)
    }
}
