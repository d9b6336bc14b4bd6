use crate::actor::v2action::{ApplicationStateChange, LogMessage, MessageType, StartStreams};
use crate::command::{convert, Result};
use crate::error::Error;
use cfui::{Translatable, Ui};
use crossbeam_channel::{at, never, select, Receiver};
use std::time::{Duration, Instant};
use tracing::debug;

fn display_log(ui: &mut Ui, message: &LogMessage) -> Result {
    if message.staging() {
        ui.display_log_line(
            &message.header(),
            &message.message,
            message.message_type == MessageType::Err,
        )?;
    }
    Ok(())
}

/// Log stream failures never stop a start; they are shown as warnings.
fn display_log_error(ui: &mut Ui, err: Error) -> Result {
    let text = convert(err).translate(ui.translator());
    ui.display_warnings(&[text])?;
    Ok(())
}

fn display_state(ui: &mut Ui, change: ApplicationStateChange) -> Result {
    let text = match change {
        ApplicationStateChange::Stopping => "Stopping app...",
        ApplicationStateChange::Staging => "Staging app and tracing logs...",
        ApplicationStateChange::Starting => "Waiting for app to start...",
    };
    ui.display_new_line()?;
    ui.display_text(text, &[])?;
    Ok(())
}

/// Prints what the log stream still delivers within `window`.
fn flush_logs(
    ui: &mut Ui,
    mut messages: Option<Receiver<LogMessage>>,
    mut log_errs: Option<Receiver<Error>>,
    window: Duration,
) -> Result {
    let deadline = at(Instant::now() + window);
    while messages.is_some() || log_errs.is_some() {
        let messages_rx = messages.clone().unwrap_or_else(never);
        let log_errs_rx = log_errs.clone().unwrap_or_else(never);
        select! {
            recv(messages_rx) -> message => match message {
                Ok(message) => display_log(ui, &message)?,
                Err(_) => messages = None,
            },
            recv(log_errs_rx) -> err => match err {
                Ok(err) => display_log_error(ui, err)?,
                Err(_) => log_errs = None,
            },
            recv(deadline) -> _ => break,
        }
    }
    Ok(())
}

/// Drains a starting app's streams until the start worker is done.
///
/// Staging log lines go to stdout, warnings and log stream failures to stderr. The first
/// error from the worker stops the log stream and is returned. Otherwise, once the worker's
/// channels close, trailing log lines arriving within `flush_window` are printed before
/// the log stream is stopped.
pub fn poll_start(ui: &mut Ui, streams: StartStreams, flush_window: Duration) -> Result {
    let StartStreams {
        messages,
        log_errs,
        app_state,
        warnings,
        errs,
        mut stop,
    } = streams;

    let mut messages = Some(messages);
    let mut log_errs = Some(log_errs);
    let mut app_state = Some(app_state);
    let mut warnings = Some(warnings);
    let mut errs = Some(errs);

    while app_state.is_some() || warnings.is_some() || errs.is_some() {
        let messages_rx = messages.clone().unwrap_or_else(never);
        let log_errs_rx = log_errs.clone().unwrap_or_else(never);
        let app_state_rx = app_state.clone().unwrap_or_else(never);
        let warnings_rx = warnings.clone().unwrap_or_else(never);
        let errs_rx = errs.clone().unwrap_or_else(never);

        select! {
            recv(messages_rx) -> message => match message {
                Ok(message) => display_log(ui, &message)?,
                Err(_) => messages = None,
            },
            recv(log_errs_rx) -> err => match err {
                Ok(err) => display_log_error(ui, err)?,
                Err(_) => log_errs = None,
            },
            recv(app_state_rx) -> change => match change {
                Ok(change) => display_state(ui, change)?,
                Err(_) => app_state = None,
            },
            recv(warnings_rx) -> warning => match warning {
                Ok(warning) => ui.display_warnings(&[warning])?,
                Err(_) => warnings = None,
            },
            recv(errs_rx) -> err => match err {
                Ok(err) => {
                    debug!(error = %err, "start failed");
                    stop.stop();
                    return Err(convert(err));
                }
                Err(_) => errs = None,
            },
        }
    }

    flush_logs(ui, messages, log_errs, flush_window)?;
    stop.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::v2action::StopHandle;
    use crate::actor::ActionError;
    use crate::api::CcError;
    use crate::command::testing::ui;
    use crate::command::TranslatableError;
    use chrono::DateTime;
    use crossbeam_channel::unbounded;

    fn log(text: &str, source_type: &str) -> LogMessage {
        LogMessage {
            message: text.into(),
            timestamp: DateTime::from_timestamp_nanos(0),
            source_type: source_type.into(),
            source_instance: "0".into(),
            ..LogMessage::default()
        }
    }

    /// Streams whose senders have all been dropped after queueing the given items.
    fn streams(
        logs: Vec<LogMessage>,
        log_errors: Vec<Error>,
        states: Vec<ApplicationStateChange>,
        warning_texts: Vec<&str>,
        errors: Vec<Error>,
    ) -> StartStreams {
        fn queued<T>(items: Vec<T>) -> Receiver<T> {
            let (tx, rx) = unbounded();
            for item in items {
                tx.send(item).unwrap();
            }
            rx
        }
        let (stop, _) = StopHandle::new();
        StartStreams {
            messages: queued(logs),
            log_errs: queued(log_errors),
            app_state: queued(states),
            warnings: queued(warning_texts.into_iter().map(String::from).collect()),
            errs: queued(errors),
            stop,
        }
    }

    const WINDOW: Duration = Duration::from_millis(20);

    #[test]
    fn prints_staging_logs_states_and_warnings() {
        let (mut ui, out, err) = ui();
        let streams = streams(
            vec![log("log message 1", "STG"), log("app output", "APP"), log("log message 2", "STG")],
            vec![],
            vec![ApplicationStateChange::Staging, ApplicationStateChange::Starting],
            vec!["warning 1", "warning 2"],
            vec![],
        );

        poll_start(&mut ui, streams, WINDOW).unwrap();

        let out = out.contents();
        assert!(out.contains("log message 1"));
        assert!(out.contains("log message 2"));
        assert!(!out.contains("app output"));
        assert!(out.contains("\nStaging app and tracing logs...\n"));
        assert!(out.contains("\nWaiting for app to start...\n"));
        assert!(out.find("log message 1") < out.find("log message 2"));
        assert!(
            out.find("Staging app and tracing logs") < out.find("Waiting for app to start")
        );
        assert_eq!(err.contents(), "warning 1\nwarning 2\n");
    }

    #[test]
    fn log_cache_timeouts_become_warnings() {
        let (mut ui, out, err) = ui();
        let streams = streams(
            vec![log("message 1", "STG")],
            vec![ActionError::LogCacheTimeout.into()],
            vec![ApplicationStateChange::Starting],
            vec![],
            vec![],
        );

        poll_start(&mut ui, streams, WINDOW).unwrap();

        assert!(out.contents().contains("message 1"));
        assert_eq!(
            err.contents(),
            "timeout connecting to log server, no log will be shown\n"
        );
    }

    #[test]
    fn other_log_errors_print_and_polling_continues() {
        let (mut ui, out, err) = ui();
        let streams = streams(
            vec![],
            vec![CcError::Request {
                message: "banana".into(),
            }
            .into()],
            vec![ApplicationStateChange::Starting],
            vec![],
            vec![],
        );

        poll_start(&mut ui, streams, WINDOW).unwrap();

        assert!(err.contents().contains("banana"));
        assert!(out.contents().contains("Waiting for app to start..."));
    }

    #[test]
    fn the_first_start_error_is_returned_translated() {
        let (mut ui, _, _) = ui();
        let streams = streams(
            vec![],
            vec![],
            vec![],
            vec![],
            vec![ActionError::StagingFailed {
                reason: "Something, but not nothing".into(),
            }
            .into()],
        );

        let err = poll_start(&mut ui, streams, WINDOW).unwrap_err();
        assert!(matches!(
            err,
            TranslatableError::StagingFailed { ref message } if message == "Something, but not nothing"
        ));
    }

    #[test]
    fn crashes_are_unsuccessful_starts() {
        let (mut ui, _, _) = ui();
        let streams = streams(
            vec![],
            vec![],
            vec![ApplicationStateChange::Starting],
            vec![],
            vec![ActionError::ApplicationInstanceCrashed {
                name: "some-app".into(),
            }
            .into()],
        );

        let err = poll_start(&mut ui, streams, WINDOW).unwrap_err();
        assert!(matches!(
            err,
            TranslatableError::UnsuccessfulStart { ref app_name } if app_name == "some-app"
        ));
    }
}
