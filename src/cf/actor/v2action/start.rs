use super::logging::StopHandle;
use super::{Actor, Application, ApplicationState};
use crate::actor::ActionError;
use crate::api::ccv2::{ApplicationUpdate, CloudControllerV2, InstanceState, PackageState};
use crate::api::logcache::{LogCacheClient, LogMessage};
use crate::error::Error;
use crate::warnings::Warnings;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, Scope};
use std::time::{Duration, Instant};

/// Lifecycle transitions reported while an app starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStateChange {
    Stopping,
    Staging,
    Starting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingSettings {
    pub staging_timeout: Duration,
    pub startup_timeout: Duration,
    pub polling_interval: Duration,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            staging_timeout: Duration::from_secs(15 * 60),
            startup_timeout: Duration::from_secs(5 * 60),
            polling_interval: Duration::from_secs(3),
        }
    }
}

/// Everything a caller drains while an app starts.
///
/// `app_state`, `warnings` and `errs` close when the start worker finishes; `messages` and
/// `log_errs` stay open until `stop` is called or dropped.
pub struct StartStreams {
    pub messages: Receiver<LogMessage>,
    pub log_errs: Receiver<Error>,
    pub app_state: Receiver<ApplicationStateChange>,
    pub warnings: Receiver<String>,
    pub errs: Receiver<Error>,
    pub stop: StopHandle,
}

struct Outbox {
    app_state: Sender<ApplicationStateChange>,
    warnings: Sender<String>,
    errs: Sender<Error>,
}

/// The consumer hung up.
struct Gone;

impl Outbox {
    fn state(&self, change: ApplicationStateChange) -> Result<(), Gone> {
        self.app_state.send(change).map_err(|_| Gone)
    }

    fn warnings(&self, warnings: Warnings) -> Result<(), Gone> {
        for warning in warnings {
            self.warnings.send(warning).map_err(|_| Gone)?;
        }
        Ok(())
    }

    fn fail(&self, error: impl Into<Error>) {
        // Nobody left to tell.
        let _ = self.errs.send(error.into());
    }
}

impl<C: CloudControllerV2> Actor<C> {
    /// Starts `app` and streams its progress. The work runs on threads of `scope`, so the
    /// caller must drain the returned channels before the scope ends.
    pub fn start_application<'scope, 'env, L>(
        &'env self,
        scope: &'scope Scope<'scope, 'env>,
        app: Application,
        log_client: &'env L,
        settings: PollingSettings,
    ) -> StartStreams
    where
        C: Sync,
        L: LogCacheClient + Sync,
    {
        let (messages, log_errs, stop) =
            self.get_streaming_logs(scope, &app.guid, log_client, settings.polling_interval);

        let (state_tx, app_state) = bounded(0);
        let (warnings_tx, warnings) = bounded(0);
        let (errs_tx, errs) = bounded(0);
        let outbox = Outbox {
            app_state: state_tx,
            warnings: warnings_tx,
            errs: errs_tx,
        };

        scope.spawn(move || {
            // Gone means the consumer stopped listening; there is nothing left to do.
            let _ = self.run_start(&app, &settings, &outbox);
        });

        StartStreams {
            messages,
            log_errs,
            app_state,
            warnings,
            errs,
            stop,
        }
    }

    fn run_start(
        &self,
        app: &Application,
        settings: &PollingSettings,
        outbox: &Outbox,
    ) -> Result<(), Gone> {
        if !app.staged() {
            outbox.state(ApplicationStateChange::Staging)?;
        }

        let update = ApplicationUpdate {
            state: Some(ApplicationState::Started),
            ..ApplicationUpdate::default()
        };
        let (result, warnings) = self.client.update_application(&app.guid, &update).into_parts();
        outbox.warnings(warnings)?;
        if let Err(err) = result {
            outbox.fail(err);
            return Ok(());
        }

        if let Err(err) = self.poll_staging(app, settings, outbox)? {
            outbox.fail(err);
            return Ok(());
        }

        if app.instances == Some(0) {
            return Ok(());
        }

        outbox.state(ApplicationStateChange::Starting)?;

        if let Err(err) = self.poll_startup(app, settings, outbox)? {
            outbox.fail(err);
        }
        Ok(())
    }

    fn poll_staging(
        &self,
        app: &Application,
        settings: &PollingSettings,
        outbox: &Outbox,
    ) -> Result<Result<(), Error>, Gone> {
        let started = Instant::now();
        while started.elapsed() < settings.staging_timeout {
            let (result, warnings) = self.client.get_application(&app.guid).into_parts();
            outbox.warnings(warnings)?;
            let current = match result {
                Ok(current) => current,
                Err(err) => return Ok(Err(err.into())),
            };

            match current.package_state {
                PackageState::Staged => return Ok(Ok(())),
                PackageState::Failed => {
                    let error = if current.staging_failed_reason == "NoAppDetectedError" {
                        ActionError::StagingFailedNoAppDetected {
                            reason: current.staging_failed_description,
                        }
                    } else {
                        ActionError::StagingFailed {
                            reason: current.staging_failed_description,
                        }
                    };
                    return Ok(Err(error.into()));
                }
                _ => thread::sleep(settings.polling_interval),
            }
        }

        Ok(Err(ActionError::StagingTimeout {
            app_name: app.name.clone(),
            timeout: settings.staging_timeout,
        }
        .into()))
    }

    fn poll_startup(
        &self,
        app: &Application,
        settings: &PollingSettings,
        outbox: &Outbox,
    ) -> Result<Result<(), Error>, Gone> {
        let started = Instant::now();
        while started.elapsed() < settings.startup_timeout {
            let (result, warnings) = self.client.get_application_instances(&app.guid).into_parts();
            outbox.warnings(warnings)?;
            let instances = match result {
                Ok(instances) => instances,
                Err(err) => return Ok(Err(err.into())),
            };

            for instance in &instances {
                match instance.state {
                    InstanceState::Running => return Ok(Ok(())),
                    InstanceState::Crashed => {
                        return Ok(Err(ActionError::ApplicationInstanceCrashed {
                            name: app.name.clone(),
                        }
                        .into()))
                    }
                    InstanceState::Flapping => {
                        return Ok(Err(ActionError::ApplicationInstanceFlapping {
                            name: app.name.clone(),
                        }
                        .into()))
                    }
                    _ => {}
                }
            }

            thread::sleep(settings.polling_interval);
        }

        Ok(Err(ActionError::StartupTimeout {
            name: app.name.clone(),
        }
        .into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ccv2::ApplicationInstance;
    use crate::api::fakes::{FakeCloudControllerV2, FakeLogCacheClient};
    use crate::api::CcError;
    use crate::warnings::Warned;
    use crossbeam_channel::never;

    fn quick() -> PollingSettings {
        PollingSettings {
            staging_timeout: Duration::from_secs(5),
            startup_timeout: Duration::from_secs(5),
            polling_interval: Duration::from_millis(1),
        }
    }

    fn app(package_state: PackageState, instances: Option<u32>) -> Application {
        Application {
            guid: "app-guid".into(),
            name: "dora".into(),
            package_state,
            instances,
            ..Application::default()
        }
    }

    fn with_package_state(state: PackageState) -> Warned<Application, CcError> {
        Warned::ok(
            Application {
                package_state: state,
                ..Application::default()
            },
            Warnings::from_strs(&["app-warning"]),
        )
    }

    fn instances(states: &[InstanceState]) -> Warned<Vec<ApplicationInstance>, CcError> {
        Warned::ok(
            states
                .iter()
                .enumerate()
                .map(|(id, state)| ApplicationInstance {
                    id,
                    state: *state,
                    ..ApplicationInstance::default()
                })
                .collect(),
            Warnings::from_strs(&["instances-warning"]),
        )
    }

    #[derive(Debug, Default)]
    struct Drained {
        states: Vec<ApplicationStateChange>,
        warnings: Vec<String>,
        errors: Vec<String>,
    }

    /// Drains the worker's channels until all three close.
    fn drain(streams: StartStreams) -> Drained {
        let mut out = Drained::default();
        let mut state = Some(streams.app_state.clone());
        let mut warnings = Some(streams.warnings.clone());
        let mut errs = Some(streams.errs.clone());
        while state.is_some() || warnings.is_some() || errs.is_some() {
            let state_rx = state.clone().unwrap_or_else(never);
            let warnings_rx = warnings.clone().unwrap_or_else(never);
            let errs_rx = errs.clone().unwrap_or_else(never);
            crossbeam_channel::select! {
                recv(state_rx) -> msg => match msg {
                    Ok(change) => out.states.push(change),
                    Err(_) => state = None,
                },
                recv(warnings_rx) -> msg => match msg {
                    Ok(warning) => out.warnings.push(warning),
                    Err(_) => warnings = None,
                },
                recv(errs_rx) -> msg => match msg {
                    Ok(err) => out.errors.push(err.to_string()),
                    Err(_) => errs = None,
                },
            }
        }
        out
    }

    fn run(
        fake: &FakeCloudControllerV2,
        app: Application,
        settings: PollingSettings,
    ) -> Drained {
        let logs = FakeLogCacheClient::default();
        let actor = Actor::new(fake);
        thread::scope(|s| {
            let streams = actor.start_application(s, app, &logs, settings);
            drain(streams)
        })
    }

    #[test]
    fn stages_then_starts() {
        let fake = FakeCloudControllerV2::default();
        fake.update_application
            .returns(Warned::ok(Application::default(), Warnings::from_strs(&["update-warning"])));
        fake.get_application.returns_in_order(vec![
            with_package_state(PackageState::Pending),
            with_package_state(PackageState::Staged),
        ]);
        fake.get_application_instances.returns_in_order(vec![
            instances(&[InstanceState::Starting]),
            instances(&[InstanceState::Starting, InstanceState::Running]),
        ]);

        let out = run(&fake, app(PackageState::Pending, Some(2)), quick());

        assert_eq!(
            out.states,
            vec![ApplicationStateChange::Staging, ApplicationStateChange::Starting]
        );
        assert_eq!(
            out.warnings,
            vec![
                "update-warning",
                "app-warning",
                "app-warning",
                "instances-warning",
                "instances-warning"
            ]
        );
        assert!(out.errors.is_empty());

        let (guid, update) = fake.update_application.args_for_call(0);
        assert_eq!(guid, "app-guid");
        assert_eq!(update.state, Some(ApplicationState::Started));
    }

    #[test]
    fn already_staged_app_skips_the_staging_state() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application
            .returns(with_package_state(PackageState::Staged));
        fake.get_application_instances
            .returns(instances(&[InstanceState::Running]));

        let out = run(&fake, app(PackageState::Staged, Some(1)), quick());
        assert_eq!(out.states, vec![ApplicationStateChange::Starting]);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn zero_instances_returns_after_staging() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application
            .returns(with_package_state(PackageState::Staged));

        let out = run(&fake, app(PackageState::Staged, Some(0)), quick());
        assert!(out.states.is_empty());
        assert!(out.errors.is_empty());
        assert_eq!(fake.get_application_instances.call_count(), 0);
    }

    #[test]
    fn update_failure_is_reported_and_stops_the_worker() {
        let fake = FakeCloudControllerV2::default();
        fake.update_application.returns(Warned::err(
            CcError::Forbidden {
                message: "no".into(),
            },
            Warnings::from_strs(&["update-warning"]),
        ));

        let out = run(&fake, app(PackageState::Staged, Some(1)), quick());
        assert_eq!(out.warnings, vec!["update-warning"]);
        assert_eq!(out.errors, vec!["Forbidden: no"]);
        assert_eq!(fake.get_application.call_count(), 0);
    }

    #[test]
    fn staging_failure_carries_the_description() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application.returns(Warned::ok(
            Application {
                package_state: PackageState::Failed,
                staging_failed_reason: "BuildpackCompileFailed".into(),
                staging_failed_description: "compile failed".into(),
                ..Application::default()
            },
            Warnings::new(),
        ));

        let out = run(&fake, app(PackageState::Pending, Some(1)), quick());
        assert_eq!(out.states, vec![ApplicationStateChange::Staging]);
        assert_eq!(out.errors, vec!["staging failed: compile failed"]);
    }

    #[test]
    fn no_app_detected_is_its_own_error() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application.returns(Warned::ok(
            Application {
                package_state: PackageState::Failed,
                staging_failed_reason: "NoAppDetectedError".into(),
                staging_failed_description: "no buildpack".into(),
                ..Application::default()
            },
            Warnings::new(),
        ));
        let logs = FakeLogCacheClient::default();
        let actor = Actor::new(&fake);

        let error = thread::scope(|s| {
            let streams = actor.start_application(s, app(PackageState::Pending, None), &logs, quick());
            let _ = streams.app_state.recv();
            streams.errs.recv().ok()
        });
        assert!(matches!(
            error,
            Some(Error::Action(ActionError::StagingFailedNoAppDetected { .. }))
        ));
    }

    #[test]
    fn staging_timeout() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application
            .returns(with_package_state(PackageState::Pending));
        let settings = PollingSettings {
            staging_timeout: Duration::ZERO,
            ..quick()
        };

        let out = run(&fake, app(PackageState::Pending, Some(1)), settings);
        assert_eq!(out.errors, vec!["app dora staging did not complete within 0s"]);
        assert_eq!(fake.get_application.call_count(), 0);
    }

    #[test]
    fn crashed_and_flapping_instances_fail_the_start() {
        for (state, expected) in [
            (InstanceState::Crashed, "app instance of dora crashed"),
            (InstanceState::Flapping, "app instance of dora is flapping"),
        ] {
            let fake = FakeCloudControllerV2::default();
            fake.get_application
                .returns(with_package_state(PackageState::Staged));
            fake.get_application_instances.returns(instances(&[state]));

            let out = run(&fake, app(PackageState::Staged, Some(1)), quick());
            assert_eq!(out.errors, vec![expected]);
        }
    }

    #[test]
    fn startup_timeout() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application
            .returns(with_package_state(PackageState::Staged));
        let settings = PollingSettings {
            startup_timeout: Duration::ZERO,
            ..quick()
        };

        let out = run(&fake, app(PackageState::Staged, Some(1)), settings);
        assert_eq!(
            out.errors,
            vec!["app dora failed to start within the startup timeout"]
        );
    }
}
