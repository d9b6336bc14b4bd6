//! In-memory API clients for tests.
//!
//! Every fake method is a [`Stub`]: it records the arguments of each call and answers with
//! whatever was programmed, or the zero value with no warnings when nothing was.
//!
//! ```rust,ignore
//! use cf::api::ccv2::{CloudControllerV2, Application};
//! use cf::api::fakes::FakeCloudControllerV2;
//! use cf::warnings::{Warned, Warnings};
//!
//! let fake = FakeCloudControllerV2::default();
//! fake.get_application.returns(Warned::ok(
//!     Application { name: "dora".into(), ..Application::default() },
//!     Warnings::from_strs(&["get-app-warning"]),
//! ));
//!
//! let out = fake.get_application("some-guid");
//! assert_eq!(out.result.unwrap().name, "dora");
//! assert_eq!(fake.get_application.args_for_call(0), "some-guid");
//! ```

use super::ccerror::CcError;
use super::ccv2::{self, CloudControllerV2, Filter};
use super::ccv3::{self, CloudControllerV3, Query};
use super::logcache::{LogCacheClient, LogMessage};
use super::uaa::{Tokens, UaaClient, UaaError};
use crate::warnings::Warned;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Responder<A, R> = Box<dyn FnMut(&A) -> R + Send>;

struct StubState<A, R> {
    calls: Vec<A>,
    responder: Option<Responder<A, R>>,
}

/// A programmable, call-recording stand-in for one method.
pub struct Stub<A, R> {
    state: Mutex<StubState<A, R>>,
}

impl<A, R> Default for Stub<A, R> {
    fn default() -> Self {
        Self {
            state: Mutex::new(StubState {
                calls: Vec::new(),
                responder: None,
            }),
        }
    }
}

impl<A, R> Stub<A, R> {
    fn lock(&self) -> MutexGuard<'_, StubState<A, R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn returns_with(&self, responder: impl FnMut(&A) -> R + Send + 'static) {
        self.lock().responder = Some(Box::new(responder));
    }

    pub fn returns(&self, response: R)
    where
        R: Clone + Send + 'static,
    {
        self.returns_with(move |_| response.clone());
    }

    /// One response per call; once exhausted, calls get the zero value.
    pub fn returns_in_order(&self, responses: Vec<R>)
    where
        R: Default + Send + 'static,
    {
        let mut queue: VecDeque<R> = responses.into();
        self.returns_with(move |_| queue.pop_front().unwrap_or_default());
    }

    pub fn invoke(&self, args: A) -> R
    where
        R: Default,
    {
        let mut state = self.lock();
        let response = match state.responder.as_mut() {
            Some(responder) => responder(&args),
            None => R::default(),
        };
        state.calls.push(args);
        response
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn args_for_call(&self, i: usize) -> A
    where
        A: Clone,
    {
        self.lock().calls[i].clone()
    }
}

type CcStub<A, T> = Stub<A, Warned<T, CcError>>;

#[derive(Default)]
pub struct FakeCloudControllerV2 {
    pub get_info: CcStub<(), ccv2::Info>,
    pub get_applications: CcStub<Vec<Filter>, Vec<ccv2::Application>>,
    pub get_application: CcStub<String, ccv2::Application>,
    pub update_application: CcStub<(String, ccv2::ApplicationUpdate), ccv2::Application>,
    pub get_application_instances: CcStub<String, Vec<ccv2::ApplicationInstance>>,
    pub get_application_instance_statuses: CcStub<String, Vec<ccv2::ApplicationInstanceStatus>>,
    pub get_application_routes: CcStub<String, Vec<ccv2::Route>>,
    pub get_shared_domain: CcStub<String, ccv2::Domain>,
    pub get_private_domain: CcStub<String, ccv2::Domain>,
    pub get_shared_domains: CcStub<Vec<Filter>, Vec<ccv2::Domain>>,
    pub get_organization_private_domains: CcStub<(String, Vec<Filter>), Vec<ccv2::Domain>>,
    pub get_space_routes: CcStub<String, Vec<ccv2::Route>>,
    pub get_route_applications: CcStub<String, Vec<ccv2::Application>>,
    pub delete_route: CcStub<String, ()>,
    pub get_space_service_instances: CcStub<(String, Vec<Filter>), Vec<ccv2::ServiceInstance>>,
    pub get_service_instance_shared_tos: CcStub<String, Vec<ccv2::ServiceInstanceSharedTo>>,
    pub get_security_groups: CcStub<Vec<Filter>, Vec<ccv2::SecurityGroup>>,
    pub update_security_group_space: CcStub<(String, String), ()>,
    pub update_security_group_staging_space: CcStub<(String, String), ()>,
    pub get_organizations: CcStub<Vec<Filter>, Vec<ccv2::Organization>>,
    pub get_spaces: CcStub<Vec<Filter>, Vec<ccv2::Space>>,
}

impl CloudControllerV2 for FakeCloudControllerV2 {
    fn get_info(&self) -> Warned<ccv2::Info, CcError> {
        self.get_info.invoke(())
    }

    fn get_applications(&self, filters: &[Filter]) -> Warned<Vec<ccv2::Application>, CcError> {
        self.get_applications.invoke(filters.to_vec())
    }

    fn get_application(&self, guid: &str) -> Warned<ccv2::Application, CcError> {
        self.get_application.invoke(guid.to_string())
    }

    fn update_application(
        &self,
        guid: &str,
        update: &ccv2::ApplicationUpdate,
    ) -> Warned<ccv2::Application, CcError> {
        self.update_application
            .invoke((guid.to_string(), update.clone()))
    }

    fn get_application_instances(
        &self,
        guid: &str,
    ) -> Warned<Vec<ccv2::ApplicationInstance>, CcError> {
        self.get_application_instances.invoke(guid.to_string())
    }

    fn get_application_instance_statuses(
        &self,
        guid: &str,
    ) -> Warned<Vec<ccv2::ApplicationInstanceStatus>, CcError> {
        self.get_application_instance_statuses
            .invoke(guid.to_string())
    }

    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<ccv2::Route>, CcError> {
        self.get_application_routes.invoke(app_guid.to_string())
    }

    fn get_shared_domain(&self, guid: &str) -> Warned<ccv2::Domain, CcError> {
        self.get_shared_domain.invoke(guid.to_string())
    }

    fn get_private_domain(&self, guid: &str) -> Warned<ccv2::Domain, CcError> {
        self.get_private_domain.invoke(guid.to_string())
    }

    fn get_shared_domains(&self, filters: &[Filter]) -> Warned<Vec<ccv2::Domain>, CcError> {
        self.get_shared_domains.invoke(filters.to_vec())
    }

    fn get_organization_private_domains(
        &self,
        org_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<ccv2::Domain>, CcError> {
        self.get_organization_private_domains
            .invoke((org_guid.to_string(), filters.to_vec()))
    }

    fn get_space_routes(&self, space_guid: &str) -> Warned<Vec<ccv2::Route>, CcError> {
        self.get_space_routes.invoke(space_guid.to_string())
    }

    fn get_route_applications(
        &self,
        route_guid: &str,
    ) -> Warned<Vec<ccv2::Application>, CcError> {
        self.get_route_applications.invoke(route_guid.to_string())
    }

    fn delete_route(&self, guid: &str) -> Warned<(), CcError> {
        self.delete_route.invoke(guid.to_string())
    }

    fn get_space_service_instances(
        &self,
        space_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<ccv2::ServiceInstance>, CcError> {
        self.get_space_service_instances
            .invoke((space_guid.to_string(), filters.to_vec()))
    }

    fn get_service_instance_shared_tos(
        &self,
        guid: &str,
    ) -> Warned<Vec<ccv2::ServiceInstanceSharedTo>, CcError> {
        self.get_service_instance_shared_tos
            .invoke(guid.to_string())
    }

    fn get_security_groups(&self, filters: &[Filter]) -> Warned<Vec<ccv2::SecurityGroup>, CcError> {
        self.get_security_groups.invoke(filters.to_vec())
    }

    fn update_security_group_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError> {
        self.update_security_group_space
            .invoke((group_guid.to_string(), space_guid.to_string()))
    }

    fn update_security_group_staging_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError> {
        self.update_security_group_staging_space
            .invoke((group_guid.to_string(), space_guid.to_string()))
    }

    fn get_organizations(&self, filters: &[Filter]) -> Warned<Vec<ccv2::Organization>, CcError> {
        self.get_organizations.invoke(filters.to_vec())
    }

    fn get_spaces(&self, filters: &[Filter]) -> Warned<Vec<ccv2::Space>, CcError> {
        self.get_spaces.invoke(filters.to_vec())
    }
}

#[derive(Default)]
pub struct FakeCloudControllerV3 {
    pub get_root: CcStub<(), ccv3::Root>,
    pub get_applications: CcStub<Vec<Query>, Vec<ccv3::Application>>,
    pub get_application_processes: CcStub<String, Vec<ccv3::Process>>,
    pub get_process_instances: CcStub<String, Vec<ccv3::ProcessInstance>>,
    pub get_application_droplets: CcStub<(String, Vec<Query>), Vec<ccv3::Droplet>>,
    pub create_application_task: CcStub<(String, ccv3::Task), ccv3::Task>,
    pub get_organizations: CcStub<Vec<Query>, Vec<ccv3::Organization>>,
    pub share_service_instance_to_spaces: CcStub<(String, Vec<String>), ccv3::RelationshipList>,
}

impl CloudControllerV3 for FakeCloudControllerV3 {
    fn get_root(&self) -> Warned<ccv3::Root, CcError> {
        self.get_root.invoke(())
    }

    fn get_applications(&self, query: &[Query]) -> Warned<Vec<ccv3::Application>, CcError> {
        self.get_applications.invoke(query.to_vec())
    }

    fn get_application_processes(&self, app_guid: &str) -> Warned<Vec<ccv3::Process>, CcError> {
        self.get_application_processes.invoke(app_guid.to_string())
    }

    fn get_process_instances(
        &self,
        process_guid: &str,
    ) -> Warned<Vec<ccv3::ProcessInstance>, CcError> {
        self.get_process_instances.invoke(process_guid.to_string())
    }

    fn get_application_droplets(
        &self,
        app_guid: &str,
        query: &[Query],
    ) -> Warned<Vec<ccv3::Droplet>, CcError> {
        self.get_application_droplets
            .invoke((app_guid.to_string(), query.to_vec()))
    }

    fn create_application_task(
        &self,
        app_guid: &str,
        task: &ccv3::Task,
    ) -> Warned<ccv3::Task, CcError> {
        self.create_application_task
            .invoke((app_guid.to_string(), task.clone()))
    }

    fn get_organizations(&self, query: &[Query]) -> Warned<Vec<ccv3::Organization>, CcError> {
        self.get_organizations.invoke(query.to_vec())
    }

    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<ccv3::RelationshipList, CcError> {
        self.share_service_instance_to_spaces
            .invoke((service_instance_guid.to_string(), space_guids.to_vec()))
    }
}

#[derive(Default)]
pub struct FakeLogCacheClient {
    pub read: CcStub<(String, i64), Vec<LogMessage>>,
}

impl LogCacheClient for FakeLogCacheClient {
    fn read(&self, source_guid: &str, start_time: i64) -> Result<Vec<LogMessage>, CcError> {
        self.read
            .invoke((source_guid.to_string(), start_time))
            .result
    }
}

#[derive(Default)]
pub struct FakeUaaClient {
    pub authenticate: Stub<(String, String), Warned<Tokens, UaaError>>,
}

impl UaaClient for FakeUaaClient {
    fn authenticate(&self, username: &str, password: &str) -> Result<Tokens, UaaError> {
        self.authenticate
            .invoke((username.to_string(), password.to_string()))
            .result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warnings::Warnings;

    #[test]
    fn unprogrammed_stub_returns_zero_value() {
        let fake = FakeCloudControllerV2::default();
        let out = fake.get_spaces(&[]);
        assert_eq!(out.result, Ok(vec![]));
        assert!(out.warnings.is_empty());
        assert_eq!(fake.get_spaces.call_count(), 1);
    }

    #[test]
    fn responses_in_order_then_zero_value() {
        let fake = FakeCloudControllerV2::default();
        fake.delete_route.returns_in_order(vec![
            Warned::ok((), Warnings::from_strs(&["first"])),
            Warned::err(
                CcError::ResourceNotFound {
                    message: "gone".into(),
                },
                Warnings::from_strs(&["second"]),
            ),
        ]);

        assert_eq!(fake.delete_route("a").warnings.as_strs(), vec!["first"]);
        assert!(fake.delete_route("b").result.is_err());
        assert!(fake.delete_route("c").result.is_ok());
        assert_eq!(fake.delete_route.args_for_call(2), "c");
    }
}
