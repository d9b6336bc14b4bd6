//! Operations that need both API generations.
//!
//! The composed actors sit behind the [`V2Actor`] and [`V3Actor`] traits so tests can
//! script each half independently (see [`fakes`]).

mod service_instance;
mod summary;

#[cfg(any(test, feature = "test_utils"))]
pub mod fakes;

pub use summary::ApplicationSummary;

use crate::actor::v2action::{
    self, Application, ApplicationInstanceWithStats, Route, ServiceInstance,
    ServiceInstanceSharedTo, Space,
};
use crate::actor::v3action;
use crate::api::ccv2::CloudControllerV2;
use crate::api::ccv3::{CloudControllerV3, RelationshipList};
use crate::warnings::Warned;

/// The `/v2` half.
pub trait V2Actor {
    fn get_application_by_name_and_space(&self, name: &str, space_guid: &str)
        -> Warned<Application>;
    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>>;
    fn get_application_instances_with_stats_by_application(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceWithStats>>;
    fn get_service_instance_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ServiceInstance>;
    fn get_service_instance_shared_tos_by_service_instance(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>>;
    fn get_space_by_organization_and_name(&self, org_guid: &str, space_name: &str)
        -> Warned<Space>;
}

/// The `/v3` half.
pub trait V3Actor {
    fn cloud_controller_api_version(&self) -> Warned<String>;
    fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<v3action::ApplicationSummary>;
    fn get_organization_by_name(&self, name: &str) -> Warned<v3action::Organization>;
    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList>;
}

impl<C: CloudControllerV2> V2Actor for v2action::Actor<C> {
    fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        v2action::Actor::get_application_by_name_and_space(self, name, space_guid)
    }

    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>> {
        v2action::Actor::get_application_routes(self, app_guid)
    }

    fn get_application_instances_with_stats_by_application(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceWithStats>> {
        v2action::Actor::get_application_instances_with_stats_by_application(self, guid)
    }

    fn get_service_instance_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ServiceInstance> {
        v2action::Actor::get_service_instance_by_name_and_space(self, name, space_guid)
    }

    fn get_service_instance_shared_tos_by_service_instance(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>> {
        v2action::Actor::get_service_instance_shared_tos_by_service_instance(self, guid)
    }

    fn get_space_by_organization_and_name(
        &self,
        org_guid: &str,
        space_name: &str,
    ) -> Warned<Space> {
        v2action::Actor::get_space_by_organization_and_name(self, org_guid, space_name)
    }
}

impl<C: CloudControllerV3> V3Actor for v3action::Actor<C> {
    fn cloud_controller_api_version(&self) -> Warned<String> {
        v3action::Actor::cloud_controller_api_version(self)
    }

    fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<v3action::ApplicationSummary> {
        v3action::Actor::get_application_summary_by_name_and_space(self, name, space_guid)
    }

    fn get_organization_by_name(&self, name: &str) -> Warned<v3action::Organization> {
        v3action::Actor::get_organization_by_name(self, name)
    }

    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList> {
        v3action::Actor::share_service_instance_to_spaces(self, service_instance_guid, space_guids)
    }
}

impl<T: V2Actor + ?Sized> V2Actor for &T {
    fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        (**self).get_application_by_name_and_space(name, space_guid)
    }

    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>> {
        (**self).get_application_routes(app_guid)
    }

    fn get_application_instances_with_stats_by_application(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceWithStats>> {
        (**self).get_application_instances_with_stats_by_application(guid)
    }

    fn get_service_instance_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ServiceInstance> {
        (**self).get_service_instance_by_name_and_space(name, space_guid)
    }

    fn get_service_instance_shared_tos_by_service_instance(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>> {
        (**self).get_service_instance_shared_tos_by_service_instance(guid)
    }

    fn get_space_by_organization_and_name(
        &self,
        org_guid: &str,
        space_name: &str,
    ) -> Warned<Space> {
        (**self).get_space_by_organization_and_name(org_guid, space_name)
    }
}

impl<T: V3Actor + ?Sized> V3Actor for &T {
    fn cloud_controller_api_version(&self) -> Warned<String> {
        (**self).cloud_controller_api_version()
    }

    fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<v3action::ApplicationSummary> {
        (**self).get_application_summary_by_name_and_space(name, space_guid)
    }

    fn get_organization_by_name(&self, name: &str) -> Warned<v3action::Organization> {
        (**self).get_organization_by_name(name)
    }

    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList> {
        (**self).share_service_instance_to_spaces(service_instance_guid, space_guids)
    }
}

pub struct Actor<V2, V3> {
    v2: V2,
    v3: V3,
}

impl<V2: V2Actor, V3: V3Actor> Actor<V2, V3> {
    pub fn new(v2: V2, v3: V3) -> Self {
        Self { v2, v3 }
    }
}
