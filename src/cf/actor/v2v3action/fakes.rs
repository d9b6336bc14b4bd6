//! Scriptable stand-ins for the two actor halves. Responses carry the crate `Error`,
//! which is not `Clone`, so program them with `returns_with` or `returns_in_order`.

use super::{V2Actor, V3Actor};
use crate::actor::v2action::{
    Application, ApplicationInstanceWithStats, Route, ServiceInstance, ServiceInstanceSharedTo,
    Space,
};
use crate::actor::v3action;
use crate::api::ccv3::RelationshipList;
use crate::api::fakes::Stub;
use crate::warnings::Warned;

type ActorStub<A, T> = Stub<A, Warned<T>>;

#[derive(Default)]
pub struct FakeV2Actor {
    pub get_application_by_name_and_space: ActorStub<(String, String), Application>,
    pub get_application_routes: ActorStub<String, Vec<Route>>,
    pub get_application_instances_with_stats_by_application:
        ActorStub<String, Vec<ApplicationInstanceWithStats>>,
    pub get_service_instance_by_name_and_space: ActorStub<(String, String), ServiceInstance>,
    pub get_service_instance_shared_tos_by_service_instance:
        ActorStub<String, Vec<ServiceInstanceSharedTo>>,
    pub get_space_by_organization_and_name: ActorStub<(String, String), Space>,
}

impl V2Actor for FakeV2Actor {
    fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        self.get_application_by_name_and_space
            .invoke((name.to_string(), space_guid.to_string()))
    }

    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>> {
        self.get_application_routes.invoke(app_guid.to_string())
    }

    fn get_application_instances_with_stats_by_application(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceWithStats>> {
        self.get_application_instances_with_stats_by_application
            .invoke(guid.to_string())
    }

    fn get_service_instance_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ServiceInstance> {
        self.get_service_instance_by_name_and_space
            .invoke((name.to_string(), space_guid.to_string()))
    }

    fn get_service_instance_shared_tos_by_service_instance(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>> {
        self.get_service_instance_shared_tos_by_service_instance
            .invoke(guid.to_string())
    }

    fn get_space_by_organization_and_name(
        &self,
        org_guid: &str,
        space_name: &str,
    ) -> Warned<Space> {
        self.get_space_by_organization_and_name
            .invoke((org_guid.to_string(), space_name.to_string()))
    }
}

#[derive(Default)]
pub struct FakeV3Actor {
    pub cloud_controller_api_version: ActorStub<(), String>,
    pub get_application_summary_by_name_and_space:
        ActorStub<(String, String), v3action::ApplicationSummary>,
    pub get_organization_by_name: ActorStub<String, v3action::Organization>,
    pub share_service_instance_to_spaces: ActorStub<(String, Vec<String>), RelationshipList>,
}

impl V3Actor for FakeV3Actor {
    fn cloud_controller_api_version(&self) -> Warned<String> {
        self.cloud_controller_api_version.invoke(())
    }

    fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<v3action::ApplicationSummary> {
        self.get_application_summary_by_name_and_space
            .invoke((name.to_string(), space_guid.to_string()))
    }

    fn get_organization_by_name(&self, name: &str) -> Warned<v3action::Organization> {
        self.get_organization_by_name.invoke(name.to_string())
    }

    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList> {
        self.share_service_instance_to_spaces
            .invoke((service_instance_guid.to_string(), space_guids.to_vec()))
    }
}
