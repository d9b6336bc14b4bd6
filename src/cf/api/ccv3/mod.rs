//! Cloud Controller `/v3` client.

mod resources;

pub use resources::{
    Application, Droplet, DropletBuildpack, HealthCheck, Lifecycle, LifecycleData, Organization,
    Process, ProcessInstance, Relationship, RelationshipList, Root, Task, Usage,
};

use super::ccerror::CcError;
use super::connection::{ApiFlavor, Connection, Request};
use crate::warnings::{Warned, Warnings};
use resources::{Page, RootBody};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
    Names,
    SpaceGuids,
    OrganizationGuids,
    Current,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Names => "names",
            QueryKey::SpaceGuids => "space_guids",
            QueryKey::OrganizationGuids => "organization_guids",
            QueryKey::Current => "current",
        }
    }
}

/// One query parameter; values are comma-joined on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub key: QueryKey,
    pub values: Vec<String>,
}

impl Query {
    pub fn new(key: QueryKey, values: &[&str]) -> Self {
        Self {
            key,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

fn with_query(mut request: Request, query: &[Query]) -> Request {
    for q in query {
        request = request.query(q.key.as_str(), q.values.join(","));
    }
    request
}

pub trait CloudControllerV3 {
    fn get_root(&self) -> Warned<Root, CcError>;
    fn get_applications(&self, query: &[Query]) -> Warned<Vec<Application>, CcError>;
    fn get_application_processes(&self, app_guid: &str) -> Warned<Vec<Process>, CcError>;
    fn get_process_instances(&self, process_guid: &str) -> Warned<Vec<ProcessInstance>, CcError>;
    fn get_application_droplets(
        &self,
        app_guid: &str,
        query: &[Query],
    ) -> Warned<Vec<Droplet>, CcError>;
    fn create_application_task(&self, app_guid: &str, task: &Task) -> Warned<Task, CcError>;
    fn get_organizations(&self, query: &[Query]) -> Warned<Vec<Organization>, CcError>;
    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList, CcError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    connection: Connection,
}

impl Client {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    fn send<T: DeserializeOwned>(&self, request: Request) -> Warned<T, CcError> {
        self.connection.make_json(request, ApiFlavor::V3)
    }

    fn post<T: DeserializeOwned>(
        &self,
        path: String,
        body: &impl serde::Serialize,
    ) -> Warned<T, CcError> {
        match serde_json::to_value(body) {
            Ok(body) => self.send(Request::post(path, body)),
            Err(e) => Warned::err(
                CcError::Json {
                    message: e.to_string(),
                },
                Warnings::new(),
            ),
        }
    }

    /// Follows `pagination.next.href` until it is null.
    fn paginate<T: DeserializeOwned>(&self, first: Request) -> Warned<Vec<T>, CcError> {
        Warned::collect(|warnings: &mut Warnings| {
            let mut items = Vec::new();
            let mut next = Some(first);
            while let Some(request) = next.take() {
                let page: Page<T> = self.send(request).merge_into(warnings)?;
                next = page.next_href().map(Request::get);
                items.extend(page.resources);
            }
            Ok(items)
        })
    }
}

impl CloudControllerV3 for Client {
    fn get_root(&self) -> Warned<Root, CcError> {
        self.send::<RootBody>(Request::get("/")).map(Root::from)
    }

    fn get_applications(&self, query: &[Query]) -> Warned<Vec<Application>, CcError> {
        self.paginate(with_query(Request::get("/v3/apps"), query))
    }

    fn get_application_processes(&self, app_guid: &str) -> Warned<Vec<Process>, CcError> {
        self.paginate(Request::get(format!("/v3/apps/{app_guid}/processes")))
    }

    fn get_process_instances(&self, process_guid: &str) -> Warned<Vec<ProcessInstance>, CcError> {
        self.paginate(Request::get(format!("/v3/processes/{process_guid}/stats")))
    }

    fn get_application_droplets(
        &self,
        app_guid: &str,
        query: &[Query],
    ) -> Warned<Vec<Droplet>, CcError> {
        self.paginate(with_query(
            Request::get(format!("/v3/apps/{app_guid}/droplets")),
            query,
        ))
    }

    fn create_application_task(&self, app_guid: &str, task: &Task) -> Warned<Task, CcError> {
        self.post(format!("/v3/apps/{app_guid}/tasks"), task)
    }

    fn get_organizations(&self, query: &[Query]) -> Warned<Vec<Organization>, CcError> {
        self.paginate(with_query(Request::get("/v3/organizations"), query))
    }

    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList, CcError> {
        self.post(
            format!("/v3/service_instances/{service_instance_guid}/relationships/shared_spaces"),
            &RelationshipList::from_guids(space_guids),
        )
    }
}

impl<T: CloudControllerV3 + ?Sized> CloudControllerV3 for &T {
    fn get_root(&self) -> Warned<Root, CcError> {
        (**self).get_root()
    }
    fn get_applications(&self, query: &[Query]) -> Warned<Vec<Application>, CcError> {
        (**self).get_applications(query)
    }
    fn get_application_processes(&self, app_guid: &str) -> Warned<Vec<Process>, CcError> {
        (**self).get_application_processes(app_guid)
    }
    fn get_process_instances(&self, process_guid: &str) -> Warned<Vec<ProcessInstance>, CcError> {
        (**self).get_process_instances(process_guid)
    }
    fn get_application_droplets(
        &self,
        app_guid: &str,
        query: &[Query],
    ) -> Warned<Vec<Droplet>, CcError> {
        (**self).get_application_droplets(app_guid, query)
    }
    fn create_application_task(&self, app_guid: &str, task: &Task) -> Warned<Task, CcError> {
        (**self).create_application_task(app_guid, task)
    }
    fn get_organizations(&self, query: &[Query]) -> Warned<Vec<Organization>, CcError> {
        (**self).get_organizations(query)
    }
    fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList, CcError> {
        (**self).share_service_instance_to_spaces(service_instance_guid, space_guids)
    }
}
