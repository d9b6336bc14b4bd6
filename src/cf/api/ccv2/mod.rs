//! Cloud Controller `/v2` client.

mod resources;

pub use resources::{
    Application, ApplicationInstance, ApplicationInstanceStatus, ApplicationState,
    ApplicationUpdate, Domain, DomainType, Info, InstanceState, Organization, PackageState,
    Route, SecurityGroup, ServiceInstance, ServiceInstanceSharedTo, ServiceInstanceType, Space,
};

use super::ccerror::CcError;
use super::connection::{ApiFlavor, Connection, Request};
use crate::warnings::{Warned, Warnings};
use resources::{
    instances_from_map, statuses_from_map, ApplicationEntity, DomainEntity, FlatPage,
    InstanceEntry, OrganizationEntity, Page, Resource, RouteEntity, SecurityGroupEntity,
    ServiceInstanceEntity, SpaceEntity, StatusEntry,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Name,
    SpaceGuid,
    OrganizationGuid,
    AppGuid,
    RouteGuid,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Name => "name",
            FilterType::SpaceGuid => "space_guid",
            FilterType::OrganizationGuid => "organization_guid",
            FilterType::AppGuid => "app_guid",
            FilterType::RouteGuid => "route_guid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equal,
    In,
}

/// One `q=` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub kind: FilterType,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn eq(kind: FilterType, value: impl Into<String>) -> Self {
        Self {
            kind,
            operator: FilterOperator::Equal,
            values: vec![value.into()],
        }
    }

    pub fn any_of(kind: FilterType, values: Vec<String>) -> Self {
        Self {
            kind,
            operator: FilterOperator::In,
            values,
        }
    }

    /// `name:foo` or `space_guid IN a,b`.
    pub fn format(&self) -> String {
        let values = self.values.join(",");
        match self.operator {
            FilterOperator::Equal => format!("{}:{}", self.kind.as_str(), values),
            FilterOperator::In => format!("{} IN {}", self.kind.as_str(), values),
        }
    }
}

fn with_filters(mut request: Request, filters: &[Filter]) -> Request {
    for filter in filters {
        request = request.query("q", filter.format());
    }
    request
}

/// Every `/v2` call the actors make.
pub trait CloudControllerV2 {
    fn get_info(&self) -> Warned<Info, CcError>;
    fn get_applications(&self, filters: &[Filter]) -> Warned<Vec<Application>, CcError>;
    fn get_application(&self, guid: &str) -> Warned<Application, CcError>;
    fn update_application(
        &self,
        guid: &str,
        update: &ApplicationUpdate,
    ) -> Warned<Application, CcError>;
    fn get_application_instances(&self, guid: &str) -> Warned<Vec<ApplicationInstance>, CcError>;
    fn get_application_instance_statuses(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceStatus>, CcError>;
    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>, CcError>;
    fn get_shared_domain(&self, guid: &str) -> Warned<Domain, CcError>;
    fn get_private_domain(&self, guid: &str) -> Warned<Domain, CcError>;
    fn get_shared_domains(&self, filters: &[Filter]) -> Warned<Vec<Domain>, CcError>;
    fn get_organization_private_domains(
        &self,
        org_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<Domain>, CcError>;
    fn get_space_routes(&self, space_guid: &str) -> Warned<Vec<Route>, CcError>;
    fn get_route_applications(&self, route_guid: &str) -> Warned<Vec<Application>, CcError>;
    fn delete_route(&self, guid: &str) -> Warned<(), CcError>;
    fn get_space_service_instances(
        &self,
        space_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<ServiceInstance>, CcError>;
    fn get_service_instance_shared_tos(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>, CcError>;
    fn get_security_groups(&self, filters: &[Filter]) -> Warned<Vec<SecurityGroup>, CcError>;
    fn update_security_group_space(&self, group_guid: &str, space_guid: &str)
        -> Warned<(), CcError>;
    fn update_security_group_staging_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError>;
    fn get_organizations(&self, filters: &[Filter]) -> Warned<Vec<Organization>, CcError>;
    fn get_spaces(&self, filters: &[Filter]) -> Warned<Vec<Space>, CcError>;
}

/// HTTP implementation over a [`Connection`].
#[derive(Debug, Clone)]
pub struct Client {
    connection: Connection,
}

impl Client {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    fn get<T: DeserializeOwned>(&self, request: Request) -> Warned<T, CcError> {
        self.connection.make_json(request, ApiFlavor::V2)
    }

    fn get_resource<E, T>(&self, path: String) -> Warned<T, CcError>
    where
        E: DeserializeOwned,
        T: From<Resource<E>>,
    {
        self.get::<Resource<E>>(Request::get(path)).map(T::from)
    }

    fn send_empty(&self, request: Request) -> Warned<(), CcError> {
        self.connection.make(request, ApiFlavor::V2).map(|_| ())
    }

    /// Walks `next_url` until it runs out, concatenating resources and warnings.
    fn paginate<E, T>(&self, first: Request) -> Warned<Vec<T>, CcError>
    where
        E: DeserializeOwned,
        T: From<Resource<E>>,
    {
        Warned::collect(|warnings: &mut Warnings| {
            let mut items = Vec::new();
            let mut next = Some(first);
            while let Some(request) = next.take() {
                let page: Page<E> = self.get(request).merge_into(warnings)?;
                items.extend(page.resources.into_iter().map(T::from));
                next = page.next_url.filter(|url| !url.is_empty()).map(Request::get);
            }
            Ok(items)
        })
    }

    fn paginate_flat<T: DeserializeOwned>(&self, first: Request) -> Warned<Vec<T>, CcError> {
        Warned::collect(|warnings: &mut Warnings| {
            let mut items = Vec::new();
            let mut next = Some(first);
            while let Some(request) = next.take() {
                let page: FlatPage<T> = self.get(request).merge_into(warnings)?;
                items.extend(page.resources);
                next = page.next_url.filter(|url| !url.is_empty()).map(Request::get);
            }
            Ok(items)
        })
    }
}

impl CloudControllerV2 for Client {
    fn get_info(&self) -> Warned<Info, CcError> {
        self.get(Request::get("/v2/info"))
    }

    fn get_applications(&self, filters: &[Filter]) -> Warned<Vec<Application>, CcError> {
        self.paginate::<ApplicationEntity, _>(with_filters(Request::get("/v2/apps"), filters))
    }

    fn get_application(&self, guid: &str) -> Warned<Application, CcError> {
        self.get_resource::<ApplicationEntity, _>(format!("/v2/apps/{guid}"))
    }

    fn update_application(
        &self,
        guid: &str,
        update: &ApplicationUpdate,
    ) -> Warned<Application, CcError> {
        let body = match serde_json::to_value(update) {
            Ok(body) => body,
            Err(e) => {
                return Warned::err(
                    CcError::Json {
                        message: e.to_string(),
                    },
                    Warnings::new(),
                )
            }
        };
        self.get::<Resource<ApplicationEntity>>(Request::put(format!("/v2/apps/{guid}"), body))
            .map(Application::from)
    }

    fn get_application_instances(&self, guid: &str) -> Warned<Vec<ApplicationInstance>, CcError> {
        self.get::<BTreeMap<String, InstanceEntry>>(Request::get(format!(
            "/v2/apps/{guid}/instances"
        )))
        .map(instances_from_map)
    }

    fn get_application_instance_statuses(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceStatus>, CcError> {
        self.get::<BTreeMap<String, StatusEntry>>(Request::get(format!("/v2/apps/{guid}/stats")))
            .map(statuses_from_map)
    }

    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>, CcError> {
        self.paginate::<RouteEntity, _>(Request::get(format!("/v2/apps/{app_guid}/routes")))
    }

    fn get_shared_domain(&self, guid: &str) -> Warned<Domain, CcError> {
        self.get_resource::<DomainEntity, _>(format!("/v2/shared_domains/{guid}"))
    }

    fn get_private_domain(&self, guid: &str) -> Warned<Domain, CcError> {
        self.get_resource::<DomainEntity, _>(format!("/v2/private_domains/{guid}"))
            .map(|mut domain: Domain| {
                domain.domain_type = DomainType::Private;
                domain
            })
    }

    fn get_shared_domains(&self, filters: &[Filter]) -> Warned<Vec<Domain>, CcError> {
        self.paginate::<DomainEntity, _>(with_filters(Request::get("/v2/shared_domains"), filters))
    }

    fn get_organization_private_domains(
        &self,
        org_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<Domain>, CcError> {
        let request = Request::get(format!("/v2/organizations/{org_guid}/private_domains"));
        self.paginate::<DomainEntity, Domain>(with_filters(request, filters))
            .map(|domains| {
                domains
                    .into_iter()
                    .map(|mut d| {
                        d.domain_type = DomainType::Private;
                        d
                    })
                    .collect()
            })
    }

    fn get_space_routes(&self, space_guid: &str) -> Warned<Vec<Route>, CcError> {
        self.paginate::<RouteEntity, _>(Request::get(format!("/v2/spaces/{space_guid}/routes")))
    }

    fn get_route_applications(&self, route_guid: &str) -> Warned<Vec<Application>, CcError> {
        self.paginate::<ApplicationEntity, _>(Request::get(format!("/v2/routes/{route_guid}/apps")))
    }

    fn delete_route(&self, guid: &str) -> Warned<(), CcError> {
        self.send_empty(Request::delete(format!("/v2/routes/{guid}")))
    }

    fn get_space_service_instances(
        &self,
        space_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<ServiceInstance>, CcError> {
        let request = Request::get(format!("/v2/spaces/{space_guid}/service_instances"))
            .query("return_user_provided_service_instances", "true");
        self.paginate::<ServiceInstanceEntity, _>(with_filters(request, filters))
    }

    fn get_service_instance_shared_tos(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>, CcError> {
        self.paginate_flat(Request::get(format!(
            "/v2/service_instances/{guid}/shared_to"
        )))
    }

    fn get_security_groups(&self, filters: &[Filter]) -> Warned<Vec<SecurityGroup>, CcError> {
        self.paginate::<SecurityGroupEntity, _>(with_filters(
            Request::get("/v2/security_groups"),
            filters,
        ))
    }

    fn update_security_group_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError> {
        self.send_empty(Request::put_empty(format!(
            "/v2/security_groups/{group_guid}/spaces/{space_guid}"
        )))
    }

    fn update_security_group_staging_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError> {
        self.send_empty(Request::put_empty(format!(
            "/v2/security_groups/{group_guid}/staging_spaces/{space_guid}"
        )))
    }

    fn get_organizations(&self, filters: &[Filter]) -> Warned<Vec<Organization>, CcError> {
        self.paginate::<OrganizationEntity, _>(with_filters(
            Request::get("/v2/organizations"),
            filters,
        ))
    }

    fn get_spaces(&self, filters: &[Filter]) -> Warned<Vec<Space>, CcError> {
        self.paginate::<SpaceEntity, _>(with_filters(Request::get("/v2/spaces"), filters))
    }
}

impl<T: CloudControllerV2 + ?Sized> CloudControllerV2 for &T {
    fn get_info(&self) -> Warned<Info, CcError> {
        (**self).get_info()
    }
    fn get_applications(&self, filters: &[Filter]) -> Warned<Vec<Application>, CcError> {
        (**self).get_applications(filters)
    }
    fn get_application(&self, guid: &str) -> Warned<Application, CcError> {
        (**self).get_application(guid)
    }
    fn update_application(
        &self,
        guid: &str,
        update: &ApplicationUpdate,
    ) -> Warned<Application, CcError> {
        (**self).update_application(guid, update)
    }
    fn get_application_instances(&self, guid: &str) -> Warned<Vec<ApplicationInstance>, CcError> {
        (**self).get_application_instances(guid)
    }
    fn get_application_instance_statuses(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceStatus>, CcError> {
        (**self).get_application_instance_statuses(guid)
    }
    fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>, CcError> {
        (**self).get_application_routes(app_guid)
    }
    fn get_shared_domain(&self, guid: &str) -> Warned<Domain, CcError> {
        (**self).get_shared_domain(guid)
    }
    fn get_private_domain(&self, guid: &str) -> Warned<Domain, CcError> {
        (**self).get_private_domain(guid)
    }
    fn get_shared_domains(&self, filters: &[Filter]) -> Warned<Vec<Domain>, CcError> {
        (**self).get_shared_domains(filters)
    }
    fn get_organization_private_domains(
        &self,
        org_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<Domain>, CcError> {
        (**self).get_organization_private_domains(org_guid, filters)
    }
    fn get_space_routes(&self, space_guid: &str) -> Warned<Vec<Route>, CcError> {
        (**self).get_space_routes(space_guid)
    }
    fn get_route_applications(&self, route_guid: &str) -> Warned<Vec<Application>, CcError> {
        (**self).get_route_applications(route_guid)
    }
    fn delete_route(&self, guid: &str) -> Warned<(), CcError> {
        (**self).delete_route(guid)
    }
    fn get_space_service_instances(
        &self,
        space_guid: &str,
        filters: &[Filter],
    ) -> Warned<Vec<ServiceInstance>, CcError> {
        (**self).get_space_service_instances(space_guid, filters)
    }
    fn get_service_instance_shared_tos(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>, CcError> {
        (**self).get_service_instance_shared_tos(guid)
    }
    fn get_security_groups(&self, filters: &[Filter]) -> Warned<Vec<SecurityGroup>, CcError> {
        (**self).get_security_groups(filters)
    }
    fn update_security_group_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError> {
        (**self).update_security_group_space(group_guid, space_guid)
    }
    fn update_security_group_staging_space(
        &self,
        group_guid: &str,
        space_guid: &str,
    ) -> Warned<(), CcError> {
        (**self).update_security_group_staging_space(group_guid, space_guid)
    }
    fn get_organizations(&self, filters: &[Filter]) -> Warned<Vec<Organization>, CcError> {
        (**self).get_organizations(filters)
    }
    fn get_spaces(&self, filters: &[Filter]) -> Warned<Vec<Space>, CcError> {
        (**self).get_spaces(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve;
    use crate::api::ConnectionConfig;

    #[test]
    fn filters_format_as_q_parameters() {
        assert_eq!(Filter::eq(FilterType::Name, "dora").format(), "name:dora");
        assert_eq!(
            Filter::any_of(
                FilterType::SpaceGuid,
                vec!["space-1".into(), "space-2".into()]
            )
            .format(),
            "space_guid IN space-1,space-2"
        );
    }

    #[test]
    fn each_filter_becomes_its_own_q() {
        let request = with_filters(
            Request::get("/v2/apps"),
            &[
                Filter::eq(FilterType::Name, "dora"),
                Filter::eq(FilterType::SpaceGuid, "space"),
            ],
        );
        assert_eq!(
            request.query,
            vec![
                ("q".to_string(), "name:dora".to_string()),
                ("q".to_string(), "space_guid:space".to_string()),
            ]
        );
    }

    fn client(base: &str) -> Client {
        Client::new(Connection::new(base, None, &ConnectionConfig::default()).unwrap())
    }

    #[test]
    fn pages_are_followed_until_next_url_is_null() {
        let (base, server) = serve(vec![
            (
                200,
                "page-1-warning",
                r#"{"next_url": "/v2/apps?page=2", "resources": [
                    {"metadata": {"guid": "app-1"}, "entity": {"name": "dora"}}
                ]}"#,
            ),
            (
                200,
                "page-2-warning",
                r#"{"next_url": null, "resources": [
                    {"metadata": {"guid": "app-2"}, "entity": {"name": "diego"}},
                    {"metadata": {"guid": "app-3"}, "entity": {"name": "loggregator"}}
                ]}"#,
            ),
        ]);

        let out = client(&base).get_applications(&[Filter::eq(FilterType::Name, "dora")]);
        let guids: Vec<_> = out
            .result
            .unwrap()
            .into_iter()
            .map(|app| app.guid)
            .collect();
        assert_eq!(guids, vec!["app-1", "app-2", "app-3"]);
        assert_eq!(out.warnings.as_strs(), vec!["page-1-warning", "page-2-warning"]);

        let urls: Vec<_> = server.join().unwrap().into_iter().map(|(url, _)| url).collect();
        assert_eq!(urls, vec!["/v2/apps?q=name%3Adora", "/v2/apps?page=2"]);
    }

    #[test]
    fn failed_page_keeps_earlier_warnings() {
        let (base, server) = serve(vec![
            (
                200,
                "page-1-warning",
                r#"{"next_url": "/v2/apps?page=2", "resources": []}"#,
            ),
            (
                403,
                "page-2-warning",
                r#"{"code": 10003, "description": "nope", "error_code": "CF-NotAuthorized"}"#,
            ),
        ]);

        let out = client(&base).get_applications(&[]);
        assert!(matches!(out.result, Err(CcError::Forbidden { .. })));
        assert_eq!(out.warnings.as_strs(), vec!["page-1-warning", "page-2-warning"]);
        server.join().unwrap();
    }
}
