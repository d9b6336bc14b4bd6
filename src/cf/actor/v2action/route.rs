use super::{Actor, Domain};
use crate::actor::ActionError;
use crate::api::ccv2::{self, CloudControllerV2};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};
use std::fmt;

/// A route with its domain resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub guid: String,
    pub host: String,
    pub domain: Domain,
    pub path: String,
    pub port: Option<u16>,
    pub space_guid: String,
}

impl Route {
    /// A TCP route that asks the router for any free port.
    pub fn random_tcp_port(&self) -> bool {
        self.domain.is_tcp() && self.port.is_none()
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        self.validate_with_random_port(false)
    }

    pub fn validate_with_random_port(&self, random_port: bool) -> Result<(), ActionError> {
        if !self.domain.is_tcp() {
            if self.port.is_some() || random_port {
                return Err(ActionError::InvalidHttpRouteSettings {
                    domain: self.domain.name.clone(),
                });
            }
            if self.domain.is_shared() && self.host.is_empty() {
                return Err(ActionError::NoHostnameAndSharedDomain);
            }
        } else if !self.host.is_empty() || !self.path.is_empty() {
            return Err(ActionError::InvalidTcpRouteSettings {
                domain: self.domain.name.clone(),
            });
        }
        Ok(())
    }

    fn with_domain(route: ccv2::Route, domain: Domain) -> Self {
        Self {
            guid: route.guid,
            host: route.host,
            domain,
            path: route.path,
            port: route.port,
            space_guid: route.space_guid,
        }
    }
}

/// `host.domain/path` for HTTP routes, `domain:port` for TCP routes.
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(port) = self.port {
            return write!(f, "{}:{}", self.domain.name, port);
        }

        if self.host.is_empty() {
            f.write_str(&self.domain.name)?;
        } else {
            write!(f, "{}.{}", self.host, self.domain.name)?;
        }

        if !self.path.is_empty() {
            if !self.path.starts_with('/') {
                f.write_str("/")?;
            }
            f.write_str(&self.path)?;
        }
        Ok(())
    }
}

impl<C: CloudControllerV2> Actor<C> {
    fn resolve_domains(
        &self,
        routes: Vec<ccv2::Route>,
        warnings: &mut Warnings,
    ) -> Result<Vec<Route>, Error> {
        let mut resolved = Vec::with_capacity(routes.len());
        for route in routes {
            let domain = self
                .get_domain_by_guid(&route.domain_guid)
                .merge_into(warnings)?;
            resolved.push(Route::with_domain(route, domain));
        }
        Ok(resolved)
    }

    /// A 404 is passed through untouched; callers decide whether missing routes matter.
    pub fn get_application_routes(&self, app_guid: &str) -> Warned<Vec<Route>> {
        Warned::collect(|warnings: &mut Warnings| {
            let routes = self
                .client
                .get_application_routes(app_guid)
                .merge_into(warnings)?;
            self.resolve_domains(routes, warnings)
        })
    }

    /// Routes in the space that no application is mapped to.
    pub fn get_orphaned_routes_by_space(&self, space_guid: &str) -> Warned<Vec<Route>> {
        Warned::collect(|warnings: &mut Warnings| {
            let routes = self.client.get_space_routes(space_guid).merge_into(warnings)?;

            let mut orphaned = Vec::new();
            for route in routes {
                let apps = self
                    .client
                    .get_route_applications(&route.guid)
                    .merge_into(warnings)?;
                if !apps.is_empty() {
                    continue;
                }
                let domain = self
                    .get_domain_by_guid(&route.domain_guid)
                    .merge_into(warnings)?;
                orphaned.push(Route::with_domain(route, domain));
            }

            if orphaned.is_empty() {
                return Err(Error::from(ActionError::OrphanedRoutesNotFound));
            }
            Ok(orphaned)
        })
    }

    pub fn delete_route(&self, guid: &str) -> Warned<()> {
        self.client.delete_route(guid).err_into()
    }
}
