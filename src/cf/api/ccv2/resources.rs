//! Flattened `/v2` records.
//!
//! The wire format nests everything as `{"metadata": {...}, "entity": {...}}` with nullable
//! fields; each record here is decoded from that envelope and keeps only what the actors use.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Metadata {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Resource<E> {
    #[serde(default)]
    pub metadata: Metadata,
    pub entity: E,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page<E> {
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<E>>,
}

/// `GET /v2/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub authorization_endpoint: String,
    #[serde(default, rename = "doppler_logging_endpoint")]
    pub doppler_endpoint: String,
    #[serde(default)]
    pub routing_endpoint: Option<String>,
    #[serde(default)]
    pub token_endpoint: String,
    #[serde(default)]
    pub min_cli_version: Option<String>,
    #[serde(default)]
    pub min_recommended_cli_version: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationState {
    #[default]
    Stopped,
    Started,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageState {
    #[default]
    Pending,
    Staged,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Application {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    pub state: ApplicationState,
    pub package_state: PackageState,
    pub staging_failed_reason: String,
    pub staging_failed_description: String,
    pub instances: Option<u32>,
    pub memory: u64,
    pub disk_quota: u64,
    pub buildpack: String,
    pub detected_buildpack: String,
    pub stack_guid: String,
    pub docker_image: String,
    pub health_check_type: String,
    pub command: String,
    pub detected_start_command: String,
    pub package_updated_at: Option<String>,
}

impl Application {
    pub fn started(&self) -> bool {
        self.state == ApplicationState::Started
    }

    pub fn staged(&self) -> bool {
        self.package_state == PackageState::Staged
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApplicationEntity {
    name: Option<String>,
    space_guid: Option<String>,
    #[serde(default)]
    state: ApplicationState,
    #[serde(default)]
    package_state: PackageState,
    staging_failed_reason: Option<String>,
    staging_failed_description: Option<String>,
    instances: Option<u32>,
    memory: Option<u64>,
    disk_quota: Option<u64>,
    buildpack: Option<String>,
    detected_buildpack: Option<String>,
    stack_guid: Option<String>,
    docker_image: Option<String>,
    health_check_type: Option<String>,
    command: Option<String>,
    detected_start_command: Option<String>,
    package_updated_at: Option<String>,
}

impl From<Resource<ApplicationEntity>> for Application {
    fn from(r: Resource<ApplicationEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            name: e.name.unwrap_or_default(),
            space_guid: e.space_guid.unwrap_or_default(),
            state: e.state,
            package_state: e.package_state,
            staging_failed_reason: e.staging_failed_reason.unwrap_or_default(),
            staging_failed_description: e.staging_failed_description.unwrap_or_default(),
            instances: e.instances,
            memory: e.memory.unwrap_or_default(),
            disk_quota: e.disk_quota.unwrap_or_default(),
            buildpack: e.buildpack.unwrap_or_default(),
            detected_buildpack: e.detected_buildpack.unwrap_or_default(),
            stack_guid: e.stack_guid.unwrap_or_default(),
            docker_image: e.docker_image.unwrap_or_default(),
            health_check_type: e.health_check_type.unwrap_or_default(),
            command: e.command.unwrap_or_default(),
            detected_start_command: e.detected_start_command.unwrap_or_default(),
            package_updated_at: e.package_updated_at,
        }
    }
}

/// Body of `PUT /v2/apps/:guid`; unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ApplicationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceState {
    Starting,
    Running,
    Crashed,
    Flapping,
    Down,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One entry of `GET /v2/apps/:guid/instances`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationInstance {
    pub id: usize,
    pub state: InstanceState,
    pub since: f64,
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstanceEntry {
    #[serde(default)]
    state: InstanceState,
    #[serde(default)]
    since: f64,
    #[serde(default)]
    details: Option<String>,
}

pub(crate) fn instances_from_map(map: BTreeMap<String, InstanceEntry>) -> Vec<ApplicationInstance> {
    let mut instances: Vec<_> = map
        .into_iter()
        .filter_map(|(id, e)| {
            Some(ApplicationInstance {
                id: id.parse().ok()?,
                state: e.state,
                since: e.since,
                details: e.details.unwrap_or_default(),
            })
        })
        .collect();
    instances.sort_by_key(|i| i.id);
    instances
}

/// One entry of `GET /v2/apps/:guid/stats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationInstanceStatus {
    pub id: usize,
    pub state: InstanceState,
    pub cpu: f64,
    pub memory: u64,
    pub memory_quota: u64,
    pub disk: u64,
    pub disk_quota: u64,
    pub uptime: u64,
    pub isolation_segment: String,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    cpu: f64,
    #[serde(default)]
    mem: u64,
    #[serde(default)]
    disk: u64,
}

#[derive(Debug, Default, Deserialize)]
struct Stats {
    #[serde(default)]
    usage: Usage,
    #[serde(default)]
    mem_quota: u64,
    #[serde(default)]
    disk_quota: u64,
    #[serde(default)]
    uptime: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusEntry {
    #[serde(default)]
    state: InstanceState,
    #[serde(default)]
    isolation_segment: Option<String>,
    #[serde(default)]
    stats: Stats,
}

pub(crate) fn statuses_from_map(
    map: BTreeMap<String, StatusEntry>,
) -> Vec<ApplicationInstanceStatus> {
    let mut statuses: Vec<_> = map
        .into_iter()
        .filter_map(|(id, e)| {
            Some(ApplicationInstanceStatus {
                id: id.parse().ok()?,
                state: e.state,
                cpu: e.stats.usage.cpu,
                memory: e.stats.usage.mem,
                memory_quota: e.stats.mem_quota,
                disk: e.stats.usage.disk,
                disk_quota: e.stats.disk_quota,
                uptime: e.stats.uptime,
                isolation_segment: e.isolation_segment.unwrap_or_default(),
            })
        })
        .collect();
    statuses.sort_by_key(|s| s.id);
    statuses
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub guid: String,
    pub host: String,
    pub domain_guid: String,
    pub path: String,
    pub port: Option<u16>,
    pub space_guid: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RouteEntity {
    host: Option<String>,
    domain_guid: Option<String>,
    path: Option<String>,
    port: Option<u16>,
    space_guid: Option<String>,
}

impl From<Resource<RouteEntity>> for Route {
    fn from(r: Resource<RouteEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            host: e.host.unwrap_or_default(),
            domain_guid: e.domain_guid.unwrap_or_default(),
            path: e.path.unwrap_or_default(),
            port: e.port,
            space_guid: e.space_guid.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DomainType {
    #[default]
    Shared,
    Private,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domain {
    pub guid: String,
    pub name: String,
    pub router_group_guid: String,
    pub router_group_type: String,
    pub domain_type: DomainType,
    pub internal: bool,
}

impl Domain {
    pub fn is_tcp(&self) -> bool {
        self.router_group_type == "tcp"
    }

    pub fn is_shared(&self) -> bool {
        self.domain_type == DomainType::Shared
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DomainEntity {
    name: Option<String>,
    router_group_guid: Option<String>,
    router_group_type: Option<String>,
    internal: Option<bool>,
    owning_organization_guid: Option<String>,
}

impl From<Resource<DomainEntity>> for Domain {
    fn from(r: Resource<DomainEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            name: e.name.unwrap_or_default(),
            router_group_guid: e.router_group_guid.unwrap_or_default(),
            router_group_type: e.router_group_type.unwrap_or_default(),
            domain_type: if e.owning_organization_guid.is_some() {
                DomainType::Private
            } else {
                DomainType::Shared
            },
            internal: e.internal.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ServiceInstanceType {
    #[default]
    #[serde(rename = "managed_service_instance")]
    Managed,
    #[serde(rename = "user_provided_service_instance")]
    UserProvided,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInstance {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    pub service_guid: String,
    pub service_plan_guid: String,
    pub instance_type: ServiceInstanceType,
    pub tags: Vec<String>,
    pub dashboard_url: String,
}

impl ServiceInstance {
    pub fn is_managed(&self) -> bool {
        self.instance_type == ServiceInstanceType::Managed
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServiceInstanceEntity {
    name: Option<String>,
    space_guid: Option<String>,
    service_guid: Option<String>,
    service_plan_guid: Option<String>,
    #[serde(default, rename = "type")]
    instance_type: ServiceInstanceType,
    tags: Option<Vec<String>>,
    dashboard_url: Option<String>,
}

impl From<Resource<ServiceInstanceEntity>> for ServiceInstance {
    fn from(r: Resource<ServiceInstanceEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            name: e.name.unwrap_or_default(),
            space_guid: e.space_guid.unwrap_or_default(),
            service_guid: e.service_guid.unwrap_or_default(),
            service_plan_guid: e.service_plan_guid.unwrap_or_default(),
            instance_type: e.instance_type,
            tags: e.tags.unwrap_or_default(),
            dashboard_url: e.dashboard_url.unwrap_or_default(),
        }
    }
}

/// A space a service instance has been shared into. The endpoint returns flat records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceInstanceSharedTo {
    #[serde(default)]
    pub space_guid: String,
    #[serde(default)]
    pub space_name: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub bound_app_count: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlatPage<T> {
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityGroup {
    pub guid: String,
    pub name: String,
    pub running_default: bool,
    pub staging_default: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SecurityGroupEntity {
    name: Option<String>,
    running_default: Option<bool>,
    staging_default: Option<bool>,
}

impl From<Resource<SecurityGroupEntity>> for SecurityGroup {
    fn from(r: Resource<SecurityGroupEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            name: e.name.unwrap_or_default(),
            running_default: e.running_default.unwrap_or_default(),
            staging_default: e.staging_default.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub guid: String,
    pub name: String,
    pub quota_definition_guid: String,
    pub default_isolation_segment_guid: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OrganizationEntity {
    name: Option<String>,
    quota_definition_guid: Option<String>,
    default_isolation_segment_guid: Option<String>,
}

impl From<Resource<OrganizationEntity>> for Organization {
    fn from(r: Resource<OrganizationEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            name: e.name.unwrap_or_default(),
            quota_definition_guid: e.quota_definition_guid.unwrap_or_default(),
            default_isolation_segment_guid: e.default_isolation_segment_guid.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Space {
    pub guid: String,
    pub name: String,
    pub organization_guid: String,
    pub allow_ssh: bool,
    pub space_quota_definition_guid: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SpaceEntity {
    name: Option<String>,
    organization_guid: Option<String>,
    allow_ssh: Option<bool>,
    space_quota_definition_guid: Option<String>,
}

impl From<Resource<SpaceEntity>> for Space {
    fn from(r: Resource<SpaceEntity>) -> Self {
        let e = r.entity;
        Self {
            guid: r.metadata.guid,
            name: e.name.unwrap_or_default(),
            organization_guid: e.organization_guid.unwrap_or_default(),
            allow_ssh: e.allow_ssh.unwrap_or_default(),
            space_quota_definition_guid: e.space_quota_definition_guid.unwrap_or_default(),
        }
    }
}
