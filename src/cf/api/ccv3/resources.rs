use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct Link {
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T> Page<T> {
    pub fn next_href(&self) -> Option<String> {
        self.pagination
            .next
            .as_ref()
            .and_then(|link| link.href.clone())
            .filter(|href| !href.is_empty())
    }
}

/// Links advertised by `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub cloud_controller_v2_url: String,
    pub cloud_controller_v3_url: String,
    pub cloud_controller_v3_version: String,
    pub uaa_url: String,
    pub login_url: String,
    pub log_cache_url: String,
    pub routing_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RootLink {
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
struct RootLinks {
    #[serde(default)]
    cloud_controller_v2: Option<RootLink>,
    #[serde(default)]
    cloud_controller_v3: Option<RootLink>,
    #[serde(default)]
    uaa: Option<RootLink>,
    #[serde(default)]
    login: Option<RootLink>,
    #[serde(default)]
    log_cache: Option<RootLink>,
    #[serde(default)]
    routing: Option<RootLink>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RootBody {
    #[serde(default)]
    links: RootLinks,
}

fn href(link: &Option<RootLink>) -> String {
    link.as_ref()
        .and_then(|l| l.href.clone())
        .unwrap_or_default()
}

impl From<RootBody> for Root {
    fn from(body: RootBody) -> Self {
        let links = body.links;
        Self {
            cloud_controller_v2_url: href(&links.cloud_controller_v2),
            cloud_controller_v3_url: href(&links.cloud_controller_v3),
            cloud_controller_v3_version: links
                .cloud_controller_v3
                .as_ref()
                .and_then(|l| l.meta.version.clone())
                .unwrap_or_default(),
            uaa_url: href(&links.uaa),
            login_url: href(&links.login),
            log_cache_url: href(&links.log_cache),
            routing_url: href(&links.routing),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifecycleData {
    #[serde(default)]
    pub buildpacks: Vec<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Lifecycle {
    #[serde(default, rename = "type")]
    pub lifecycle_type: String,
    #[serde(default)]
    pub data: LifecycleData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Application {
    pub fn started(&self) -> bool {
        self.state == "STARTED"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthCheck {
    #[serde(default, rename = "type")]
    pub check_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Process {
    #[serde(default)]
    pub guid: String,
    #[serde(default, rename = "type")]
    pub process_type: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub instances: u32,
    #[serde(default)]
    pub memory_in_mb: u64,
    #[serde(default)]
    pub disk_in_mb: u64,
    #[serde(default)]
    pub health_check: HealthCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub mem: u64,
    #[serde(default)]
    pub disk: u64,
}

/// One entry of `GET /v3/processes/:guid/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProcessInstance {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub mem_quota: u64,
    #[serde(default)]
    pub disk_quota: u64,
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub isolation_segment: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ProcessInstance {
    pub fn running(&self) -> bool {
        self.state == "RUNNING"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DropletBuildpack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub detect_output: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Droplet {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub buildpacks: Vec<DropletBuildpack>,
}

/// Body of `POST /v3/apps/:guid/tasks`; also the decoded response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing)]
    pub guid: String,
    #[serde(default, skip_serializing)]
    pub sequence_id: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing)]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub guid: String,
}

/// `{"data": [{"guid": ...}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Vec<Relationship>,
}

impl RelationshipList {
    pub fn from_guids(guids: &[String]) -> Self {
        Self {
            data: guids
                .iter()
                .map(|guid| Relationship { guid: guid.clone() })
                .collect(),
        }
    }

    pub fn guids(&self) -> Vec<String> {
        self.data.iter().map(|r| r.guid.clone()).collect()
    }
}
