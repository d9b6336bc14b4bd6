//! Operations backed by the `/v2` API.

mod application;
mod domain;
mod logging;
mod organization;
mod route;
mod security_group;
mod service_instance;
mod start;

pub use application::ApplicationInstanceWithStats;
pub use logging::{StopHandle, LOG_CACHE_RETRIES};
pub use route::Route;
pub use security_group::SecurityGroupLifecycle;
pub use start::{ApplicationStateChange, PollingSettings, StartStreams};

pub use crate::api::ccv2::{
    Application, ApplicationState, Domain, Organization, SecurityGroup, ServiceInstance,
    ServiceInstanceSharedTo, Space,
};
pub use crate::api::logcache::{LogMessage, MessageType};

use crate::api::ccv2::CloudControllerV2;

pub struct Actor<C> {
    client: C,
}

impl<C: CloudControllerV2> Actor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}
