//! Operations backed by the `/v3` API.

mod application;
mod organization;
mod service_instance;
mod summary;
mod task;

pub use summary::{sort_process_summaries, ApplicationSummary, ProcessSummary};

pub use crate::api::ccv3::{Application, Droplet, Organization, Process, ProcessInstance, Task};

use crate::api::ccv3::CloudControllerV3;
use crate::warnings::Warned;

/// First v3 API version whose service-instance sharing endpoint the CLI relies on.
pub const MIN_VERSION_SHARE_SERVICE: &str = "3.36.0";

pub struct Actor<C> {
    client: C,
}

impl<C: CloudControllerV3> Actor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The v3 version advertised by the root document.
    pub fn cloud_controller_api_version(&self) -> Warned<String> {
        self.client
            .get_root()
            .map(|root| root.cloud_controller_v3_version)
            .err_into()
    }
}
