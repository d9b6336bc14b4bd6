use super::{Actor, Task};
use crate::actor::ActionError;
use crate::api::ccv3::CloudControllerV3;
use crate::api::CcError;
use crate::error::Error;
use crate::warnings::Warned;

impl<C: CloudControllerV3> Actor<C> {
    pub fn run_application_task(&self, app_guid: &str, task: &Task) -> Warned<Task> {
        self.client
            .create_application_task(app_guid, task)
            .map_err(|e| match e {
                CcError::TaskWorkersUnavailable { message } => {
                    Error::from(ActionError::TaskWorkersUnavailable { message })
                }
                other => Error::from(other),
            })
    }
}
