use super::{Actor, ServiceInstance, ServiceInstanceSharedTo};
use crate::actor::{ActionError, ResourceKey};
use crate::api::ccv2::{CloudControllerV2, Filter, FilterType};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

impl<C: CloudControllerV2> Actor<C> {
    /// Managed and user-provided instances are both considered.
    pub fn get_service_instance_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ServiceInstance> {
        let filters = [Filter::eq(FilterType::Name, name)];
        Warned::collect(|warnings: &mut Warnings| {
            let instances = self
                .client
                .get_space_service_instances(space_guid, &filters)
                .merge_into(warnings)?;
            instances.into_iter().next().ok_or_else(|| {
                Error::from(ActionError::ServiceInstanceNotFound(ResourceKey::name(name)))
            })
        })
    }

    pub fn get_service_instance_shared_tos_by_service_instance(
        &self,
        guid: &str,
    ) -> Warned<Vec<ServiceInstanceSharedTo>> {
        self.client.get_service_instance_shared_tos(guid).err_into()
    }
}
