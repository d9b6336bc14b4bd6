use super::{Actor, V2Actor, V3Actor};
use crate::actor::ActionError;
use crate::api::CcError;
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

/// Reads the reason out of a rejected share. The API only says why in prose.
fn not_shareable(message: &str) -> Option<ActionError> {
    let lowered = message.to_lowercase();
    let flag_disabled = lowered.contains("service_instance_sharing");
    let broker_disabled = lowered.contains("service broker") && lowered.contains("sharing");
    if !flag_disabled && !broker_disabled {
        return None;
    }
    Some(ActionError::ServiceInstanceNotShareable {
        feature_flag_enabled: !flag_disabled,
        service_broker_sharing_enabled: !broker_disabled,
    })
}

impl<V2: V2Actor, V3: V3Actor> Actor<V2, V3> {
    pub fn share_service_instance_to_space_name_by_name_and_space_and_organization(
        &self,
        share_to_space_name: &str,
        service_instance_name: &str,
        source_space_guid: &str,
        share_to_org_guid: &str,
    ) -> Warned<()> {
        Warned::collect(|warnings: &mut Warnings| {
            let service_instance = self
                .v2
                .get_service_instance_by_name_and_space(service_instance_name, source_space_guid)
                .merge_into(warnings)
                .map_err(|e| match e {
                    Error::Action(ActionError::ServiceInstanceNotFound(_)) => {
                        Error::from(ActionError::SharedServiceInstanceNotFound {
                            name: service_instance_name.to_string(),
                        })
                    }
                    other => other,
                })?;

            let shared_tos = self
                .v2
                .get_service_instance_shared_tos_by_service_instance(&service_instance.guid)
                .merge_into(warnings)?;

            let space = self
                .v2
                .get_space_by_organization_and_name(share_to_org_guid, share_to_space_name)
                .merge_into(warnings)?;

            if shared_tos.iter().any(|s| s.space_guid == space.guid) {
                warnings.push(format!(
                    "Service instance {service_instance_name} is already shared with that space."
                ));
                return Err(Error::from(ActionError::ServiceInstanceAlreadyShared));
            }

            self.v3
                .share_service_instance_to_spaces(&service_instance.guid, &[space.guid])
                .merge_into(warnings)
                .map_err(|e| match e {
                    Error::Api(CcError::UnprocessableEntity { ref message }) => {
                        not_shareable(message).map(Error::from).unwrap_or(e)
                    }
                    other => other,
                })?;
            Ok(())
        })
    }

    /// Resolves the organization through `/v3` first.
    pub fn share_service_instance_to_space_name_by_name_and_space_and_organization_name(
        &self,
        share_to_space_name: &str,
        service_instance_name: &str,
        source_space_guid: &str,
        share_to_org_name: &str,
    ) -> Warned<()> {
        Warned::collect(|warnings: &mut Warnings| {
            let org = self
                .v3
                .get_organization_by_name(share_to_org_name)
                .merge_into(warnings)?;
            self.share_service_instance_to_space_name_by_name_and_space_and_organization(
                share_to_space_name,
                service_instance_name,
                source_space_guid,
                &org.guid,
            )
            .merge_into(warnings)
        })
    }
}
