use super::{Actor, Organization, Space};
use crate::actor::{ActionError, ResourceKey};
use crate::api::ccv2::{CloudControllerV2, Filter, FilterType};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

impl<C: CloudControllerV2> Actor<C> {
    pub fn get_organization_by_name(&self, name: &str) -> Warned<Organization> {
        let filters = [Filter::eq(FilterType::Name, name)];
        Warned::collect(|warnings: &mut Warnings| {
            let orgs = self.client.get_organizations(&filters).merge_into(warnings)?;
            orgs.into_iter()
                .next()
                .ok_or_else(|| Error::from(ActionError::OrganizationNotFound(ResourceKey::name(name))))
        })
    }

    pub fn get_space_by_organization_and_name(
        &self,
        org_guid: &str,
        space_name: &str,
    ) -> Warned<Space> {
        let filters = [
            Filter::eq(FilterType::Name, space_name),
            Filter::eq(FilterType::OrganizationGuid, org_guid),
        ];
        Warned::collect(|warnings: &mut Warnings| {
            let spaces = self.client.get_spaces(&filters).merge_into(warnings)?;
            spaces
                .into_iter()
                .next()
                .ok_or_else(|| Error::from(ActionError::SpaceNotFound(ResourceKey::name(space_name))))
        })
    }

    pub fn get_organization_spaces(&self, org_guid: &str) -> Warned<Vec<Space>> {
        self.client
            .get_spaces(&[Filter::eq(FilterType::OrganizationGuid, org_guid)])
            .err_into()
    }
}
