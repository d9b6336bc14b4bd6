use super::{Actor, Organization};
use crate::actor::{ActionError, ResourceKey};
use crate::api::ccv3::{CloudControllerV3, Query, QueryKey};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

impl<C: CloudControllerV3> Actor<C> {
    pub fn get_organization_by_name(&self, name: &str) -> Warned<Organization> {
        let query = [Query::new(QueryKey::Names, &[name])];
        Warned::collect(|warnings: &mut Warnings| {
            let orgs = self.client.get_organizations(&query).merge_into(warnings)?;
            orgs.into_iter()
                .next()
                .ok_or_else(|| Error::from(ActionError::OrganizationNotFound(ResourceKey::name(name))))
        })
    }
}
