use super::{Actor, Domain};
use crate::actor::{ActionError, ResourceKey};
use crate::api::ccv2::CloudControllerV2;
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

impl<C: CloudControllerV2> Actor<C> {
    /// Shared domains first, then private ones. Only a 404 moves on to the next lookup.
    pub fn get_domain_by_guid(&self, guid: &str) -> Warned<Domain> {
        Warned::collect(|warnings: &mut Warnings| {
            match self.client.get_shared_domain(guid).merge_into(warnings) {
                Ok(domain) => return Ok(domain),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(Error::from(e)),
            }

            match self.client.get_private_domain(guid).merge_into(warnings) {
                Ok(domain) => Ok(domain),
                Err(e) if e.is_not_found() => {
                    Err(Error::from(ActionError::DomainNotFound(ResourceKey::guid(guid))))
                }
                Err(e) => Err(Error::from(e)),
            }
        })
    }

    /// Shared domains followed by the organization's private domains.
    pub fn get_organization_domains(&self, org_guid: &str) -> Warned<Vec<Domain>> {
        Warned::collect(|warnings: &mut Warnings| {
            let mut domains = self.client.get_shared_domains(&[]).merge_into(warnings)?;
            domains.extend(
                self.client
                    .get_organization_private_domains(org_guid, &[])
                    .merge_into(warnings)?,
            );
            Ok(domains)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ccv2::DomainType;
    use crate::api::fakes::FakeCloudControllerV2;
    use crate::api::CcError;

    fn not_found() -> CcError {
        CcError::ResourceNotFound {
            message: "404".into(),
        }
    }

    fn domain(name: &str, domain_type: DomainType) -> Domain {
        Domain {
            guid: format!("{name}-guid"),
            name: name.into(),
            domain_type,
            ..Domain::default()
        }
    }

    #[test]
    fn shared_domain_wins_without_private_lookup() {
        let fake = FakeCloudControllerV2::default();
        fake.get_shared_domain.returns(Warned::ok(
            domain("shared.com", DomainType::Shared),
            Warnings::from_strs(&["shared-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_domain_by_guid("domain-guid");
        assert_eq!(out.result.unwrap().name, "shared.com");
        assert_eq!(out.warnings.as_strs(), vec!["shared-warning"]);
        assert_eq!(fake.get_private_domain.call_count(), 0);
    }

    #[test]
    fn falls_back_to_private_domain_on_404() {
        let fake = FakeCloudControllerV2::default();
        fake.get_shared_domain
            .returns(Warned::err(not_found(), Warnings::from_strs(&["shared-warning"])));
        fake.get_private_domain.returns(Warned::ok(
            domain("private.com", DomainType::Private),
            Warnings::from_strs(&["private-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_domain_by_guid("domain-guid");
        assert_eq!(out.result.unwrap(), domain("private.com", DomainType::Private));
        assert_eq!(
            out.warnings.as_strs(),
            vec!["shared-warning", "private-warning"]
        );
        assert_eq!(fake.get_private_domain.args_for_call(0), "domain-guid");
    }

    #[test]
    fn both_404_is_domain_not_found_with_all_warnings() {
        let fake = FakeCloudControllerV2::default();
        fake.get_shared_domain
            .returns(Warned::err(not_found(), Warnings::from_strs(&["shared-warning"])));
        fake.get_private_domain
            .returns(Warned::err(not_found(), Warnings::from_strs(&["private-warning"])));
        let actor = Actor::new(&fake);

        let out = actor.get_domain_by_guid("domain-guid");
        assert!(matches!(
            out.result,
            Err(Error::Action(ActionError::DomainNotFound(_)))
        ));
        assert_eq!(
            out.warnings.as_strs(),
            vec!["shared-warning", "private-warning"]
        );
    }

    #[test]
    fn other_shared_error_stops_the_chain() {
        let fake = FakeCloudControllerV2::default();
        fake.get_shared_domain.returns(Warned::err(
            CcError::Forbidden {
                message: "no".into(),
            },
            Warnings::from_strs(&["shared-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_domain_by_guid("domain-guid");
        assert!(matches!(out.result, Err(Error::Api(CcError::Forbidden { .. }))));
        assert_eq!(fake.get_private_domain.call_count(), 0);
        assert_eq!(out.warnings.as_strs(), vec!["shared-warning"]);
    }

    #[test]
    fn organization_domains_are_shared_then_private() {
        let fake = FakeCloudControllerV2::default();
        fake.get_shared_domains.returns(Warned::ok(
            vec![domain("shared.com", DomainType::Shared)],
            Warnings::from_strs(&["shared domains warning"]),
        ));
        fake.get_organization_private_domains.returns(Warned::ok(
            vec![
                domain("private.com", DomainType::Private),
                domain("other-private.com", DomainType::Private),
            ],
            Warnings::from_strs(&["private domains warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_organization_domains("org-guid");
        let names: Vec<_> = out.result.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["shared.com", "private.com", "other-private.com"]);
        assert_eq!(
            out.warnings.as_strs(),
            vec!["shared domains warning", "private domains warning"]
        );
        assert_eq!(
            fake.get_organization_private_domains.args_for_call(0),
            ("org-guid".to_string(), vec![])
        );
    }
}
