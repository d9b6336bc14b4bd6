use super::{Actor, SecurityGroup};
use crate::actor::{ActionError, ResourceKey};
use crate::api::ccv2::{CloudControllerV2, Filter, FilterType};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};
use std::fmt;
use std::str::FromStr;

/// Which phase of an app's life a security group applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecurityGroupLifecycle {
    #[default]
    Running,
    Staging,
}

impl fmt::Display for SecurityGroupLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SecurityGroupLifecycle::Running => "running",
            SecurityGroupLifecycle::Staging => "staging",
        })
    }
}

impl FromStr for SecurityGroupLifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(SecurityGroupLifecycle::Running),
            "staging" => Ok(SecurityGroupLifecycle::Staging),
            other => Err(format!("invalid lifecycle '{other}'")),
        }
    }
}

impl<C: CloudControllerV2> Actor<C> {
    pub fn get_security_group_by_name(&self, name: &str) -> Warned<SecurityGroup> {
        let filters = [Filter::eq(FilterType::Name, name)];
        Warned::collect(|warnings: &mut Warnings| {
            let groups = self.client.get_security_groups(&filters).merge_into(warnings)?;
            groups.into_iter().next().ok_or_else(|| {
                Error::from(ActionError::SecurityGroupNotFound(ResourceKey::name(name)))
            })
        })
    }

    pub fn bind_security_group_to_space(
        &self,
        group_guid: &str,
        space_guid: &str,
        lifecycle: SecurityGroupLifecycle,
    ) -> Warned<()> {
        match lifecycle {
            SecurityGroupLifecycle::Running => self
                .client
                .update_security_group_space(group_guid, space_guid)
                .err_into(),
            SecurityGroupLifecycle::Staging => self
                .client
                .update_security_group_staging_space(group_guid, space_guid)
                .err_into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fakes::FakeCloudControllerV2;
    use crate::api::CcError;

    #[test]
    fn lifecycle_parses_and_prints() {
        assert_eq!(
            "staging".parse::<SecurityGroupLifecycle>(),
            Ok(SecurityGroupLifecycle::Staging)
        );
        assert!("launch".parse::<SecurityGroupLifecycle>().is_err());
        assert_eq!(SecurityGroupLifecycle::Running.to_string(), "running");
    }

    #[test]
    fn security_group_by_name() {
        let fake = FakeCloudControllerV2::default();
        fake.get_security_groups.returns(Warned::ok(
            vec![SecurityGroup {
                guid: "sg-guid".into(),
                name: "open".into(),
                ..SecurityGroup::default()
            }],
            Warnings::from_strs(&["sg-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_security_group_by_name("open");
        assert_eq!(out.result.unwrap().guid, "sg-guid");
        assert_eq!(out.warnings.as_strs(), vec!["sg-warning"]);
    }

    #[test]
    fn missing_security_group() {
        let fake = FakeCloudControllerV2::default();
        let actor = Actor::new(&fake);
        let out = actor.get_security_group_by_name("open");
        assert!(matches!(
            out.result,
            Err(Error::Action(ActionError::SecurityGroupNotFound(ResourceKey::Name(_))))
        ));
    }

    #[test]
    fn binding_picks_the_lifecycle_endpoint() {
        let fake = FakeCloudControllerV2::default();
        fake.update_security_group_staging_space
            .returns(Warned::ok((), Warnings::from_strs(&["staging-warning"])));
        let actor = Actor::new(&fake);

        let out =
            actor.bind_security_group_to_space("sg", "space", SecurityGroupLifecycle::Staging);
        assert!(out.is_ok());
        assert_eq!(out.warnings.as_strs(), vec!["staging-warning"]);
        assert_eq!(fake.update_security_group_space.call_count(), 0);
        assert_eq!(
            fake.update_security_group_staging_space.args_for_call(0),
            ("sg".to_string(), "space".to_string())
        );
    }

    #[test]
    fn binding_errors_pass_through() {
        let fake = FakeCloudControllerV2::default();
        fake.update_security_group_space.returns(Warned::err(
            CcError::Forbidden {
                message: "nope".into(),
            },
            Warnings::from_strs(&["w"]),
        ));
        let actor = Actor::new(&fake);

        let out =
            actor.bind_security_group_to_space("sg", "space", SecurityGroupLifecycle::Running);
        assert!(matches!(out.result, Err(Error::Api(CcError::Forbidden { .. }))));
        assert_eq!(out.warnings.as_strs(), vec!["w"]);
    }
}
