use super::{Actor, Application};
use crate::actor::{ActionError, ResourceKey};
use crate::api::ccv3::{CloudControllerV3, Query, QueryKey};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

impl<C: CloudControllerV3> Actor<C> {
    pub fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        let query = [
            Query::new(QueryKey::Names, &[name]),
            Query::new(QueryKey::SpaceGuids, &[space_guid]),
        ];
        Warned::collect(|warnings: &mut Warnings| {
            let apps = self.client.get_applications(&query).merge_into(warnings)?;
            apps.into_iter()
                .next()
                .ok_or_else(|| Error::from(ActionError::ApplicationNotFound(ResourceKey::name(name))))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fakes::FakeCloudControllerV3;
    use crate::api::CcError;

    #[test]
    fn queries_by_name_and_space() {
        let fake = FakeCloudControllerV3::default();
        fake.get_applications.returns(Warned::ok(
            vec![Application {
                guid: "app-guid".into(),
                name: "dora".into(),
                ..Application::default()
            }],
            Warnings::from_strs(&["apps-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_application_by_name_and_space("dora", "space-guid");
        assert_eq!(out.result.unwrap().guid, "app-guid");
        assert_eq!(out.warnings.as_strs(), vec!["apps-warning"]);
        assert_eq!(
            fake.get_applications.args_for_call(0),
            vec![
                Query::new(QueryKey::Names, &["dora"]),
                Query::new(QueryKey::SpaceGuids, &["space-guid"]),
            ]
        );
    }

    #[test]
    fn empty_result_is_name_keyed_not_found() {
        let fake = FakeCloudControllerV3::default();
        fake.get_applications
            .returns(Warned::ok(vec![], Warnings::from_strs(&["apps-warning"])));
        let actor = Actor::new(&fake);

        let out = actor.get_application_by_name_and_space("dora", "space-guid");
        assert!(matches!(
            out.result,
            Err(Error::Action(ActionError::ApplicationNotFound(ResourceKey::Name(ref n)))) if n == "dora"
        ));
        assert_eq!(out.warnings.as_strs(), vec!["apps-warning"]);
    }

    #[test]
    fn client_errors_pass_through() {
        let fake = FakeCloudControllerV3::default();
        fake.get_applications.returns(Warned::err(
            CcError::Unauthorized {
                message: "expired".into(),
            },
            Warnings::new(),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_application_by_name_and_space("dora", "space-guid");
        assert!(matches!(out.result, Err(Error::Api(CcError::Unauthorized { .. }))));
    }
}
