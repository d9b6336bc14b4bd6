use super::Actor;
use crate::api::ccv3::{CloudControllerV3, RelationshipList};
use crate::warnings::Warned;

impl<C: CloudControllerV3> Actor<C> {
    pub fn share_service_instance_to_spaces(
        &self,
        service_instance_guid: &str,
        space_guids: &[String],
    ) -> Warned<RelationshipList> {
        self.client
            .share_service_instance_to_spaces(service_instance_guid, space_guids)
            .err_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fakes::FakeCloudControllerV3;
    use crate::warnings::Warnings;

    #[test]
    fn shares_to_the_given_spaces() {
        let fake = FakeCloudControllerV3::default();
        let spaces = vec!["space-1".to_string(), "space-2".to_string()];
        fake.share_service_instance_to_spaces.returns(Warned::ok(
            RelationshipList::from_guids(&spaces),
            Warnings::from_strs(&["share-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.share_service_instance_to_spaces("si-guid", &spaces);
        assert_eq!(out.result.unwrap().guids(), spaces);
        assert_eq!(out.warnings.as_strs(), vec!["share-warning"]);
        assert_eq!(
            fake.share_service_instance_to_spaces.args_for_call(0),
            ("si-guid".to_string(), spaces)
        );
    }
}
