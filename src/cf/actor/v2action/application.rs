use super::{Actor, Application};
use crate::actor::{not_found_as, ActionError, ResourceKey};
use crate::api::ccv2::{CloudControllerV2, Filter, FilterType, InstanceState};
use crate::api::CcError;
use crate::error::Error;
use crate::warnings::{Warned, Warnings};

/// An instance as reported by `/instances`, enriched with `/stats` usage when available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationInstanceWithStats {
    pub id: usize,
    pub state: InstanceState,
    pub since: f64,
    pub details: String,
    pub cpu: f64,
    pub memory: u64,
    pub memory_quota: u64,
    pub disk: u64,
    pub disk_quota: u64,
    pub isolation_segment: String,
}

impl<C: CloudControllerV2> Actor<C> {
    pub fn get_application(&self, guid: &str) -> Warned<Application> {
        self.client
            .get_application(guid)
            .map_err(|e| not_found_as(e, || ActionError::ApplicationNotFound(ResourceKey::guid(guid))))
    }

    pub fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        let filters = [
            Filter::eq(FilterType::Name, name),
            Filter::eq(FilterType::SpaceGuid, space_guid),
        ];
        Warned::collect(|warnings: &mut Warnings| {
            let apps = self.client.get_applications(&filters).merge_into(warnings)?;
            apps.into_iter()
                .next()
                .ok_or_else(|| Error::from(ActionError::ApplicationNotFound(ResourceKey::name(name))))
        })
    }

    /// Stats first, then instances, joined on the instance index. A stopped or unstaged
    /// app has no stats, which is not an error.
    pub fn get_application_instances_with_stats_by_application(
        &self,
        guid: &str,
    ) -> Warned<Vec<ApplicationInstanceWithStats>> {
        Warned::collect(|warnings: &mut Warnings| {
            let stats = match self
                .client
                .get_application_instance_statuses(guid)
                .merge_into(warnings)
            {
                Ok(stats) => stats,
                Err(CcError::AppStoppedStats { .. }) | Err(CcError::NotStaged { .. }) => {
                    return Ok(Vec::new())
                }
                Err(e) => return Err(Error::from(e)),
            };

            let instances = self
                .client
                .get_application_instances(guid)
                .merge_into(warnings)?;

            Ok(instances
                .into_iter()
                .map(|instance| {
                    let mut merged = ApplicationInstanceWithStats {
                        id: instance.id,
                        state: instance.state,
                        since: instance.since,
                        details: instance.details,
                        ..Default::default()
                    };
                    if let Some(stat) = stats.iter().find(|s| s.id == instance.id) {
                        merged.cpu = stat.cpu;
                        merged.memory = stat.memory;
                        merged.memory_quota = stat.memory_quota;
                        merged.disk = stat.disk;
                        merged.disk_quota = stat.disk_quota;
                        merged.isolation_segment = stat.isolation_segment.clone();
                    }
                    merged
                })
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ccv2::{ApplicationInstance, ApplicationInstanceStatus};
    use crate::api::fakes::FakeCloudControllerV2;

    fn not_found() -> CcError {
        CcError::ResourceNotFound {
            message: "404".into(),
        }
    }

    #[test]
    fn get_application_maps_404_to_guid_keyed_error() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application
            .returns(Warned::err(not_found(), Warnings::from_strs(&["w"])));
        let actor = Actor::new(&fake);

        let out = actor.get_application("app-guid");
        assert!(matches!(
            out.result,
            Err(Error::Action(ActionError::ApplicationNotFound(ResourceKey::Guid(ref g)))) if g == "app-guid"
        ));
        assert_eq!(out.warnings.as_strs(), vec!["w"]);
    }

    #[test]
    fn by_name_filters_on_name_and_space() {
        let fake = FakeCloudControllerV2::default();
        fake.get_applications.returns(Warned::ok(
            vec![Application {
                guid: "app-guid".into(),
                name: "dora".into(),
                ..Application::default()
            }],
            Warnings::from_strs(&["get-apps-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_application_by_name_and_space("dora", "space-guid");
        assert_eq!(out.result.unwrap().guid, "app-guid");
        assert_eq!(out.warnings.as_strs(), vec!["get-apps-warning"]);
        assert_eq!(
            fake.get_applications.args_for_call(0),
            vec![
                Filter::eq(FilterType::Name, "dora"),
                Filter::eq(FilterType::SpaceGuid, "space-guid"),
            ]
        );
    }

    #[test]
    fn by_name_empty_result_is_name_keyed_not_found() {
        let fake = FakeCloudControllerV2::default();
        fake.get_applications
            .returns(Warned::ok(vec![], Warnings::from_strs(&["w"])));
        let actor = Actor::new(&fake);

        let out = actor.get_application_by_name_and_space("dora", "space-guid");
        assert!(matches!(
            out.result,
            Err(Error::Action(ActionError::ApplicationNotFound(ResourceKey::Name(ref n)))) if n == "dora"
        ));
        assert_eq!(out.warnings.as_strs(), vec!["w"]);
    }

    #[test]
    fn by_name_takes_the_first_of_several_matches() {
        let fake = FakeCloudControllerV2::default();
        fake.get_applications.returns(Warned::ok(
            vec![
                Application {
                    guid: "first".into(),
                    ..Application::default()
                },
                Application {
                    guid: "second".into(),
                    ..Application::default()
                },
            ],
            Warnings::new(),
        ));
        let actor = Actor::new(&fake);
        assert_eq!(
            actor
                .get_application_by_name_and_space("dora", "space")
                .result
                .unwrap()
                .guid,
            "first"
        );
    }

    #[test]
    fn instances_are_joined_with_stats() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application_instance_statuses.returns(Warned::ok(
            vec![ApplicationInstanceStatus {
                id: 0,
                cpu: 0.5,
                memory: 100,
                isolation_segment: "iso".into(),
                ..Default::default()
            }],
            Warnings::from_strs(&["stats-warning"]),
        ));
        fake.get_application_instances.returns(Warned::ok(
            vec![
                ApplicationInstance {
                    id: 0,
                    state: InstanceState::Running,
                    ..Default::default()
                },
                ApplicationInstance {
                    id: 1,
                    state: InstanceState::Starting,
                    ..Default::default()
                },
            ],
            Warnings::from_strs(&["instances-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_application_instances_with_stats_by_application("app-guid");
        let instances = out.result.unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].memory, 100);
        assert_eq!(instances[0].isolation_segment, "iso");
        assert_eq!(instances[1].state, InstanceState::Starting);
        assert_eq!(instances[1].memory, 0);
        assert_eq!(
            out.warnings.as_strs(),
            vec!["stats-warning", "instances-warning"]
        );
    }

    #[test]
    fn stopped_app_has_no_instances() {
        let fake = FakeCloudControllerV2::default();
        fake.get_application_instance_statuses.returns(Warned::err(
            CcError::AppStoppedStats {
                message: "stopped".into(),
            },
            Warnings::from_strs(&["stats-warning"]),
        ));
        let actor = Actor::new(&fake);

        let out = actor.get_application_instances_with_stats_by_application("app-guid");
        assert_eq!(out.result.unwrap(), vec![]);
        assert_eq!(out.warnings.as_strs(), vec!["stats-warning"]);
        assert_eq!(fake.get_application_instances.call_count(), 0);
    }
}
