use super::{Actor, V2Actor, V3Actor};
use crate::actor::v2action::{ApplicationInstanceWithStats, Route};
use crate::actor::v3action::{self, sort_process_summaries};
use crate::warnings::{Warned, Warnings};

/// The v3 summary plus what only `/v2` knows: routes and per-instance stats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationSummary {
    pub summary: v3action::ApplicationSummary,
    pub routes: Vec<Route>,
    pub instances: Vec<ApplicationInstanceWithStats>,
}

impl<V2: V2Actor, V3: V3Actor> Actor<V2, V3> {
    /// Routes and instance stats are optional: a 404 from either leaves them empty.
    /// Stats are only fetched for a started app.
    pub fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ApplicationSummary> {
        Warned::collect(|warnings: &mut Warnings| {
            let mut summary = self
                .v3
                .get_application_summary_by_name_and_space(name, space_guid)
                .merge_into(warnings)?;
            sort_process_summaries(&mut summary.process_summaries);

            let app_guid = summary.application.guid.clone();
            let routes = match self.v2.get_application_routes(&app_guid).merge_into(warnings) {
                Ok(routes) => routes,
                Err(e) if e.is_not_found() => Vec::new(),
                Err(e) => return Err(e),
            };

            let mut instances = Vec::new();
            if summary.application.started() {
                instances = match self
                    .v2
                    .get_application_instances_with_stats_by_application(&app_guid)
                    .merge_into(warnings)
                {
                    Ok(instances) => instances,
                    Err(e) if e.is_not_found() => Vec::new(),
                    Err(e) => return Err(e),
                };
            }

            Ok(ApplicationSummary {
                summary,
                routes,
                instances,
            })
        })
    }
}
