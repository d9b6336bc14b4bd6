use super::{Actor, Application, Droplet, Process, ProcessInstance};
use crate::api::ccv3::{CloudControllerV3, Query, QueryKey};
use crate::error::Error;
use crate::warnings::{Warned, Warnings};
use std::cmp::Ordering;

/// A process with the live state of its instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSummary {
    pub process: Process,
    pub instances: Vec<ProcessInstance>,
}

impl ProcessSummary {
    pub fn healthy_instance_count(&self) -> usize {
        self.instances.iter().filter(|i| i.running()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationSummary {
    pub application: Application,
    pub current_droplet: Option<Droplet>,
    pub process_summaries: Vec<ProcessSummary>,
}

/// `web` first, the rest by type.
pub fn sort_process_summaries(summaries: &mut [ProcessSummary]) {
    summaries.sort_by(|a, b| {
        let (a, b) = (a.process.process_type.as_str(), b.process.process_type.as_str());
        match (a == "web", b == "web") {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.cmp(b),
        }
    });
}

impl<C: CloudControllerV3> Actor<C> {
    fn get_process_summaries(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> Result<Vec<ProcessSummary>, Error> {
        let processes = self
            .client
            .get_application_processes(app_guid)
            .merge_into(warnings)?;

        let mut summaries = Vec::with_capacity(processes.len());
        for process in processes {
            let instances = self
                .client
                .get_process_instances(&process.guid)
                .merge_into(warnings)?;
            summaries.push(ProcessSummary { process, instances });
        }
        Ok(summaries)
    }

    /// `None` when the app has never been staged.
    fn get_current_droplet(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> Result<Option<Droplet>, Error> {
        let query = [Query::new(QueryKey::Current, &["true"])];
        match self
            .client
            .get_application_droplets(app_guid, &query)
            .merge_into(warnings)
        {
            Ok(droplets) => Ok(droplets.into_iter().next()),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_application_summary_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<ApplicationSummary> {
        Warned::collect(|warnings: &mut Warnings| {
            let application = self
                .get_application_by_name_and_space(name, space_guid)
                .merge_into(warnings)?;
            let process_summaries = self.get_process_summaries(&application.guid, warnings)?;
            let current_droplet = self.get_current_droplet(&application.guid, warnings)?;

            Ok(ApplicationSummary {
                application,
                current_droplet,
                process_summaries,
            })
        })
    }
}
