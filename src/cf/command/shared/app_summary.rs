use crate::actor::v2v3action::ApplicationSummary;
use crate::actor::v3action::ProcessSummary;
use crate::command::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use cfui::Ui;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;

/// Human byte sizes: `32M`, `1.5G`, `512B`.
pub fn byte_size(bytes: u64) -> String {
    let (value, unit) = match bytes {
        b if b >= TB => (b as f64 / TB as f64, "T"),
        b if b >= GB => (b as f64 / GB as f64, "G"),
        b if b >= MB => (b as f64 / MB as f64, "M"),
        b if b >= KB => (b as f64 / KB as f64, "K"),
        0 => return "0".to_string(),
        b => (b as f64, "B"),
    };
    let formatted = format!("{value:.1}");
    format!("{}{unit}", formatted.trim_end_matches(".0"))
}

fn user_friendly_date(time: DateTime<Utc>) -> String {
    time.format("%a %d %b %H:%M:%S UTC %Y").to_string()
}

fn last_uploaded(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|t| user_friendly_date(t.with_timezone(&Utc)))
        .unwrap_or_else(|_| created_at.to_string())
}

fn isolation_segment(summary: &ApplicationSummary) -> Option<String> {
    let from_v3 = summary
        .summary
        .process_summaries
        .iter()
        .flat_map(|p| p.instances.iter())
        .filter_map(|i| i.isolation_segment.clone())
        .find(|s| !s.is_empty());
    from_v3.or_else(|| {
        summary
            .instances
            .iter()
            .map(|i| i.isolation_segment.clone())
            .find(|s| !s.is_empty())
    })
}

fn app_table(summary: &ApplicationSummary) -> Vec<(String, String)> {
    let app = &summary.summary.application;
    let mut rows = vec![
        ("name:".to_string(), app.name.clone()),
        ("requested state:".to_string(), app.state.to_lowercase()),
    ];
    if let Some(segment) = isolation_segment(summary) {
        rows.push(("isolation segment:".to_string(), segment));
    }

    let routes: Vec<String> = summary.routes.iter().map(ToString::to_string).collect();
    rows.push(("routes:".to_string(), routes.join(", ")));

    let droplet = summary.summary.current_droplet.as_ref();
    rows.push((
        "last uploaded:".to_string(),
        droplet.map(|d| last_uploaded(&d.created_at)).unwrap_or_default(),
    ));

    let stack = droplet
        .and_then(|d| d.stack.clone())
        .or_else(|| app.lifecycle.data.stack.clone())
        .unwrap_or_default();
    rows.push(("stack:".to_string(), stack));

    if app.lifecycle.lifecycle_type == "docker" {
        return rows;
    }
    let buildpacks: Vec<String> = match droplet {
        Some(d) => d
            .buildpacks
            .iter()
            .map(|b| b.detect_output.clone().filter(|o| !o.is_empty()).unwrap_or_else(|| b.name.clone()))
            .collect(),
        None => app.lifecycle.data.buildpacks.clone(),
    };
    rows.push(("buildpacks:".to_string(), buildpacks.join(", ")));
    rows
}

fn display_process(ui: &mut Ui, process: &ProcessSummary, now: DateTime<Utc>) -> Result {
    let p = &process.process;
    let mut rows = vec![
        ("type:".to_string(), p.process_type.clone()),
        (
            "instances:".to_string(),
            format!("{}/{}", process.healthy_instance_count(), p.instances),
        ),
        ("memory usage:".to_string(), byte_size(p.memory_in_mb * MB)),
    ];
    if let Some(command) = p.command.as_ref().filter(|c| !c.is_empty()) {
        rows.push(("start command:".to_string(), command.clone()));
    }
    ui.display_key_value_table("", &rows, 3)?;

    if process.instances.is_empty() {
        ui.display_new_line()?;
        ui.display_text("There are no running instances of this process.", &[])?;
        return Ok(());
    }

    let mut table = vec![["", "state", "since", "cpu", "memory", "disk", "details"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>()];
    for instance in &process.instances {
        let uptime = ChronoDuration::seconds(i64::try_from(instance.uptime).unwrap_or(0));
        table.push(vec![
            format!("#{}", instance.index),
            instance.state.to_lowercase(),
            user_friendly_date(now - uptime),
            format!("{:.1}%", instance.usage.cpu * 100.0),
            format!("{} of {}", byte_size(instance.usage.mem), byte_size(instance.mem_quota)),
            format!("{} of {}", byte_size(instance.usage.disk), byte_size(instance.disk_quota)),
            instance.details.clone().unwrap_or_default(),
        ]);
    }
    ui.display_new_line()?;
    ui.display_table_with_header("", &table, 3)?;
    Ok(())
}

/// The `app` and `start` summary: the app table, then one block per process.
pub fn display_app_summary(ui: &mut Ui, summary: &ApplicationSummary) -> Result {
    ui.display_key_value_table("", &app_table(summary), 3)?;

    let now = Utc::now();
    for process in &summary.summary.process_summaries {
        ui.display_new_line()?;
        display_process(ui, process, now)?;
    }
    Ok(())
}
