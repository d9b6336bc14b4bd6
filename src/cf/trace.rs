//! Request tracing, driven by `CF_TRACE` and `CF_LOG_LEVEL`.
//!
//! `CF_TRACE=true` writes every HTTP round-trip to stderr, any other non-boolean value is
//! taken as a file to append to. Without it, nothing is logged unless `CF_LOG_LEVEL`
//! names a level, which then goes to stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Off,
    Stderr,
    File(PathBuf),
}

impl Destination {
    pub fn from_setting(trace: Option<&str>, log_level: Option<&str>) -> Self {
        let trace = trace.map(str::trim).filter(|t| !t.is_empty());
        match trace.map(|t| t.to_ascii_lowercase()) {
            Some(t) if t == "true" || t == "1" => Destination::Stderr,
            Some(t) if t == "false" || t == "0" => Self::level_only(log_level),
            Some(_) => Destination::File(PathBuf::from(trace.unwrap_or_default())),
            None => Self::level_only(log_level),
        }
    }

    fn level_only(log_level: Option<&str>) -> Self {
        match log_level {
            Some(level) if !level.trim().is_empty() => Destination::Stderr,
            _ => Destination::Off,
        }
    }
}

/// The filter directive for a destination: `CF_LOG_LEVEL` if given, else `trace`.
pub fn filter_directive(destination: &Destination, log_level: Option<&str>) -> String {
    if *destination == Destination::Off {
        return "off".to_string();
    }
    let level = log_level.map(str::trim).filter(|l| !l.is_empty());
    format!("cf={}", level.unwrap_or("trace"))
}

/// Installs the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(trace: Option<&str>, log_level: Option<&str>) {
    let destination = Destination::from_setting(trace, log_level);
    let filter = EnvFilter::try_new(filter_directive(&destination, log_level))
        .unwrap_or_else(|_| EnvFilter::new("cf=trace"));
    let builder = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(false);

    let file = match &destination {
        Destination::File(path) => OpenOptions::new().create(true).append(true).open(path).ok(),
        _ => None,
    };

    let _ = match file {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_follows_cf_trace() {
        assert_eq!(Destination::from_setting(None, None), Destination::Off);
        assert_eq!(Destination::from_setting(Some("false"), None), Destination::Off);
        assert_eq!(Destination::from_setting(Some("true"), None), Destination::Stderr);
        assert_eq!(Destination::from_setting(Some("TRUE"), None), Destination::Stderr);
        assert_eq!(
            Destination::from_setting(Some("/tmp/cf.log"), None),
            Destination::File(PathBuf::from("/tmp/cf.log"))
        );
    }

    #[test]
    fn log_level_alone_enables_stderr() {
        assert_eq!(
            Destination::from_setting(None, Some("debug")),
            Destination::Stderr
        );
        assert_eq!(
            filter_directive(&Destination::Stderr, Some("debug")),
            "cf=debug"
        );
        assert_eq!(filter_directive(&Destination::Stderr, None), "cf=trace");
        assert_eq!(filter_directive(&Destination::Off, Some("debug")), "off");
    }
}
