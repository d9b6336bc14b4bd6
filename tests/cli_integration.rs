use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// A `cf` process with its own home and none of the caller's locale, color or proxy
/// settings.
fn cf(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cf").unwrap();
    cmd.env("CF_HOME", home)
        .env("CF_COLOR", "false")
        .env_remove("CF_TRACE")
        .env_remove("CF_LOG_LEVEL")
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .env_remove("HTTP_PROXY")
        .env_remove("HTTPS_PROXY")
        .env_remove("http_proxy")
        .env_remove("https_proxy");
    cmd
}

#[test]
fn test_version() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cf version 6.40.1"));

    cf(home.path())
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cf version "));
}

#[test]
fn test_bare_invocation_prints_grouped_help() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("GETTING STARTED:"))
        .stdout(predicate::str::contains("delete-orphaned-routes"));
}

#[test]
fn test_command_help() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .args(["app", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:\n   cf app APP_NAME"));
}

#[test]
fn test_unknown_command_fails() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .arg("push")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains(
            "'push' is not a registered command. See 'cf help'",
        ));
}

#[test]
fn test_missing_argument_is_incorrect_usage() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .args(["auth", "only-a-user"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Incorrect Usage: "));
}

#[test]
fn test_app_without_target_fails() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .args(["app", "dora"])
        .assert()
        .code(1)
        .stdout(predicate::eq("FAILED\n"))
        .stderr(predicate::str::contains("No API endpoint set."));
}

#[test]
fn test_config_locale_translates_output() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .args(["config", "--locale", "fr-FR"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("OK\n"));

    let saved = std::fs::read_to_string(home.path().join(".cf").join("config.json")).unwrap();
    assert!(saved.contains("fr-FR"));

    cf(home.path())
        .args(["app", "dora"])
        .assert()
        .code(1)
        .stdout(predicate::eq("ÉCHEC\n"));
}

#[test]
fn test_config_rejects_bad_color() {
    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .args(["config", "--color", "sometimes"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Incorrect Usage: "));
    assert!(!home.path().join(".cf").join("config.json").exists());
}

#[test]
fn test_corrupt_config_is_reported_and_ignored() {
    let home = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(home.path().join(".cf")).unwrap();
    std::fs::write(home.path().join(".cf").join("config.json"), "").unwrap();

    cf(home.path())
        .arg("version")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error read/writing config"));
}

fn json(body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap())
}

#[test]
fn test_api_targets_a_live_endpoint() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");

    let root = format!(
        r#"{{"links": {{
            "cloud_controller_v2": {{"href": "{base}/v2", "meta": {{"version": "2.120.0"}}}},
            "cloud_controller_v3": {{"href": "{base}/v3", "meta": {{"version": "3.55.0"}}}},
            "uaa": {{"href": "{base}/uaa"}},
            "log_cache": {{"href": "{base}/log-cache"}}
        }}}}"#
    );
    let info = format!(
        r#"{{"api_version": "2.120.0", "authorization_endpoint": "{base}/login"}}"#
    );
    let handle = thread::spawn(move || {
        for _ in 0..2 {
            let Ok(Some(request)) = server.recv_timeout(Duration::from_secs(10)) else {
                return;
            };
            let response = match request.url() {
                "/" => json(root.clone()),
                "/v2/info" => json(info.clone()).with_header(
                    Header::from_bytes(&b"X-Cf-Warnings"[..], &b"info%20warning"[..]).unwrap(),
                ),
                _ => Response::from_string("").with_status_code(404),
            };
            request.respond(response).unwrap();
        }
    });

    let home = tempfile::tempdir().unwrap();
    cf(home.path())
        .args(["api", &base])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Setting api endpoint to {base}..."
        )))
        .stdout(predicate::str::contains("api version:    2.120.0"))
        .stdout(predicate::str::contains("Not logged in. Use 'cf login' to log in."))
        .stderr(predicate::str::contains("info warning"))
        .stderr(predicate::str::contains("Insecure http API endpoint detected"));
    handle.join().unwrap();

    let saved = std::fs::read_to_string(home.path().join(".cf").join("config.json")).unwrap();
    assert!(saved.contains(&base));
    assert!(saved.contains(&format!("{base}/log-cache")));
}
