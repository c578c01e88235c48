//! CLI integration tests for run-once, dry-run, and configuration failures.
//!
//! The binary runs as a subprocess against a Wiremock stand-in for the
//! GitHub REST API, so exit codes and stdout are observed exactly as an
//! operator would see them.

mod support;

use std::process::Output;

use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use repowatch::tracking::TrackingKey;
use repowatch::{RepositorySlug, SqliteTrackingStore, TrackingStore};

use support::{create_temp_dir, repowatch_command};

const ISSUES_PATH: &str = "/repos/octo/repo/issues";
const PULLS_PATH: &str = "/repos/octo/repo/pulls";
const REPOSITORY_PATH: &str = "/repos/octo/repo";

fn args_with_smtp(server: &MockServer, smtp: &[&str]) -> Vec<String> {
    [
        "--owner",
        "octo",
        "--repo",
        "repo",
        "--token",
        "ghp_test",
        "--recipients",
        "team@example.com",
        "--smtp-from",
        "repowatch@example.com",
    ]
    .iter()
    .chain(smtp)
    .map(|arg| (*arg).to_owned())
    .chain(["--api-base".to_owned(), server.uri()])
    .collect()
}

fn base_args(server: &MockServer) -> Vec<String> {
    args_with_smtp(server, &["--smtp-host", "smtp.example.com"])
}

/// SMTP flags pointing at a local port nothing listens on.
const UNREACHABLE_SMTP: &[&str] = &[
    "--smtp-host",
    "127.0.0.1",
    "--smtp-port",
    "1",
    "--smtp-security",
    "none",
];

async fn run(args: Vec<String>) -> Output {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = repowatch_command(&arg_refs, &[]);
    tokio::process::Command::from(command)
        .output()
        .await
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"))
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn stale_issue() -> Value {
    json!({
        "number": 3,
        "title": "Crash on startup",
        "state": "open",
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2020-01-02T00:00:00Z",
        "html_url": "https://github.com/octo/repo/issues/3",
        "labels": [{"name": "bug", "color": "d73a4a"}],
        "assignees": []
    })
}

fn migrated_database() -> (TempDir, String) {
    let temp_dir = create_temp_dir();
    let db_url = temp_dir
        .path()
        .join("repowatch.sqlite")
        .to_string_lossy()
        .to_string();
    let output = repowatch_command(&["--migrate-db", "--database-url", &db_url], &[])
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"));
    assert!(output.status.success(), "migration should succeed");
    (temp_dir, db_url)
}

#[rstest]
#[case::missing_owner(&["--repo", "repo", "--dry-run"], "owner is required")]
#[case::missing_recipients(&["--owner", "octo", "--repo", "repo", "--token", "t", "--dry-run"], "recipients is required")]
#[case::unknown_backend(
    &["--owner", "octo", "--repo", "repo", "--recipients", "a@example.com", "--source-backend", "gitlab", "--dry-run"],
    "invalid source_backend"
)]
fn configuration_errors_exit_with_status_one(
    #[case] args: &[&str],
    #[case] expected_stderr: &str,
) {
    let output = repowatch_command(args, &[])
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"));

    assert_eq!(output.status.code(), Some(1), "configuration errors exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(expected_stderr),
        "expected {expected_stderr:?} in stderr: {stderr}"
    );
}

#[rstest]
#[tokio::test]
async fn run_once_requires_database_url() {
    let server = MockServer::start().await;
    let mut args = base_args(&server);
    args.push("--once".to_owned());

    let output = run(args).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("database_url is required"));
}

#[rstest]
#[tokio::test]
async fn dry_run_prints_report_without_sending() {
    let server = MockServer::start().await;
    mount_json(&server, ISSUES_PATH, json!([stale_issue()])).await;
    mount_json(&server, PULLS_PATH, json!([])).await;
    mount_json(
        &server,
        REPOSITORY_PATH,
        json!({
            "full_name": "octo/repo",
            "description": "Octo's playground",
            "html_url": "https://github.com/octo/repo",
            "open_issues_count": 1,
            "stargazers_count": 42,
            "forks_count": 7
        }),
    )
    .await;
    let mut args = base_args(&server);
    args.push("--dry-run".to_owned());

    let output = run(args).await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "dry run should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Repowatch dry run for octo/repo"), "{stdout}");
    assert!(stdout.contains("Description: Octo's playground"), "{stdout}");
    assert!(stdout.contains("Stars: 42"), "{stdout}");
    assert!(stdout.contains("#3 Crash on startup"), "{stdout}");
    assert!(
        stdout.contains("[ALERT] Issues Open Beyond 7 Days - octo/repo"),
        "{stdout}"
    );
}

#[rstest]
#[tokio::test]
async fn run_once_with_nothing_actionable_exits_zero() {
    let server = MockServer::start().await;
    mount_json(&server, ISSUES_PATH, json!([])).await;
    mount_json(&server, PULLS_PATH, json!([])).await;
    let (_temp_dir, db_url) = migrated_database();
    let mut args = base_args(&server);
    args.extend(["--once".to_owned(), "--database-url".to_owned(), db_url]);

    let output = run(args).await;

    assert!(
        output.status.success(),
        "an empty pass should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty(), "run-once prints no report");
}

#[rstest]
#[tokio::test]
async fn run_once_exits_zero_when_the_alert_cannot_be_sent() {
    let server = MockServer::start().await;
    mount_json(&server, ISSUES_PATH, json!([stale_issue()])).await;
    mount_json(&server, PULLS_PATH, json!([])).await;
    let (_temp_dir, db_url) = migrated_database();
    let mut args = args_with_smtp(&server, UNREACHABLE_SMTP);
    args.extend(["--once".to_owned(), "--database-url".to_owned(), db_url.clone()]);

    for pass in 1..=2 {
        let output = run(args.clone()).await;
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert_eq!(
            output.status.code(),
            Some(0),
            "pass {pass}: a failed send still completes the run: {stderr}"
        );
        assert!(
            stderr.contains("notification failed"),
            "pass {pass}: the alert should be attempted and fail: {stderr}"
        );
    }

    let repository =
        RepositorySlug::new("octo", "repo").unwrap_or_else(|error| panic!("valid slug: {error}"));
    let record = SqliteTrackingStore::new(db_url)
        .and_then(|store| store.load(&repository))
        .unwrap_or_else(|error| panic!("tracking should load: {error}"));
    assert!(
        record.get(TrackingKey::issue(3)).is_none(),
        "an unsent alert must not track the issue"
    );
}

#[rstest]
#[tokio::test]
async fn run_once_exits_one_when_github_rejects_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;
    let (_temp_dir, db_url) = migrated_database();
    let mut args = base_args(&server);
    args.extend(["--once".to_owned(), "--database-url".to_owned(), db_url]);

    let output = run(args).await;

    assert_eq!(output.status.code(), Some(1), "fetch failures exit 1");
}

#[rstest]
#[tokio::test]
async fn run_once_reports_unmigrated_database() {
    let server = MockServer::start().await;
    mount_json(&server, ISSUES_PATH, json!([])).await;
    mount_json(&server, PULLS_PATH, json!([])).await;
    let temp_dir = create_temp_dir();
    let db_url = temp_dir
        .path()
        .join("fresh.sqlite")
        .to_string_lossy()
        .to_string();
    let mut args = base_args(&server);
    args.extend(["--once".to_owned(), "--database-url".to_owned(), db_url]);

    let output = run(args).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("run with --migrate-db first"),
        "stderr should point at the migration flag"
    );
}
