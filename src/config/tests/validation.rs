//! Tests for per-mode configuration validation.

use rstest::rstest;

use super::helpers::complete_config;
use crate::RepowatchConfig;
use crate::config::ConfigError;

fn missing_field(result: Result<(), ConfigError>) -> &'static str {
    match result {
        Err(ConfigError::MissingField { field, .. }) => field,
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[rstest]
fn complete_scheduler_config_validates() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);

    assert_eq!(complete_config().validate(), Ok(()));
}

#[rstest]
fn migrate_mode_only_needs_database_url() {
    let config = RepowatchConfig {
        migrate_db: true,
        database_url: Some("repowatch.sqlite".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.validate(), Ok(()), "owner and repo are not needed to migrate");
}

#[rstest]
fn migrate_mode_requires_database_url() {
    let config = RepowatchConfig {
        migrate_db: true,
        ..Default::default()
    };

    assert_eq!(missing_field(config.validate()), "database_url");
}

#[rstest]
fn run_once_requires_database_url() {
    let config = RepowatchConfig {
        once: true,
        ..complete_config()
    };

    assert_eq!(missing_field(config.validate()), "database_url");
}

#[rstest]
fn dry_run_does_not_need_smtp() {
    let config = RepowatchConfig {
        dry_run: true,
        smtp_host: None,
        smtp_from: None,
        ..complete_config()
    };

    assert_eq!(config.validate(), Ok(()));
}

#[rstest]
fn scheduler_requires_smtp_host_for_smtp_sink() {
    let config = RepowatchConfig {
        smtp_host: None,
        ..complete_config()
    };

    assert_eq!(missing_field(config.validate()), "smtp_host");
}

#[rstest]
fn scheduler_requires_recipients() {
    let config = RepowatchConfig {
        recipients: Some(" , ".to_owned()),
        ..complete_config()
    };

    assert_eq!(missing_field(config.validate()), "recipients");
}

#[rstest]
fn mcp_source_requires_command_instead_of_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = RepowatchConfig {
        token: None,
        source_backend: "mcp".to_owned(),
        ..complete_config()
    };

    assert_eq!(missing_field(config.validate()), "mcp_github_command");

    let with_command = RepowatchConfig {
        mcp_github_command: Some("github-mcp".to_owned()),
        ..config
    };
    assert_eq!(with_command.validate(), Ok(()));
}

#[rstest]
#[case::zero_interval(RepowatchConfig { check_interval_hours: 0, ..complete_config() }, "check_interval_hours")]
#[case::unknown_backend(RepowatchConfig { sink_backend: "carrier-pigeon".to_owned(), ..complete_config() }, "sink_backend")]
#[case::unknown_security(RepowatchConfig { smtp_security: "ssl3".to_owned(), ..complete_config() }, "smtp_security")]
#[case::relative_api_base(RepowatchConfig { api_base: "api.github.com".to_owned(), ..complete_config() }, "api_base")]
#[case::non_http_api_base(RepowatchConfig { api_base: "ftp://api.github.com".to_owned(), ..complete_config() }, "api_base")]
#[case::unknown_log_format(RepowatchConfig { log_format: "pretty".to_owned(), ..complete_config() }, "log_format")]
fn rejects_invalid_values(#[case] config: RepowatchConfig, #[case] expected_field: &str) {
    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}
