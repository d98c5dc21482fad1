use std::env;
use std::sync::{Mutex, OnceLock};

use netbot_cli::commands::{config, doctor};
use serde_json::Value;

#[test]
fn config_redacts_secrets_and_attributes_env_sources() {
    with_env(
        &[
            ("NETBOT_DASHBOARD_API_KEY", "0123456789abcdef0123456789abcdef"),
            ("NETBOT_CHANNELS_ALLOWED", "google,slack"),
            ("PORT", "9090"),
        ],
        || {
            let output = config::run();

            assert!(output.starts_with("effective config"));
            assert!(output.contains(
                "- dashboard.api_key = ***cdef (source: env (NETBOT_DASHBOARD_API_KEY))"
            ));
            assert!(!output.contains("0123456789abcdef0123456789abcdef"));
            assert!(output.contains("- channels.allowed = google,slack (source: env (NETBOT_CHANNELS_ALLOWED))"));
            assert!(output.contains("- server.port = 9090 (source: env (PORT))"));
            assert!(output.contains("- spark.access_token = <empty> (source: default)"));
        },
    );
}

#[test]
fn config_reports_validation_failure_without_api_key() {
    with_env(&[], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed:"));
        assert!(output.contains("dashboard.api_key"));
    });
}

#[test]
fn doctor_fails_and_skips_remote_checks_without_config() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["name"], "config_validation");
        assert_eq!(payload["checks"][0]["status"], "fail");
        for index in 1..=3 {
            assert_eq!(payload["checks"][index]["status"], "skipped");
        }
    });
}

#[test]
fn doctor_reports_unreachable_dashboard() {
    with_env(
        &[
            ("NETBOT_DASHBOARD_API_KEY", "0123456789abcdef"),
            ("NETBOT_DASHBOARD_BASE_URL", "http://127.0.0.1:9"),
            ("NETBOT_DASHBOARD_TIMEOUT_SECS", "2"),
            ("NETBOT_CHANNELS_ALLOWED", "google,slack"),
        ],
        || {
            let result = doctor::run(false);
            assert_eq!(result.exit_code, 3);

            assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
            assert!(result.output.contains("- [ok] config_validation"));
            assert!(result.output.contains("- [skip] spark_delivery"));
            assert!(result.output.contains("- [fail] dashboard_reachability"));
            assert!(result.output.contains("- [skip] directory_warmup"));
        },
    );
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "NETBOT_DASHBOARD_API_KEY",
        "MERAKI_API_KEY",
        "NETBOT_DASHBOARD_BASE_URL",
        "NETBOT_DASHBOARD_TIMEOUT_SECS",
        "NETBOT_SPARK_ACCESS_TOKEN",
        "NETBOT_SPARK_BASE_URL",
        "NETBOT_SPARK_TIMEOUT_SECS",
        "NETBOT_DIRECTORY_EXCLUDED_ORGANIZATION",
        "NETBOT_MATCHING_THRESHOLD",
        "NETBOT_MATCHING_DISTANCE",
        "NETBOT_CHANNELS_ALLOWED",
        "NETBOT_ACTIONS_DNS_LOOKUPS",
        "NETBOT_SERVER_BIND_ADDRESS",
        "NETBOT_SERVER_PORT",
        "PORT",
        "NETBOT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "NETBOT_LOGGING_LEVEL",
        "NETBOT_LOGGING_FORMAT",
        "NETBOT_LOG_LEVEL",
        "NETBOT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
