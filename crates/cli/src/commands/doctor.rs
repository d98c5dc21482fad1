use netbot_core::config::{AppConfig, LoadOptions};
use netbot_core::{DashboardGateway, EntityDirectory};
use netbot_dashboard::DashboardClient;
use serde::Serialize;

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 3 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_spark_delivery(&config));
            checks.extend(check_dashboard(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["spark_delivery", "dashboard_reachability", "directory_warmup"] {
                checks.push(DoctorCheck::skipped(name, "configuration did not load"));
            }
        }
    }

    summarize(checks)
}

fn summarize(checks: Vec<DoctorCheck>) -> DoctorReport {
    let all_pass = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_spark_delivery(config: &AppConfig) -> DoctorCheck {
    if config.channel_allowed("spark") {
        DoctorCheck {
            name: "spark_delivery",
            status: CheckStatus::Pass,
            details: format!("access token present, messages post to {}", config.spark.base_url),
        }
    } else {
        DoctorCheck::skipped("spark_delivery", "spark is not an allowed channel")
    }
}

fn check_dashboard(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![DoctorCheck {
                name: "dashboard_reachability",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            }];
        }
    };

    let client = match DashboardClient::from_config(&config.dashboard) {
        Ok(client) => client,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "dashboard_reachability",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                DoctorCheck::skipped("directory_warmup", "the dashboard client could not be built"),
            ];
        }
    };

    runtime.block_on(dashboard_checks(&client, config.directory.excluded_organization.as_deref()))
}

async fn dashboard_checks(gateway: &dyn DashboardGateway, excluded: Option<&str>) -> Vec<DoctorCheck> {
    let reachability = match gateway.list_organizations().await {
        Ok(organizations) => DoctorCheck {
            name: "dashboard_reachability",
            status: CheckStatus::Pass,
            details: format!("api key sees {} organization(s)", organizations.len()),
        },
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "dashboard_reachability",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                DoctorCheck::skipped("directory_warmup", "the management api is unreachable"),
            ];
        }
    };

    let directory = EntityDirectory::new();
    let warmup = match directory.warm(gateway, excluded).await {
        Ok(stats) => DoctorCheck {
            name: "directory_warmup",
            status: CheckStatus::Pass,
            details: format!(
                "{} organization(s) and {} network(s) loaded",
                stats.organizations, stats.networks
            ),
        },
        Err(error) => {
            DoctorCheck { name: "directory_warmup", status: CheckStatus::Fail, details: error.to_string() }
        }
    };

    vec![reachability, warmup]
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
