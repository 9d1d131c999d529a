// stride-agent/src/main.rs
// STRIDE threat classification for threat-model diagram components

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod narrative;
mod report;

use config::{Config, API_KEY_ENV};
use narrative::request_narrative;
use report::{build_report, write_reports, ReportOptions};
use stride_core::{Component, ThreatAnalyzer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the JSON reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .context("missing --config argument")?;
    let mut config = Config::load(config_path)?;
    apply_overrides(&mut config, &matches);
    config.apply_env(std::env::var(API_KEY_ENV).ok());

    let component_path = matches
        .get_one::<String>("component")
        .context("missing --component argument")?;

    run(config, component_path).await
}

fn cli() -> Command {
    Command::new("stride-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-based STRIDE/CAPEC threat analysis for threat-model components")
        .arg(
            Arg::new("component")
                .short('i')
                .long("component")
                .help("Component JSON file (one object or an array of objects)")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .default_value("stride-agent.toml"),
        )
        .arg(
            Arg::new("narrative")
                .long("narrative")
                .help("Attach an AI-generated threat narrative to each report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .help("Narrative provider: local, anthropic, openai or gemini"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .help("API key for the narrative provider"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("Include the quick type profile")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("references")
                .long("references")
                .help("Include reference attack patterns for the detected threats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the JSON output")
                .action(ArgAction::SetTrue),
        )
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
    if matches.get_flag("narrative") {
        config.narrative.enabled = true;
    }
    if let Some(provider) = matches.get_one::<String>("provider") {
        config.narrative.provider = provider.clone();
    }
    if let Some(key) = matches.get_one::<String>("api-key") {
        config.narrative.api_key = Some(key.clone());
    }
    if matches.get_flag("profile") {
        config.analysis.include_profile = true;
    }
    if matches.get_flag("references") {
        config.analysis.include_references = true;
    }
    if matches.get_flag("pretty") {
        config.output.pretty = true;
    }
}

async fn run(config: Config, component_path: &str) -> Result<()> {
    let text = std::fs::read_to_string(component_path)
        .with_context(|| format!("failed to read component file {}", component_path))?;
    let components = Component::list_from_json(&text)
        .with_context(|| format!("failed to parse components from {}", component_path))?;

    let analyzer = ThreatAnalyzer::with_catalog(config.load_catalog()?);
    let options = ReportOptions {
        include_profile: config.analysis.include_profile,
        include_references: config.analysis.include_references,
    };

    info!("Analyzing {} component(s) from {}", components.len(), component_path);

    let mut reports = Vec::with_capacity(components.len());
    for component in &components {
        let mut report = build_report(&analyzer, component, options);
        if config.narrative.enabled {
            report.narrative = Some(request_narrative(component, &config.narrative).await);
        }
        reports.push(report);
    }

    let threat_count: usize = reports.iter().map(|r| r.threats.len()).sum();
    if threat_count == 0 {
        warn!("No applicable threats found; all components may be out of scope");
    }
    info!("Generated {} threat record(s)", threat_count);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_reports(&mut handle, &reports, config.output.pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let matches = cli().get_matches_from([
            "stride-agent",
            "--component",
            "model.json",
            "--narrative",
            "--provider",
            "openai",
            "--api-key",
            "sk-test",
            "--profile",
            "--pretty",
        ]);
        let mut config = Config::default();
        apply_overrides(&mut config, &matches);

        assert!(config.narrative.enabled);
        assert_eq!(config.narrative.provider, "openai");
        assert_eq!(config.narrative.api_key.as_deref(), Some("sk-test"));
        assert!(config.analysis.include_profile);
        assert!(!config.analysis.include_references);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_config_path_defaults_in_cli() {
        let matches = cli().get_matches_from(["stride-agent", "-i", "model.json"]);
        assert_eq!(
            matches.get_one::<String>("config").map(String::as_str),
            Some("stride-agent.toml")
        );

        let matches = cli().get_matches_from(["stride-agent", "-i", "model.json", "-c", "custom.toml"]);
        assert_eq!(
            matches.get_one::<String>("config").map(String::as_str),
            Some("custom.toml")
        );
    }

    #[test]
    fn test_component_is_required() {
        assert!(cli().try_get_matches_from(["stride-agent"]).is_err());
    }
}
