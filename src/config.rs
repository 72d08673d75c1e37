use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    BotMode, BotPerformance, Component, ComponentSelection, DeploymentModel, Environment,
    Industry, SeatLoad, SizingRequest,
};

#[derive(Parser, Debug)]
#[command(
    name = "infrasizer",
    about = "Rule-based infrastructure sizing calculator",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[command(flatten)]
    pub run: RunArgs,
    #[arg(long, short, global = true, help = "Log sizing decisions to stderr")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Size the request and print the result (default)
    Run(RunArgs),
    /// Print the resolved tuning table
    ShowConfig(TableArgs),
    /// List the selectable components
    ListComponents,
    /// Print the platform recommendations
    Platform(PlatformArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct TableArgs {
    #[arg(long, help = "Tuning table (.toml or .json); defaults are used when absent")]
    pub table: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct PlatformArgs {
    #[arg(long, help = "Recommendations JSON file")]
    pub recommendations: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    #[arg(long, help = "Request file (.toml or .json)")]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub table: TableArgs,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
    #[arg(long, help = "Size PROD, UAT and DEV in one report")]
    pub all_environments: bool,

    #[arg(long)]
    pub client: Option<String>,
    #[arg(long = "env", value_enum)]
    pub environment: Option<Environment>,
    #[arg(long, value_enum)]
    pub deployment: Option<DeploymentModel>,
    #[arg(long, value_enum)]
    pub bot_mode: Option<BotMode>,
    #[arg(long, value_enum)]
    pub industry: Option<Industry>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated components to enable; replaces the request's selection"
    )]
    pub components: Option<Vec<String>>,

    #[arg(long)]
    pub crm_users: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    pub crm_concurrency: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub crm_triggers: Option<f64>,
    #[arg(long)]
    pub marketing_users: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    pub marketing_concurrency: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub marketing_triggers: Option<f64>,
    #[arg(long)]
    pub bot_users: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    pub bot_rpm: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub bot_tokens: Option<f64>,
    #[arg(long, value_enum)]
    pub bot_performance: Option<BotPerformance>,
    #[arg(long, allow_negative_numbers = true)]
    pub data_volume: Option<f64>,
    #[arg(long, overrides_with = "no_ha")]
    pub ha: bool,
    #[arg(long, overrides_with = "ha")]
    pub no_ha: bool,
    #[arg(long)]
    pub dr: bool,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    #[default]
    Human,
    Summary,
    Json,
    Csv,
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|err| match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => err.exit(),
        _ => Error::Cli(err.to_string()),
    })
}

pub fn load_request(path: &Path) -> Result<SizingRequest> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

/// Request file (or defaults) with command-line overrides applied, validated.
pub fn build_request(args: &RunArgs) -> Result<SizingRequest> {
    let mut request = match &args.config {
        Some(path) => load_request(path)?,
        None => SizingRequest::default(),
    };
    apply_overrides(&mut request, args)?;
    validate_request(&request)?;
    debug!(?request, "built sizing request");
    Ok(request)
}

fn apply_overrides(request: &mut SizingRequest, args: &RunArgs) -> Result<()> {
    if let Some(client) = &args.client {
        request.client_name = client.clone();
    }
    if let Some(environment) = args.environment {
        request.environment = environment;
    }
    if let Some(deployment) = args.deployment {
        request.deployment = deployment;
    }
    if let Some(bot_mode) = args.bot_mode {
        request.bot_mode = bot_mode;
    }
    if let Some(industry) = args.industry {
        request.industry = industry;
    }
    if let Some(keys) = &args.components {
        request.components = parse_components(keys)?;
    }

    override_seats(
        &mut request.crm,
        args.crm_users,
        args.crm_concurrency,
        args.crm_triggers,
    );
    override_seats(
        &mut request.marketing,
        args.marketing_users,
        args.marketing_concurrency,
        args.marketing_triggers,
    );

    if let Some(users) = args.bot_users {
        request.bot.active_users = users;
    }
    if let Some(rpm) = args.bot_rpm {
        request.bot.requests_per_user_per_minute = rpm;
    }
    if let Some(tokens) = args.bot_tokens {
        request.bot.avg_tokens_per_request = tokens;
    }
    if let Some(performance) = args.bot_performance {
        request.bot.performance = performance;
    }
    if let Some(volume) = args.data_volume {
        request.data_volume_gb = volume;
    }
    if args.ha {
        request.ha_enabled = true;
    }
    if args.no_ha {
        request.ha_enabled = false;
    }
    if args.dr {
        request.dr_enabled = true;
    }
    Ok(())
}

fn override_seats(
    load: &mut SeatLoad,
    users: Option<u32>,
    concurrency: Option<f64>,
    triggers: Option<f64>,
) {
    if let Some(users) = users {
        load.named_users = users;
    }
    if let Some(concurrency) = concurrency {
        load.concurrency_rate = concurrency;
    }
    if let Some(triggers) = triggers {
        load.triggers_per_minute = triggers;
    }
}

pub fn parse_components(keys: &[String]) -> Result<ComponentSelection> {
    let mut selection = ComponentSelection::none();
    for key in keys {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let component =
            Component::from_key(key).ok_or_else(|| Error::UnknownComponent(key.to_string()))?;
        selection.set(component, true);
    }
    Ok(selection)
}

/// Rejects input the engine is not defined for.
pub fn validate_request(request: &SizingRequest) -> Result<()> {
    validate_seats("crm", &request.crm)?;
    validate_seats("marketing", &request.marketing)?;
    non_negative(
        "bot requests per minute",
        request.bot.requests_per_user_per_minute,
    )?;
    non_negative("bot tokens per request", request.bot.avg_tokens_per_request)?;
    non_negative("data volume", request.data_volume_gb)?;
    Ok(())
}

fn validate_seats(component: &'static str, load: &SeatLoad) -> Result<()> {
    let rate = load.concurrency_rate;
    if !rate.is_finite() {
        return Err(Error::NonFiniteValue(component));
    }
    if !(0.0..=100.0).contains(&rate) {
        return Err(Error::InvalidConcurrencyRate(component, rate));
    }
    let field = match component {
        "crm" => "crm triggers per minute",
        _ => "marketing triggers per minute",
    };
    non_negative(field, load.triggers_per_minute)
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::NonFiniteValue(field));
    }
    if value < 0.0 {
        return Err(Error::NegativeValue(field, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["infrasizer"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn top_level_flags_build_request() {
        let cli = parse(&[
            "--env",
            "uat",
            "--crm-users",
            "800",
            "--components",
            "crm,assistant",
            "--bot-mode",
            "managed-api",
            "--no-ha",
        ]);
        assert!(cli.command.is_none());
        let request = build_request(&cli.run).expect("request builds");

        assert_eq!(request.environment, Environment::Uat);
        assert_eq!(request.crm.named_users, 800);
        assert!(request.components.crm);
        assert!(request.components.assistant);
        assert!(!request.components.analytics);
        assert_eq!(request.bot_mode, BotMode::ManagedApi);
        assert!(!request.ha_enabled);
    }

    #[test]
    fn run_subcommand_accepts_same_flags() {
        let cli = parse(&["run", "--deployment", "saas", "--format", "json"]);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.format, FormatArg::Json);
                assert_eq!(args.deployment, Some(DeploymentModel::FullyManaged));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn unknown_component_is_rejected() {
        let err = parse_components(&["crm".to_string(), "rocket".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown component 'rocket'");
    }

    #[test]
    fn empty_component_list_disables_everything() {
        let selection = parse_components(&["".to_string()]).expect("parses");
        assert_eq!(selection, ComponentSelection::none());
    }

    #[test]
    fn concurrency_out_of_range_is_rejected() {
        let mut request = SizingRequest::default();
        request.crm.concurrency_rate = 120.0;
        let err = validate_request(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "crm concurrency rate must be between 0 and 100 (got 120)"
        );
    }

    #[test]
    fn negative_volume_is_rejected() {
        let mut request = SizingRequest::default();
        request.data_volume_gb = -1.0;
        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.to_string(), "data volume must not be negative (got -1)");
    }

    #[test]
    fn missing_request_file_is_io_error() {
        let err = load_request(Path::new("/nonexistent/request.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo(_)));
        let err = load_request(Path::new("request.yaml")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo(_)));
    }
}
