use infrasizer::config::{self, Cli, Command, FormatArg, PlatformArgs, RunArgs};
use infrasizer::engine;
use infrasizer::error::{Error, Result};
use infrasizer::models::Component;
use infrasizer::output::{
    self, CsvFormatter, Formatter, HumanFormatter, JsonFormatter, SummaryFormatter,
};
use infrasizer::recommendations::PlatformRecommendations;
use infrasizer::tuning::ConfigTable;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = config::parse_args()?;
    init_tracing(&cli);

    let command = match cli.command {
        Some(command) => command,
        None => Command::Run(cli.run),
    };

    match command {
        Command::Run(args) => run_sizing(&args),
        Command::ShowConfig(args) => {
            let table = ConfigTable::resolve(args.table.as_deref());
            let rendered = toml::to_string_pretty(&table)
                .map_err(|err| Error::ConfigParse(format!("failed to render TOML: {}", err)))?;
            print!("{}", rendered);
            Ok(())
        }
        Command::ListComponents => {
            for component in Component::ALL {
                println!("{}: {}", component.key(), component.label());
            }
            Ok(())
        }
        Command::Platform(args) => show_platform(&args),
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("infrasizer={}", default_level)));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_sizing(args: &RunArgs) -> Result<()> {
    let table = ConfigTable::resolve(args.table.table.as_deref());
    let request = config::build_request(args)?;
    let formatter = formatter_for(&args.format);

    let rendered = if args.all_environments {
        let results = engine::calculate_all_environments(&request, &table);
        output::write_sections(formatter.as_ref(), &results)
    } else {
        formatter.write(&engine::calculate(&request, &table))
    };
    print!("{}", rendered);
    Ok(())
}

fn show_platform(args: &PlatformArgs) -> Result<()> {
    let recommendations = match &args.recommendations {
        Some(path) => PlatformRecommendations::load(path)?,
        None => PlatformRecommendations::default(),
    };
    print!("{}", output::write_recommendations(&recommendations));
    Ok(())
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
        FormatArg::Csv => Box::new(CsvFormatter),
    }
}
