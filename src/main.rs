use std::{fs::File, path::PathBuf, process::ExitCode, time::Instant};
use clap::{Parser, Subcommand};
use miniucd_base::EnumFromNameT;
use miniucd_logging::{get_logger, log_info, log_severe, log_warning, set_logger, LogCategory, LogLevel, Logger};
use miniucd_tables::generate;
use miniucd_ucd::{load_catalog, parse_ucd, PropertyCatalog, UcdData, UcdError, UcdResult};

mod settings;
use settings::Settings;

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

/// Compiles the Unicode Character Database into lookup tables and character classes
#[derive(Debug, Parser)]
#[command(name = "miniucd", version)]
struct Cli {
    /// Settings file
    #[arg(long, short, default_value = Settings::FILE_NAME)]
    config: PathBuf,

    /// Log level, overrides the level in the settings file
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    stage: Stage,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Subcommand)]
enum Stage {
    /// Flatten the UCD sources into the data file
    Parse,
    /// Generate the tables from the data file
    Generate,
    /// Run the parse and generate stages
    All,
}

fn parse_log_level(level: &str) -> Result<LogLevel, String> {
    LogLevel::parse(level).ok_or_else(|| format!("unknown log level '{level}'"))
}

fn setup_logger(settings: &Settings, level: Option<LogLevel>) {
    let logger = Logger::new();
    logger.set_max_level(level.unwrap_or(settings.log_level));

    let file_error = match &settings.log_file {
        Some(path) => match File::create(path) {
            Ok(file) => {
                _ = logger.add_writer(Box::new(file));
                None
            },
            Err(err) => Some((path, err)),
        },
        None => None,
    };

    _ = set_logger(logger);
    if let Some((path, err)) = file_error {
        log_warning!(LOG_CAT, "Failed to create log file '{}': {err}", path.display());
    }
}

/// Load the aliases for the generate stage, which can run from the data file alone
fn load_generate_catalog(settings: &Settings) -> UcdResult<PropertyCatalog> {
    match load_catalog(&settings.ucd_root, &settings.version) {
        Err(UcdError::MissingFile { path }) => {
            log_warning!(LOG_CAT, "{} not found, generating without alias tables", path.display());
            Ok(PropertyCatalog::default())
        },
        res => res,
    }
}

fn run(settings: &Settings, stage: Stage) -> UcdResult<()> {
    let (data, catalog) = match stage {
        Stage::Parse | Stage::All => {
            let catalog = load_catalog(&settings.ucd_root, &settings.version)?;
            let data = parse_ucd(&catalog, &settings.ucd_root, &settings.version)?;
            data.save(&settings.data_file)?;
            if stage == Stage::Parse {
                return Ok(());
            }
            (data, catalog)
        },
        Stage::Generate => {
            let data = UcdData::load(&settings.data_file, &settings.version)?;
            (data, load_generate_catalog(settings)?)
        },
    };

    let tables = generate(&data, &catalog);
    std::fs::create_dir_all(&settings.output_dir).map_err(|err| UcdError::io(settings.output_dir.clone(), err))?;
    tables.save(&settings.output_dir)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            log_severe!(LOG_CAT, main, "{err}");
            get_logger().flush();
            return ExitCode::FAILURE;
        }
    };
    setup_logger(&settings, cli.log_level);

    log_info!(LOG_CAT, "miniucd {:?} for Unicode {}", cli.stage, settings.version);
    let start = Instant::now();
    let res = run(&settings, cli.stage);

    let code = match res {
        Ok(()) => {
            log_info!(LOG_CAT, "Finished in {:.2}s", start.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        },
        Err(err) => {
            log_severe!(LOG_CAT, main, "{err}");
            ExitCode::FAILURE
        },
    };
    get_logger().flush();
    code
}
