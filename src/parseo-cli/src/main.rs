use std::process;

use log::debug;
use parseo_cli::cli::{parse_args, Cli, Commands, ConfigCommands};
use parseo_cli::{create_default_config_file, validate_config, Config, Executor};
use parseo_shared::BuildInfo;

fn main() {
    // Enhanced version output instead of clap's one-liner
    if std::env::args().skip(1).any(|arg| arg == "--version" || arg == "-V") {
        print!("{}", build_info());
        return;
    }

    if let Err(e) = run(parse_args()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH"),
        build_date: option_env!("BUILD_DATE"),
        rust_version: option_env!("RUSTC_VERSION"),
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_cli(args.verbose);
    setup_logging(&config);
    validate_config(&config)?;
    debug!("Effective configuration: {:?}", config);

    match args.command {
        Commands::Test { expression, ast } => {
            let executor = Executor::new(config)?;
            println!("{}", executor.test(&expression, ast)?);
        }
        Commands::Eval {
            expression,
            contexts,
            sets,
            json,
        } => {
            let mut executor = Executor::new(config)?;
            println!("{}", executor.eval(&expression, &contexts, &sets, json)?);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
                print!("{}", rendered);
            }
            ConfigCommands::Init { path, force } => {
                create_default_config_file(&path, force)?;
                println!("Wrote default configuration to {}", path.display());
            }
        },
    }

    Ok(())
}

fn setup_logging(config: &Config) {
    let log_level = match config.debug.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
