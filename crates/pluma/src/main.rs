mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use math_api::MathFunction;
use pluma_core::kernel::constants::DEFAULT_CONFIG_FILE;
use pluma_core::kernel::{Error, Result};
use pluma_core::{PluginManager, PluginManagerConfig, PluginMetadata};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Commands};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Logging is best-effort; the commands work without it
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = tracing_log::LogTracer::init();
    }
}

fn load_config(args: &CliArgs) -> Result<PluginManagerConfig> {
    let mut config = match &args.config {
        Some(path) => PluginManagerConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            PluginManagerConfig::load(DEFAULT_CONFIG_FILE)?
        }
        None => PluginManagerConfig::default(),
    };
    config.apply_env();
    config.search_paths.extend(args.plugin_dirs.iter().cloned());
    debug!("Plugin search paths: {:?}", config.search_paths);
    Ok(config)
}

fn print_metadata(metadata: &PluginMetadata) {
    println!("{} {}", metadata.name, metadata.version);
    if metadata.classes.is_empty() {
        println!("  No classes exported.");
    }
    for class in &metadata.classes {
        println!("  - {} ({})", class.name, class.capability);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let Some(command) = args.command.as_ref() else {
        println!("No command given. Run with --help for usage.");
        return Ok(());
    };
    let mut manager = PluginManager::with_config(load_config(&args)?);

    match command {
        Commands::Info { plugin, json } => {
            manager.load(plugin)?;
            let metadata = manager.get_metadata(plugin)?;
            if *json {
                let text = serde_json::to_string_pretty(&metadata)
                    .map_err(|e| Error::Other(format!("Failed to serialize metadata: {}", e)))?;
                println!("{}", text);
            } else {
                print_metadata(&metadata);
            }
        }
        Commands::List => {
            let names = manager.discover();
            if names.is_empty() {
                println!("No plugins found.");
            }
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Create { plugin, class } => {
            manager.load(plugin)?;
            let instance = manager.instantiate(plugin, class)?;
            println!("{}::{} implements {}", plugin, class, instance.capability());
        }
        Commands::Eval { plugin, class, x } => {
            manager.load(plugin)?;
            let function = manager.instantiate_as::<dyn MathFunction>(plugin, class)?;
            println!("{}({}) = {}", function.name(), x, function.eval(*x));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
