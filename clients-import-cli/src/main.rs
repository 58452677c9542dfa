use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clients_import::{ImportConfig, ImportSummary, ProcessingOutcome, Processor};
use std::fs;
use std::path::{Path, PathBuf};
use template::CONFIG_TEMPLATE;
use tracing::{debug, info, warn, Level};

mod template;

/// Client Export Importer
/// Converts a semicolon-delimited client export into a SQL import script
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output for detailed processing information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Path to an import config file (JSON, comments allowed)
    #[arg(short, long, value_name = "PATH TO CONFIG")]
    config: Option<PathBuf>,

    /// Client export to read, overriding the config
    #[arg(short, long, value_name = "PATH TO CSV")]
    input: Option<PathBuf>,

    /// Fail on the first row with an invalid identifier or birth date
    #[arg(short, long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the SQL import script
    Import {
        #[command(flatten)]
        source: SourceArgs,

        /// Path of the generated SQL script, overriding the config
        #[arg(short, long, value_name = "OUTPUT PATH")]
        output: Option<PathBuf>,

        /// Target table of the INSERT statements, overriding the config
        #[arg(short, long)]
        table: Option<String>,

        /// Format of the birth date column (e.g. %d/%m/%Y); unset writes NULL
        #[arg(long, value_name = "FORMAT")]
        birth_date_format: Option<String>,
    },
    /// Check an export without writing the SQL script
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Generate an import config template
    GenerateConfig {
        /// Output path for the generated config
        #[arg(
            short,
            long,
            default_value = "import.jsonc",
            value_name = "OUTPUT PATH"
        )]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with appropriate level
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Client export importer starting up...");

    match &cli.command {
        Commands::Import {
            source,
            output,
            table,
            birth_date_format,
        } => {
            let mut config = load_config(source)?;
            if let Some(output) = output {
                config.output_path = output.clone();
            }
            if let Some(table) = table {
                config.table = table.clone();
            }
            if let Some(format) = birth_date_format {
                config.birth_date_format = Some(format.clone());
            }
            import_command(config, source.strict)
        }
        Commands::Validate { source } => validate_command(load_config(source)?, source.strict),
        Commands::GenerateConfig { output } => generate_config_command(output),
    }
}

fn load_config(source: &SourceArgs) -> Result<ImportConfig> {
    let mut config = match &source.config {
        Some(config_path) => {
            if !config_path.exists() {
                anyhow::bail!(
                    "Config file not found: {}. Try using --config <PATH TO CONFIG>",
                    config_path.display()
                );
            }
            ImportConfig::from_file(config_path)
                .context("Failed to load config. See errors for additional details:")?
        }
        None => ImportConfig::default(),
    };

    if let Some(input) = &source.input {
        config.input_path = input.clone();
    }

    Ok(config)
}

fn import_command(config: ImportConfig, strict: bool) -> Result<()> {
    if strict {
        info!("Running in strict mode");
    }

    if !config.input_path.exists() {
        anyhow::bail!("Client export not found: {}", config.input_path.display());
    }

    info!("Beginning import...");
    let summary = Processor::new(config, strict)
        .process()
        .context("Failed to generate SQL import script")?;

    report_warnings(&summary);

    println!("Generated {} INSERT statements", summary.inserted);
    if let Some(output_path) = &summary.output_path {
        println!("Output written to: {}", output_path.display());
    }
    Ok(())
}

fn validate_command(config: ImportConfig, strict: bool) -> Result<()> {
    info!("Validating client export...");

    if !config.input_path.exists() {
        anyhow::bail!(
            "Client export not found: {}. Try using --input <PATH TO CSV>",
            config.input_path.display()
        );
    }

    let summary = Processor::new(config, strict)
        .dry_run()
        .context("Failed to validate client export")?;

    report_warnings(&summary);

    info!("Client export validation successful");
    println!("Valid rows: {}", summary.inserted);
    println!("Skipped rows: {}", summary.rejected);
    println!("Padded rows: {}", summary.padded);
    Ok(())
}

fn report_warnings(summary: &ImportSummary) {
    if let ProcessingOutcome::SuccessWithWarnings(warnings) = &summary.outcome {
        warn!("Completed with {} warnings", warnings.len());
        for warning in warnings {
            debug!(
                "[{}] {}",
                warning.source.as_deref().unwrap_or("import"),
                warning.message
            );
        }
    }
}

fn generate_config_command(output: &Path) -> Result<()> {
    info!("Generating import config template...");

    // if output is a directory, append the default file name
    let full_file_output_path = if output.is_dir() {
        output.join("import.jsonc")
    } else {
        output.to_path_buf()
    };

    fs::write(&full_file_output_path, CONFIG_TEMPLATE)
        .context(format!("Failed to write config to: {}", output.display()))?;

    info!(
        "Successfully generated config template at: {}",
        full_file_output_path.display()
    );
    Ok(())
}
