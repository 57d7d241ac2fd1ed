//! Command line front end: CNF generation, model decoding and project setup

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use knight_tour_cnf::{
    board::parse_square_argument,
    config::{CliOverrides, EncodingStrategy, Settings},
    sat::SatEncoder,
    tour::{decode, Model, TourValidator},
    utils::{ColorOutput, TourFormatter, TourReport},
};
use log::{debug, info, LevelFilter};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "knight_tour_cnf")]
#[command(about = "DIMACS CNF generator for open knight's tours")]
#[command(version = "0.1.0")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

/// Board, endpoints and strategy shared by generation and decoding
#[derive(Args, Debug, Clone)]
struct TourArgs {
    /// First square of the tour, 1-based row-major (default 1)
    first: Option<String>,

    /// Last square of the tour, 1-based row-major (default: top-right corner)
    last: Option<String>,

    /// Board side length (overrides config)
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Encoding strategy (overrides config)
    #[arg(short, long, value_enum)]
    encoding: Option<EncodingStrategy>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    #[command(flatten)]
    tour: TourArgs,

    /// Write the CNF to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix the CNF with comment lines
    #[arg(long)]
    comments: bool,

    /// Print encoding statistics to standard error
    #[arg(long)]
    stats: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a solver model back into a tour and validate it
    Decode {
        /// Solver output file, `-` for standard input
        model: PathBuf,

        #[command(flatten)]
        tour: TourArgs,

        /// Print the tour as JSON
        #[arg(long)]
        json: bool,

        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Decode {
            model,
            tour,
            json,
            verbose,
        }) => {
            init_logging(verbose);
            decode_command(&model, &tour, json)
        }
        Some(Commands::Setup { directory, force }) => {
            init_logging(false);
            setup_command(&directory, force)
        }
        None => {
            init_logging(cli.generate.verbose);
            generate_command(&cli.generate)
        }
    }
}

/// Logs go to stderr as DIMACS comments; stdout carries only the formula
fn init_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "c {} {}", record.level(), record.args()))
        .filter_level(level_filter)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn load_settings(
    tour: &TourArgs,
    output: Option<PathBuf>,
    comments: bool,
) -> Result<Settings> {
    let mut settings = match &tour.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Settings::default(),
    };

    let first = tour
        .first
        .as_deref()
        .map(|raw| parse_square_argument("first square", raw))
        .transpose()?;
    let last = tour
        .last
        .as_deref()
        .map(|raw| parse_square_argument("last square", raw))
        .transpose()?;

    settings.merge_with_cli(&CliOverrides {
        size: tour.size,
        first,
        last,
        strategy: tour.encoding,
        output,
        comments,
    });

    settings
        .validate()
        .context("Configuration validation failed")?;
    debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

fn generate_command(args: &GenerateArgs) -> Result<()> {
    let settings = load_settings(&args.tour, args.output.clone(), args.comments)?;
    let encoder = SatEncoder::new(&settings).context("Failed to build the encoding")?;

    if args.stats {
        eprintln!("{}", encoder.statistics());
    }

    match &settings.output.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = encoder
                .write_cnf(BufWriter::new(file))
                .context("Failed to write the CNF")?;
            out.flush()?;
            info!("CNF written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = encoder
                .write_cnf(BufWriter::new(stdout.lock()))
                .context("Failed to write the CNF")?;
            out.flush()?;
        }
    }

    Ok(())
}

fn read_model(path: &Path) -> Result<Model> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read the model from standard input")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?
    };
    Ok(Model::parse(&text)?)
}

fn decode_command(model_path: &Path, tour_args: &TourArgs, json: bool) -> Result<()> {
    let settings = load_settings(tour_args, None, false)?;
    let encoder = SatEncoder::new(&settings).context("Failed to build the encoding")?;
    let model = read_model(model_path)?;

    let tour = decode(encoder.encoding(), &model).context("Failed to decode the model")?;
    let validator = TourValidator::for_encoding(encoder.encoding());
    let result = validator.validate_model(&tour, encoder.encoding(), &model);
    let is_valid = result.is_valid;

    if json {
        let report = TourReport::new(&tour, settings.encoding.strategy, result);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}",
            ColorOutput::info(&format!(
                "Decoded {} tour on a {} board",
                settings.encoding.strategy,
                tour.board()
            ))
        );
        println!("{}", TourFormatter::format_grid(&tour));
        println!("Squares: {}", TourFormatter::format_sequence(&tour));
        println!("Coordinates: {}", TourFormatter::format_coordinates(&tour));
        println!();
        println!("{}", result);

        if is_valid {
            println!("{}", ColorOutput::success("Tour is valid"));
        } else {
            println!("{}", ColorOutput::error("Tour is invalid"));
        }
    }

    if !is_valid {
        anyhow::bail!("the model does not describe a valid open knight's tour");
    }
    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration..."));

    let config_dir = directory.join("config");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Skipped: {} (already exists)", config_path.display()))
        );
    }

    let examples_dir = config_dir.join("presets");
    std::fs::create_dir_all(&examples_dir)?;

    // small boards a solver finishes in well under a second
    let mut lfsr_5x5 = Settings::default();
    lfsr_5x5.board.size = 5;
    lfsr_5x5.board.last = Some(13);
    lfsr_5x5.to_file(&examples_dir.join("lfsr_5x5.yaml"))?;

    let mut order_6x6 = Settings::default();
    order_6x6.board.size = 6;
    order_6x6.encoding.strategy = EncodingStrategy::Order;
    order_6x6.to_file(&examples_dir.join("order_6x6.yaml"))?;

    println!("Created presets in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: knight_tour_cnf --config {} -o tour.cnf", config_path.display());
    println!("3. Solve tour.cnf and run: knight_tour_cnf decode <model> --config {}", config_path.display());

    Ok(())
}
