// In: src/main.rs

//! `curve-rle`: compress images along a space-filling curve.
//!
//! ```text
//! curve-rle compress   <image> <out.crle> [--curve C] [--threshold T] [--config file.json]
//! curve-rle decompress <in.crle> <out.png> [--curve C] [--show-padding]
//!                      [--visualize viz.png] [--seed N]
//! curve-rle info       <in.crle>
//! ```
//!
//! `-v` enables info logging.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::*;
use log::LevelFilter;

use curve_rle::config::{CompressionConfig, DecodeOptions, DEFAULT_VISUALIZE_SEED};
use curve_rle::container::{self, FrameMetadata};
use curve_rle::curves::CurveKind;
use curve_rle::error::Result;
use curve_rle::image_io;
use curve_rle::kernels::RUN_RECORD_SIZE;

//==================================================================================
// I. Argument Parsing
//==================================================================================

#[derive(Parser, Debug)]
#[command(name = "curve-rle", version, about = "Space-filling-curve run-length image codec")]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Compress an image file into a container
    Compress {
        /// Source image (PNG, JPEG, ...)
        input: PathBuf,
        /// Destination container
        output: PathBuf,
        /// Traversal curve: hilbert or morton (overrides --config)
        #[arg(long)]
        curve: Option<CurveKind>,
        /// Merge threshold in [0, 1] (overrides --config)
        #[arg(long)]
        threshold: Option<f32>,
        /// JSON compression config
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decompress a container into an image file
    Decompress {
        input: PathBuf,
        output: PathBuf,
        /// Curve the container was encoded with
        #[arg(long, default_value_t = CurveKind::Hilbert)]
        curve: CurveKind,
        /// Keep the padded size instead of cropping
        #[arg(long)]
        show_padding: bool,
        /// Also write a run visualization to this path
        #[arg(long)]
        visualize: Option<PathBuf>,
        /// Seed for the visualization colors
        #[arg(long, default_value_t = DEFAULT_VISUALIZE_SEED)]
        seed: u64,
    },
    /// Print the header of a container
    Info { input: PathBuf },
}

//==================================================================================
// II. Commands
//==================================================================================

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    });

    // Custom formatter: just print the level and message
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });
    let _ = builder.try_init();
}

fn compress(
    input: PathBuf,
    output: PathBuf,
    curve: Option<CurveKind>,
    threshold: Option<f32>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config {
        Some(path) => CompressionConfig::from_json_file(path)?,
        None => CompressionConfig::default(),
    };
    if let Some(curve) = curve {
        config.curve = curve;
    }
    if let Some(threshold) = threshold {
        config.threshold = threshold;
    }

    let image = image_io::load_image(&input)?;
    let bytes = container::encode(&image.channels, &config)?;
    std::fs::write(&output, &bytes)?;

    let stats = container::analyze(&bytes)?;
    println!(
        "{} {} -> {} ({} bytes, ratio {:.3}, {})",
        "compressed".green().bold(),
        input.display(),
        output.display(),
        stats.total_size,
        stats.compression_ratio,
        config.curve
    );
    Ok(())
}

fn decompress(
    input: PathBuf,
    output: PathBuf,
    options: DecodeOptions,
    visualize: Option<PathBuf>,
) -> Result<()> {
    let bytes = std::fs::read(&input)?;
    let decoded = container::decode(&bytes, &options)?;
    image_io::save_image(&output, &decoded.channels)?;
    println!(
        "{} {} -> {} ({})",
        "decompressed".green().bold(),
        input.display(),
        output.display(),
        options.curve
    );

    if let Some(path) = visualize {
        let planes = container::visualize(&bytes, &options)?;
        image_io::save_image(&path, &planes)?;
        println!("{} {}", "visualized".cyan().bold(), path.display());
    }
    Ok(())
}

fn info(input: PathBuf) -> Result<()> {
    let bytes = std::fs::read(&input)?;
    let metadata = FrameMetadata::peek(&bytes)?;
    let stats = container::analyze(&bytes)?;

    println!("{}", input.display().to_string().bold());
    println!("  {:<16}{}x{}", "image".cyan(), metadata.height, metadata.width);
    println!("  {:<16}{}", "channels".cyan(), metadata.channel_count);
    println!(
        "  {:<16}{}x{} ({})",
        "traversal".cyan(),
        metadata.padded_height,
        metadata.padded_width,
        if metadata.padding_enabled { "padded" } else { "unpadded" }
    );
    for (index, len) in stats.channel_bytes.iter().enumerate() {
        println!(
            "  {:<16}{} runs, {} bytes",
            format!("channel {}", index).cyan(),
            len / RUN_RECORD_SIZE,
            len
        );
    }
    println!("  {:<16}{} bytes", "total".cyan(), stats.total_size);
    println!("  {:<16}{:.3}", "ratio".cyan(), stats.compression_ratio);
    if bytes.len() < stats.total_size {
        println!(
            "  {} payload is truncated ({} of {} bytes)",
            "warning:".yellow().bold(),
            bytes.len(),
            stats.total_size
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compress {
            input,
            output,
            curve,
            threshold,
            config,
        } => compress(input, output, curve, threshold, config),
        Command::Decompress {
            input,
            output,
            curve,
            show_padding,
            visualize,
            seed,
        } => {
            let options = DecodeOptions {
                curve,
                show_padding,
                visualize_seed: seed,
            };
            decompress(input, output, options, visualize)
        }
        Command::Info { input } => info(input),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
