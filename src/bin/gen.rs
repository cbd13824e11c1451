//! sentrule-gen: CLI tool for compiling endpoint rule files into sentinel binaries.

use clap::{Parser, Subcommand};
use sentrule::converter::EndpointConverter;
use sentrule::{build_sentinels, SentinelReader, SentinelWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentrule-gen")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Compile endpoint filtering rules into the binary sentinel format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON endpoint file to binary sentinels
    Compile {
        /// Endpoints configuration
        #[arg(short, long, default_value = "endpoints.json")]
        input: PathBuf,

        /// Sentinels binary data
        #[arg(short, long, default_value = "sentinels.bin")]
        output: PathBuf,

        /// Dump parsed endpoints and compiled sentinels
        #[arg(short, long)]
        debug: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decode and print a compiled sentinel file
    Inspect {
        /// Sentinels binary data
        #[arg(short, long, default_value = "sentinels.bin")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            debug,
            verbose,
        } => compile(&input, &output, debug, verbose),
        Commands::Inspect { input } => inspect(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compile(
    input: &PathBuf,
    output: &PathBuf,
    debug: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose {
        println!("Reading input file: {:?}", input);
    }

    let endpoints = EndpointConverter::load(input)?;

    if debug {
        println!("endpoints: {:#?}", endpoints);
    }

    let sentinels = build_sentinels(&endpoints)?;

    if debug {
        println!("sentinels: {:#?}", sentinels);
    }

    if verbose {
        let rules: usize = sentinels.iter().map(|s| s.rules.len()).sum();
        println!("Compiled {} endpoints, {} rules", sentinels.len(), rules);
    }

    let mut writer = SentinelWriter::new();
    let written = writer.write_file(&sentinels, output)?;

    if verbose {
        println!("Wrote output file: {:?} ({} bytes)", output, written);
    }

    println!("Successfully compiled {:?} -> {:?}", input, output);
    Ok(())
}

fn inspect(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let reader = SentinelReader::open(input)?;

    println!("version: {}", reader.version());
    println!("sentinels: {}", reader.len());

    for (sentinel, offset) in reader.sentinels()?.iter().zip(reader.offsets()) {
        println!("@{:#010x} {}", offset, sentinel);
    }

    Ok(())
}
