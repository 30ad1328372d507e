//! CLI for randlab: generate, transform and test pseudo-random sequences.

mod commands;
mod error;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "randlab")]
#[command(about = "randlab: classical pseudo-random generators and a chi-square test battery")]
#[command(version = randlab_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sequence with one of the classical generators.
    /// Methods: lc, add, 5p, lfsr, nfsr, mt, rc4, bbs, rsa
    Generate {
        /// Generator method tag or name
        #[arg(short = 'g', long)]
        method: String,

        /// Number of values to generate
        #[arg(short = 'n', long)]
        length: usize,

        /// Generator parameters, joined with ';' (e.g. -i 1 5 3 16 or -i "1;5;3;16")
        #[arg(short = 'i', long = "init", num_args = 1.., required = true)]
        params: Vec<String>,

        /// Write the sequence to this file, one value per line
        #[arg(short = 'f', long)]
        file: Option<String>,

        /// Entropy for the additive and Mersenne tempering methods
        #[arg(long, default_value = "thread", value_parser = ["thread", "os"])]
        entropy: String,

        /// Seed the entropy source for reproducible output
        #[arg(long)]
        entropy_seed: Option<u64>,
    },

    /// Normalize an integer sequence and run the seven-test battery
    Analyze {
        /// Sequence file (integers separated by whitespace or commas)
        file: String,

        /// Significance level for every chi-square comparison
        #[arg(long, default_value_t = randlab_tests::DEFAULT_ALPHA)]
        alpha: f64,

        /// Write summary and verdicts as JSON
        #[arg(long)]
        output: Option<String>,

        /// Write the running mean / standard deviation series as CSV
        #[arg(long)]
        running: Option<String>,
    },

    /// Map a normalized sequence onto another distribution.
    /// Codes: st, tr, ex, nr, gm, ln, ls, bi
    Transform {
        /// Sequence file (integers separated by whitespace or commas)
        #[arg(short = 'f', long)]
        file: String,

        /// Distribution code
        #[arg(short = 'd', long)]
        distribution: String,

        /// Distribution parameters
        #[arg(short = 'p', long, num_args = 1.., allow_negative_numbers = true)]
        params: Vec<f64>,

        /// Output file (default: distr-<code>.dat)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            method,
            length,
            params,
            file,
            entropy,
            entropy_seed,
        } => commands::generate::run(commands::generate::GenerateCommandConfig {
            method: &method,
            length,
            params: &params,
            file_path: file.as_deref(),
            entropy: &entropy,
            entropy_seed,
        }),
        Commands::Analyze {
            file,
            alpha,
            output,
            running,
        } => commands::analyze::run(commands::analyze::AnalyzeCommandConfig {
            path: &file,
            alpha,
            output_path: output.as_deref(),
            running_path: running.as_deref(),
        }),
        Commands::Transform {
            file,
            distribution,
            params,
            output,
        } => commands::transform::run(commands::transform::TransformCommandConfig {
            path: &file,
            code: &distribution,
            params: &params,
            output_path: output.as_deref(),
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
