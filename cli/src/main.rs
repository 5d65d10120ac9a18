use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use protolens::{assemble, scan};
use protolens_compiler::{compile_schema_with_limits, error::ProtoError, tokenizer::Lexer, ParseLimits};

#[derive(Parser)]
#[command(name = "plens")]
#[command(about = "Decode protobuf wire-format payloads, optionally guided by a .proto schema", long_about = None)]
struct Cli {
    /// Upper bound on declarations per schema and fields per message
    #[arg(long, global = true, default_value_t = 10_000)]
    max_iterations: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a binary payload to JSON (printed to stdout)
    Decode {
        /// Input file holding one wire-format message
        #[arg(short, long)]
        input: PathBuf,

        /// `.proto` schema used to name and type the fields
        #[arg(short, long, requires = "message")]
        schema: Option<PathBuf>,

        /// Message of the schema the payload holds
        #[arg(short, long, requires = "schema")]
        message: Option<String>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Parse a `.proto` schema and print its AST as JSON
    Parse {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the token stream of a `.proto` schema
    Tokens {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, ProtoError> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ProtoError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = ParseLimits {
        max_top_level_items: cli.max_iterations,
        max_message_fields:  cli.max_iterations,
    };

    match &cli.command {
        Commands::Decode { input, schema, message, compact } => {
            let data = fs::read(input)?;
            let fields = scan(&data)?;
            info!(input = %input.display(), fields = fields.len(), "scanned payload");

            let json = match (schema, message) {
                (Some(schema_path), Some(message)) => {
                    let text = fs::read_to_string(schema_path)?;
                    let schema = compile_schema_with_limits(&text, limits)?;
                    let decoded = assemble(&fields, &schema, message)?;
                    to_json(&decoded, *compact)?
                }
                _ => to_json(&fields, *compact)?,
            };
            println!("{}", json);
            Ok(())
        }

        Commands::Parse { input } => {
            let text = fs::read_to_string(input)?;
            let schema = compile_schema_with_limits(&text, limits)?;
            println!("{}", to_json(&schema, false)?);
            Ok(())
        }

        Commands::Tokens { input } => {
            let text = fs::read_to_string(input)?;
            for token in Lexer::new(&text).tokenize()? {
                println!("{}:{}\t{}", token.line, token.column, token.describe());
            }
            Ok(())
        }
    }
}
