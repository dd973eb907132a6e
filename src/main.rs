use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;
use wasmtext::parser;
use wasmtext::parser::reader::Reader;
use wasmtext::wat::WatWriter;

#[derive(Parser)]
#[command(name = "wasmtext")]
#[command(about = "WebAssembly binary-to-text toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a binary module to its text representation
    Wasm2wat {
        /// Path to the WebAssembly module
        file: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Wasm2wat { file } => wasm2wat(&file),
    }
}

fn wasm2wat(file: &str) -> ExitCode {
    let bytes = match fs::read(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error reading {}: {}", file, e);
            return ExitCode::FAILURE;
        }
    };

    let module = match parser::parse(&mut Reader::new(bytes)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error parsing {}: {}", file, e);
            return ExitCode::FAILURE;
        }
    };

    let mut out = String::new();
    if let Err(e) = WatWriter::new(&mut out).write_module(&module) {
        eprintln!("Error writing text for {}: {}", file, e);
        return ExitCode::FAILURE;
    }

    println!("{}", out);
    ExitCode::SUCCESS
}
