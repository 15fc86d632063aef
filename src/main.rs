use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use lexgen::{compile, LexSpec};

/// lexgen - compile a lexer specification into a standalone Rust scanner
#[derive(Parser, Debug)]
#[command(name = "lexgen")]
#[command(about = "Generate a maximal-munch scanner from a lexer specification", long_about = None)]
struct Args {
    /// Path to the specification file
    #[arg(value_name = "SPEC")]
    spec: PathBuf,

    /// Write the generated scanner here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let spec = LexSpec::from_file(&args.spec)?;
    let generated = compile(&spec)?;
    info!(
        tokens = generated.stats.num_tokens,
        rules = generated.stats.num_rules,
        dfa_states = generated.stats.num_dfa_states,
        minimized_states = generated.stats.num_minimized_states,
        "generated scanner"
    );

    match args.output {
        Some(path) => std::fs::write(&path, generated.source)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => print!("{}", generated.source),
    }

    Ok(())
}
