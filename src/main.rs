use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use watrun::runtime::{Config, Interpreter};
use watrun::wat::{self, Lexer};

/// Run an exported function from a text-format module.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Module source file
    file: PathBuf,

    /// Export to invoke
    #[arg(default_value = "main")]
    export: String,

    /// i32 arguments passed to the export
    #[arg(allow_negative_numbers = true)]
    args: Vec<i32>,

    /// Maximum nested call depth
    #[arg(long, value_name = "N", default_value_t = watrun::runtime::config::DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// Print the token stream as JSON and exit
    #[arg(long)]
    tokens: bool,
}

fn main() -> Result<()> {
    watrun::init_tracing();
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read input file {}", cli.file.display()))?;

    if cli.tokens {
        let tokens = Lexer::tokenise(&source).with_context(|| format!("failed to lex {}", cli.file.display()))?;
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    let module = wat::parse(&source).with_context(|| format!("failed to parse {}", cli.file.display()))?;
    let config = Config::default().with_max_call_depth(cli.max_call_depth);
    let mut interp = Interpreter::with_config(&module, config);
    let results = interp
        .invoke_export(&cli.export, &cli.args)
        .with_context(|| format!("failed to execute {}", cli.export))?;

    if cli.json {
        println!("{}", serde_json::to_string(&results)?);
    } else {
        let line: Vec<String> = results.iter().map(|v| v.to_string()).collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}
