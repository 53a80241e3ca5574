use std::{fs, process::ExitCode};

use clap::{Parser, ValueEnum};
use clap_stdin::{FileOrStdin, StdinError};
use env_logger::Env;
use log::error;
use thiserror::Error;

use minicc::Compilation;

#[derive(Error, Debug)]
enum CliError {
    #[error("cannot read input: {0}")]
    Input(#[from] StdinError),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Section {
    Tokens,
    Symbols,
    Ir,
    Asm,
    Errors,
    All,
}

/// Compiles a small C-like language to register-machine assembly
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file, or `-` for stdin
    #[arg(default_value = "-")]
    input: FileOrStdin,

    /// Sections to print [default: asm, errors]
    #[arg(long, value_enum)]
    emit: Vec<Section>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn report(compilation: &Compilation, sections: &[Section]) -> String {
    let wants = |s: Section| sections.contains(&s) || sections.contains(&Section::All);

    let mut out = vec![];
    if wants(Section::Tokens) {
        out.push(format!("== tokens ==\n{}", compilation.render_tokens()));
    }
    if wants(Section::Symbols) {
        out.push(format!("== symbols ==\n{}", compilation.render_symbols()));
    }
    if wants(Section::Ir) {
        out.push(format!("== intermediate code ==\n{}", compilation.render_ir()));
    }
    if wants(Section::Asm) {
        out.push(format!("== assembly ==\n{}", compilation.asm));
    }
    if wants(Section::Errors) {
        out.push(format!("== errors ==\n{}", compilation.render_errors()));
    }
    out.join("\n\n") + "\n"
}

fn run(args: Args) -> Result<bool, CliError> {
    let source = args.input.contents()?;
    let compilation = minicc::compile(&source);

    let sections = if args.emit.is_empty() {
        vec![Section::Asm, Section::Errors]
    } else {
        args.emit
    };
    let text = report(&compilation, &sections);

    match args.output {
        Some(path) => fs::write(path, text)?,
        None => print!("{}", text),
    }
    Ok(compilation.is_success())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
