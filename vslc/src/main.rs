// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vslc::compiler::{CompileError, CompilerOptionsBuilder, CompilerPipeline};

/// Compiles VSL syntax trees to 32-bit x86 assembly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tree in dump format; `-` reads standard input.
    input: String,

    /// Where to write the assembly; standard output when omitted.
    #[arg(short, long)]
    output: Option<String>,

    /// Print the simplified tree to standard error.
    #[arg(long)]
    dump_tree: bool,

    /// Print the symbol table to standard error.
    #[arg(long)]
    dump_symtab: bool,

    /// Keep constant expressions as written.
    #[arg(long)]
    no_fold: bool,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), CompileError> {
    let options = CompilerOptionsBuilder::new()
        .fold_constants(!args.no_fold)
        .dump_tree(args.dump_tree)
        .dump_symtab(args.dump_symtab)
        .build();
    let mut pipeline = CompilerPipeline::new(options);

    let output = if args.input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|source| CompileError::Io {
                path: "<stdin>".to_string(),
                source,
            })?;
        pipeline.compile_source(&source)?
    } else {
        pipeline.compile_file(&args.input)?
    };

    if let Some(tree) = &output.tree_dump {
        eprintln!("{tree}");
    }
    if let Some(symtab) = &output.symtab_dump {
        eprintln!("{symtab}");
    }

    match &args.output {
        Some(path) => fs::write(path, &output.assembly).map_err(|source| CompileError::Io {
            path: path.clone(),
            source,
        }),
        None => {
            print!("{}", output.assembly);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("vslc: {err}");
            ExitCode::FAILURE
        }
    }
}
