// lits - An embeddable Lisp-family expression language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use lits_core::Context;
use lits_embed::{Lits, LitsConfig, LitsParams};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    env_logger::init();

    let mut debug = false;
    let mut files = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("Lits v{}", VERSION);
                return;
            }
            "--debug" => debug = true,
            _ => files.push(arg),
        }
    }

    let config = LitsConfig {
        debug,
        ast_cache_size: Some(64),
        ..LitsConfig::default()
    };
    let lits = match Lits::with_config(config) {
        Ok(lits) => lits,
        Err(e) => {
            eprintln!("Failed to start Lits: {}", e);
            process::exit(1);
        }
    };

    // Files and REPL lines share one global frame so definitions persist.
    let params = LitsParams::new().with_global_context(Context::new());

    if files.is_empty() {
        run_repl(&lits, &params);
    } else {
        run_files(&files, &lits, &params);
    }
}

/// Evaluate a sequence of source files
fn run_files(files: &[String], lits: &Lits, params: &LitsParams) {
    for file_path in files {
        if let Err(e) = eval_file(file_path, lits, params) {
            log::warn!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn eval_file(file_path: &str, lits: &Lits, params: &LitsParams) -> Result<(), String> {
    let path = Path::new(file_path);

    match path.extension().and_then(|e| e.to_str()) {
        Some("lits") => {}
        Some(ext) => {
            return Err(format!(
                "Error: unsupported file extension '.{}' for '{}'",
                ext, file_path
            ));
        }
        None => {
            return Err(format!(
                "Error: file '{}' has no extension (expected .lits)",
                file_path
            ));
        }
    }

    lits.eval_file(path, params)
        .map(|_| ())
        .map_err(|e| format!("Error in '{}': {}", file_path, e))
}

/// Run the interactive REPL
fn run_repl(lits: &Lits, params: &LitsParams) {
    println!("Lits v{}", VERSION);

    loop {
        print!("lits> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Write error: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }

                match lits.run(input, params) {
                    Ok(result) => println!("{}", result),
                    Err(e) => {
                        log::warn!("evaluation failed: {}", e);
                        eprintln!("Error: {}", e);
                    }
                }
            }
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}
