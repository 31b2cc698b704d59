//! Flow CLI
//!
//! Reactive tree-walking interpreter.

use flowc::commands::{lex_file, parse_file, run_file, run_repl};
use flowc::{init_tracing, parse_options, Options};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let (options, rest) = match parse_options(&args[2..]) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    };

    match command.as_str() {
        "run" => {
            let Some(path) = rest.first() else {
                eprintln!("error: missing file path");
                eprintln!("Usage: flow run <file.flow> [--max-depth=N]");
                std::process::exit(1);
            };
            run_file(path, &options);
        }
        "repl" => {
            run_repl(&options);
        }
        "parse" => {
            let Some(path) = rest.first() else {
                eprintln!("Usage: flow parse <file.flow>");
                std::process::exit(1);
            };
            parse_file(path);
        }
        "lex" => {
            let Some(path) = rest.first() else {
                eprintln!("Usage: flow lex <file.flow>");
                std::process::exit(1);
            };
            lex_file(path);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Flow {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // If it looks like a file path, try to run it
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("flow"))
            {
                run_file(command, &options);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    let defaults = Options::default();
    println!("Flow, a reactive expression language");
    println!();
    println!("Usage: flow <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.flow>      Evaluate a Flow program");
    println!("  repl                 Start an interactive session");
    println!("  parse <file.flow>    Parse and print the program");
    println!("  lex <file.flow>      Tokenize and print the tokens");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!(
        "  --max-depth=<n>      Maximum call depth (default: {})",
        defaults.max_depth
    );
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable interpreter tracing (e.g. RUST_LOG=flow_eval=debug)");
    println!();
    println!("Examples:");
    println!("  flow run main.flow");
    println!("  flow main.flow --max-depth=512");
    println!("  flow repl");
}
