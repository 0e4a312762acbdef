//! `vittec`: check a Vitte source file and print its diagnostics.

use vitte_driver::check::{check_file, parse_args, OutputFormat};
use vitte_driver::{init_tracing, PipelineConfig};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        std::process::exit(2);
    }

    let (mut options, path) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            std::process::exit(2);
        }
    };
    options.trace |= PipelineConfig::from_env().trace;

    // JSON goes to stdout so it can be piped; human output to stderr.
    let result = match options.format {
        OutputFormat::Human => check_file(&path, &options, &mut std::io::stderr().lock()),
        OutputFormat::Json => check_file(&path, &options, &mut std::io::stdout().lock()),
    };

    match result {
        Ok(true) => {
            if options.format == OutputFormat::Human {
                eprintln!("OK: {path}");
            }
        }
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: vittec [options] <file.vit>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --format=<fmt>   Diagnostic format: human (default), json");
    eprintln!("  --context=<n>    Source lines shown around each error (default 2)");
    eprintln!("  --trace          Print per-pass timings (also VITTE_TRACE=1)");
    eprintln!();
    eprintln!("Logging: VITTE_LOG or RUST_LOG filter directives, VITTE_LOG_TREE=1 for a span tree");
}
