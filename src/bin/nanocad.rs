//! Command-line driver: interpret a nanocad file and dump the resulting model.

use std::process::ExitCode;

use nanocad::{ENGINE_VERSION, ErrorPolicy, Session, SessionConfig};

fn usage(program: &str) {
    eprintln!("Usage: {program} [-h] [--keep-going] <filename>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("    filename        A CAD file to be interpreted.");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("    -h, --help      Shows this message.");
    eprintln!("    --keep-going    Report every failing line instead of stopping at the first.");
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the model dump
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("nanocad");

    let mut policy = ErrorPolicy::Abort;
    let mut path = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                usage(program);
                return ExitCode::SUCCESS;
            }
            "--keep-going" => policy = ErrorPolicy::Continue,
            flag if flag.starts_with('-') => {
                eprintln!("Unknown flag: {flag}");
                usage(program);
                return ExitCode::FAILURE;
            }
            file => path = Some(file.to_string()),
        }
    }

    println!("nanocad v{ENGINE_VERSION}");

    let Some(path) = path else {
        usage(program);
        return ExitCode::FAILURE;
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Couldn't open the CAD file {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::with_config(SessionConfig::default().with_error_policy(policy));
    match session.parse_source(&path, &source) {
        Ok(report) => {
            print!("{}", session.summary());
            if report.is_clean() {
                return ExitCode::SUCCESS;
            }
            for failure in report.failures {
                eprintln!("{:?}", miette::Report::new(failure));
            }
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            ExitCode::FAILURE
        }
    }
}
