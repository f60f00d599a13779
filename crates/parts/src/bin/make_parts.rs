//! Build the robot parts and write them to disk.
//!
//! Usage: `make-parts [--config FILE] [--out DIR] [PART...]`

use std::path::PathBuf;
use std::process::ExitCode;

use meiga_parts::{generate_parts, PartKind, PartsConfig};
use shape_kernel::TruckKernel;

const USAGE: &str = "usage: make-parts [--config FILE] [--out DIR] [PART...]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    parts: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                parsed.config = Some(args.next().ok_or("--config needs a file")?.into());
            }
            "--out" | "-o" => {
                parsed.out = Some(args.next().ok_or("--out needs a directory")?.into());
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown flag {flag}\n{USAGE}")),
            _ => parsed.parts.push(arg),
        }
    }
    Ok(parsed)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => PartsConfig::load(path)?,
        None => PartsConfig::default(),
    };
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    let parts = if args.parts.is_empty() {
        config.parts.clone()
    } else {
        args.parts
            .iter()
            .map(|p| p.parse::<PartKind>())
            .collect::<Result<Vec<_>, _>>()?
    };

    tracing::info!(
        parts = parts.len(),
        out = %config.output_dir.display(),
        "generating parts"
    );
    let mut kernel = TruckKernel::new();
    generate_parts(&mut kernel, &config, &parts)?;
    Ok(())
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut msg = format!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                msg.push_str(&format!("\n  caused by: {cause}"));
                source = cause.source();
            }
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn flags_and_parts() {
        let a = args(&["--out", "build", "rim", "-c", "parts.json", "rim_v3"]).unwrap();
        assert_eq!(a.out, Some(PathBuf::from("build")));
        assert_eq!(a.config, Some(PathBuf::from("parts.json")));
        assert_eq!(a.parts, vec!["rim", "rim_v3"]);
    }

    #[test]
    fn missing_flag_value() {
        assert!(args(&["--out"]).is_err());
        assert!(args(&["--verbose"]).unwrap_err().contains("unknown flag"));
    }
}
