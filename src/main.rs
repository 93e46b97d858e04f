//! Locsheet - command line front end for the localization table editor core

use anyhow::Context;
use locsheet::{Session, load_config, logging};
use locsheet_fill::FillMode;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Usage: locsheet [OPTIONS] <COMMAND> [VALUE]...");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  fill VALUE...             Continue a column of values (numeric progression or copy)");
    eprintln!("  check KEY...              Validate localization keys");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -m, --mode <MODE>         Fill mode: auto (alias series) or copy (default: from config, else auto)");
    eprintln!("  -n, --count <N>           Number of values to generate (default: 1)");
    eprintln!("  --config <FILE>           Read configuration from FILE");
    eprintln!("  --print-config            Print the effective configuration and exit");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Fill,
    Check,
    PrintConfig,
}

struct Cli {
    action: Action,
    mode: Option<FillMode>,
    count: usize,
    config: Option<PathBuf>,
    values: Vec<String>,
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_usage();
    std::process::exit(1);
}

fn parse_args(args: &[String]) -> Cli {
    let mut action: Option<Action> = None;
    let mut mode: Option<FillMode> = None;
    let mut count: usize = 1;
    let mut config: Option<PathBuf> = None;
    let mut values: Vec<String> = Vec::new();
    let mut options_done = false;

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        // Negative numbers are values, not options.
        let is_option = !options_done && arg.starts_with('-') && arg.parse::<i64>().is_err();
        if is_option {
            match arg {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--" => options_done = true,
                "-m" | "--mode" => {
                    i += 1;
                    let Some(value) = args.get(i) else {
                        usage_error("--mode requires a value");
                    };
                    match value.parse::<FillMode>() {
                        Ok(parsed) => mode = Some(parsed),
                        Err(e) => usage_error(&e.to_string()),
                    }
                }
                "-n" | "--count" => {
                    i += 1;
                    let Some(value) = args.get(i) else {
                        usage_error("--count requires a number");
                    };
                    match value.parse::<usize>() {
                        Ok(parsed) => count = parsed,
                        Err(_) => usage_error(&format!("Invalid count: {}", value)),
                    }
                }
                "--config" => {
                    i += 1;
                    let Some(value) = args.get(i) else {
                        usage_error("--config requires a file path");
                    };
                    config = Some(PathBuf::from(value));
                }
                "--print-config" => action = Some(Action::PrintConfig),
                other => usage_error(&format!("Unknown option: {}", other)),
            }
        } else if action.is_none() {
            action = match arg {
                "fill" => Some(Action::Fill),
                "check" => Some(Action::Check),
                other => usage_error(&format!("Unknown command: {}", other)),
            };
        } else {
            values.push(args[i].clone());
        }
        i += 1;
    }

    let Some(action) = action else {
        usage_error("No command given");
    };
    if action != Action::PrintConfig && values.is_empty() {
        usage_error("At least one value is required");
    }

    Cli {
        action,
        mode,
        count,
        config,
        values,
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, warnings) = load_config(cli.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut session = Session::new(config).context("Failed to start session")?;

    match cli.action {
        Action::PrintConfig => {
            print!("{}", session.config().to_toml()?);
        }
        Action::Fill => {
            for value in session.fill_column(&cli.values, cli.count, cli.mode)? {
                println!("{}", value);
            }
        }
        Action::Check => {
            let issues = session.check_keys(&cli.values)?;
            for issue in &issues {
                println!("{}", issue);
            }
            if !issues.is_empty() {
                return Ok(ExitCode::from(2));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
