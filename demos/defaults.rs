//! Layering a configuration file over a set of defaults.
//!
//! Run with: cargo run --example defaults [DEFAULTS CONFIG]
//!
//! Without arguments, built-in buffers are used. Set `RUST_LOG=serde_isc=trace`
//! to watch the scanner, parser and merge at work.

use serde_isc::{parse, Error, Value};
use std::process::ExitCode;

const DEFAULTS: &[u8] = br#"
CGI {
	logdir "/var/log/cgi";
};
RADIUS {
	server {
		port 1812;
	};
};
"#;

const CONFIG: &[u8] = br#"
CGI {
	logdir "/srv/www/logs";
};
"#;

fn read_config(path: Option<&str>, fallback: &[u8]) -> Result<Value, Error> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| Error::io(&format!("{}: {}", path, e)))?;
            parse(&bytes)
        }
        None => parse(fallback),
    }
}

fn run(args: &[String]) -> Result<Value, Error> {
    let (defaults_path, config_path) = match args {
        [defaults, config] => (Some(defaults.as_str()), Some(config.as_str())),
        _ => (None, None),
    };

    let defaults = read_config(defaults_path, DEFAULTS)?;
    let mut settings = read_config(config_path, CONFIG)?;
    settings.fill_defaults(&defaults)?;
    Ok(settings)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() && args.len() != 2 {
        eprintln!("usage: defaults [DEFAULTS CONFIG]");
        return ExitCode::from(1);
    }

    let settings = match run(&args) {
        Ok(settings) => settings,
        Err(e @ Error::UnexpectedEndOfInput { .. }) => {
            eprintln!("Unexpected end of file: {}", e);
            return ExitCode::from(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let logdir = settings.lookup("CGI/logdir").map(Value::try_str);
    let port = settings.lookup("RADIUS/server/port").map(Value::try_i64);

    match (logdir, port) {
        (Some(Ok(logdir)), Some(Ok(port))) => {
            println!("CGI logdir: {}", logdir);
            println!("RADIUS port: {}", port);
            ExitCode::SUCCESS
        }
        (logdir, port) => {
            eprintln!("Incomplete settings: logdir={:?} port={:?}", logdir, port);
            ExitCode::from(2)
        }
    }
}
