//! Interpolated Text CLI
//!
//! Usage:
//!   interpolated-text [OPTIONS] <FORMAT> [VALUES]...
//!
//! Options:
//!   -c, --config <FILE>    Template options file (TOML format)
//!   -b, --bind <PATTERN>   Print the format with placeholders bound to PATTERN
//!   -f, --format           Print the underlying format and its arguments
//!   --dedent               Dedent multi-line formats before parsing
//!   --reuse                Share one slot between identical arguments
//!   -v, --verbose          Enable debug logging
//!   -h, --help             Print help

use std::borrow::Cow;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interpolated_text::parser::adjust_multiline;
use interpolated_text::{Arg, FormatSource, Template, TemplateOptions, Value};

#[derive(Parser)]
#[command(name = "interpolated-text")]
#[command(about = "Render composite format strings with deferred arguments")]
struct Cli {
    /// Format string with {N} / {N:format} placeholders
    #[arg(value_name = "FORMAT")]
    template: String,

    /// Positional values: null, true/false, integers and floats are typed, anything else is a string
    values: Vec<String>,

    /// Template options file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the format with each placeholder replaced by PATTERN, `{}` standing for the index
    #[arg(short, long, value_name = "PATTERN")]
    bind: Option<String>,

    /// Print the underlying format and the argument list
    #[arg(short, long)]
    format: bool,

    /// Dedent multi-line formats before parsing
    #[arg(long)]
    dedent: bool,

    /// Share one slot between identical arguments
    #[arg(long)]
    reuse: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load options
    let mut options = match &cli.config {
        Some(path) => match TemplateOptions::from_file(path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error loading options '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TemplateOptions::default(),
    };
    if cli.dedent {
        options.auto_adjust_multiline = true;
    }
    if cli.reuse {
        options.reuse_identical_arguments = true;
    }

    let args = cli.values.iter().map(|v| Arg::from(typed_value(v))).collect();
    let source = FormatSource::new(cli.template.as_str(), args);

    let template = match Template::parse_with_options(source, options.clone()) {
        Ok(t) => t,
        Err(e) => {
            // report against the text that was actually scanned
            let scanned = if options.auto_adjust_multiline {
                adjust_multiline(&cli.template)
            } else {
                Cow::Borrowed(cli.template.as_str())
            };
            eprint!("{}", e.format(&scanned, "<format>"));
            std::process::exit(1);
        }
    };

    if cli.format {
        println!("{}", template.format());
        for (i, argument) in template.arguments().iter().enumerate() {
            match &argument.format {
                Some(format) => println!(
                    "  {}: {} ({}, format '{}')",
                    i,
                    argument.value,
                    argument.value.type_name(),
                    format
                ),
                None => println!("  {}: {} ({})", i, argument.value, argument.value.type_name()),
            }
        }
        return;
    }

    let output = match &cli.bind {
        Some(pattern) => template.bind_placeholders(|i| pattern.replace("{}", &i.to_string())),
        None => template.render(),
    };
    match output {
        Ok(text) => {
            println!("{}", text);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Type a command-line value
fn typed_value(text: &str) -> Value {
    match text {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(n) = text.parse::<u64>() {
        return Value::UInt(n);
    }
    // "inf" and "NaN" stay strings
    if text.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(x) = text.parse::<f64>() {
            return Value::Float(x);
        }
    }
    Value::Str(text.to_string())
}
