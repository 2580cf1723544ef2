//! Message Resolver CLI
//!
//! Usage:
//!   message-resolver [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -p, --param <KEY=VALUE>    Parameter value (repeatable)
//!   -P, --params-file <FILE>   TOML table of parameter values
//!   -c, --catalog <FILE>       Message catalog (TOML format), used with --key
//!   -k, --key <KEY>            Message key to look up in the catalog
//!   -l, --locale <LOCALE>      Catalog locale [default: en]
//!   --check                    Report unresolvable regions instead of resolving
//!   --declare <KEY[=DEFAULT]>  Print a parameter declaration
//!   -h, --help                 Print help

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use message_resolver::{Catalog, ResolverConfig, Resolver, TemplateSource, Value};

#[derive(Parser)]
#[command(name = "message-resolver")]
#[command(about = "Resolve parameterized message templates")]
struct Cli {
    /// Template text (reads from stdin if not provided)
    template: Option<String>,

    /// Parameter value, overriding the params file
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// TOML table of parameter values
    #[arg(short = 'P', long, value_name = "FILE")]
    params_file: Option<PathBuf>,

    /// Message catalog (TOML format)
    #[arg(short, long, requires = "key", conflicts_with = "template")]
    catalog: Option<PathBuf>,

    /// Message key to look up in the catalog
    #[arg(short, long, requires = "catalog")]
    key: Option<String>,

    /// Catalog locale
    #[arg(short, long, default_value = "en")]
    locale: String,

    /// Token opening a parameter region
    #[arg(long)]
    prefix: Option<String>,

    /// Token closing a parameter region
    #[arg(long)]
    suffix: Option<String>,

    /// Token separating a parameter name from its default value
    #[arg(long)]
    delimiter: Option<String>,

    /// Escape character
    #[arg(long)]
    escape: Option<String>,

    /// Drop escape characters in front of escaped prefixes
    #[arg(long)]
    no_preserve_escapes: bool,

    /// Maximum nesting of expansions
    #[arg(long)]
    max_depth: Option<usize>,

    /// Report unterminated and unresolvable regions on stderr
    #[arg(long)]
    check: bool,

    /// Print a parameter declaration and exit
    #[arg(long, value_name = "KEY[=DEFAULT]")]
    declare: Option<String>,

    /// Log resolution details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    // Load catalog
    let catalog = match &cli.catalog {
        Some(path) => match Catalog::from_file(path) {
            Ok(c) => Some(c),
            Err(e) => fail(format!("Error loading catalog '{}': {}", path.display(), e)),
        },
        None => None,
    };

    let base = catalog.as_ref().map(|c| c.config().clone()).unwrap_or_default();
    let config = match apply_overrides(&cli, base) {
        Ok(config) => config,
        Err(e) => fail(format!("Invalid syntax options: {}", e)),
    };
    let resolver = Resolver::new(config);

    if let Some(declaration) = &cli.declare {
        let declared = match declaration.split_once('=') {
            Some((key, default)) => resolver.declare_parameter_with_default(key, Some(default)),
            None => resolver.declare_parameter(declaration),
        };
        match declared {
            Ok(text) => println!("{}", text),
            Err(e) => fail(format!("Error: {}", e)),
        }
        return;
    }

    let params = load_params(&cli);

    // Read template
    let (template, filename) = match (&catalog, &cli.key) {
        (Some(catalog), Some(key)) => match catalog.lookup(key, &cli.locale) {
            Some(template) => (template.to_string(), key.clone()),
            None => fail(format!(
                "Error: no template for '{}' in locale '{}'",
                key, cli.locale
            )),
        },
        _ => match &cli.template {
            Some(template) => (template.clone(), "<template>".to_string()),
            None => {
                if io::stdin().is_terminal() {
                    fail("Error: no template given (pass it as an argument or on stdin)");
                }
                let mut buffer = String::new();
                match io::stdin().read_to_string(&mut buffer) {
                    Ok(_) => (buffer, "<stdin>".to_string()),
                    Err(e) => fail(format!("Error reading from stdin: {}", e)),
                }
            }
        },
    };
    debug!(template = %filename, params = params.len(), "resolving");

    if cli.check {
        let issues = resolver.check(&template, &params);
        let color = io::stderr().is_terminal();
        for issue in &issues {
            eprint!("{}", issue.format(&template, &filename, color));
        }
        if !issues.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    let output = resolver.resolve(&template, &params);
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

/// Parse a `KEY=VALUE` argument
fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, _)) if key.trim().is_empty() => Err("parameter key cannot be empty".to_string()),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{}'", arg)),
    }
}

fn apply_overrides(
    cli: &Cli,
    base: ResolverConfig,
) -> Result<ResolverConfig, message_resolver::ConfigError> {
    let mut builder = base.to_builder();
    if let Some(prefix) = &cli.prefix {
        builder = builder.with_prefix(prefix.as_str());
    }
    if let Some(suffix) = &cli.suffix {
        builder = builder.with_suffix(suffix.as_str());
    }
    if let Some(delimiter) = &cli.delimiter {
        builder = builder.with_default_delimiter(delimiter.as_str());
    }
    if let Some(escape) = &cli.escape {
        builder = builder.with_escape_str(escape)?;
    }
    if cli.no_preserve_escapes {
        builder = builder.with_preserve_escapes(false);
    }
    if let Some(max_depth) = cli.max_depth {
        builder = builder.with_max_depth(max_depth);
    }
    builder.build()
}

/// Parameters from the params file, then from `--param` flags
fn load_params(cli: &Cli) -> BTreeMap<String, Value> {
    let mut params = match &cli.params_file {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => fail(format!("Error reading file '{}': {}", path.display(), e)),
            };
            match toml::from_str::<BTreeMap<String, Value>>(&content) {
                Ok(params) => params,
                Err(e) => fail(format!("Error parsing parameters '{}': {}", path.display(), e)),
            }
        }
        None => BTreeMap::new(),
    };

    for (key, value) in &cli.params {
        params.insert(key.clone(), Value::from(value.as_str()));
    }
    params
}

fn fail(message: impl Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
