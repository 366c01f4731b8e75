//! Parlance CLI
//!
//! Looks up translations the same way an application using [`IntlService`]
//! would, and evaluates gettext plural rules.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parlance::{
    resolve_index, IntlConfig, IntlService, PluralRule, Replacements, CONFIG_FILE_NAME,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parlance", version, about = "Look up translations and evaluate plural rules")]
struct Cli {
    /// Config file or directory containing parlance.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Locale directory (overrides the config)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Locale to translate into (defaults to the configured default locale)
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a text
    Translate {
        text: String,
        /// Placeholder value, `name=value` (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Translate a count-dependent text
    Plural {
        singular: String,
        plural: String,
        #[arg(allow_negative_numbers = true)]
        count: i64,
        /// Placeholder value, `name=value` (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Print the form index a gettext plural rule selects for a range of counts
    PluralRule {
        /// e.g. "nplurals=2; plural=(n != 1);"
        rule: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        from: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        to: i64,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty placeholder name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<IntlConfig> {
    let mut config = match &cli.config {
        Some(path) => IntlConfig::load(path)?,
        None if Path::new(CONFIG_FILE_NAME).is_file() => {
            IntlConfig::load(Path::new(CONFIG_FILE_NAME))?
        }
        None => IntlConfig::new(cli.locale.clone().unwrap_or_else(|| "en".to_string())),
    };
    if let Some(dir) = &cli.dir {
        config.locale_dir = dir.clone();
    }
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn service(cli: &Cli) -> Result<IntlService> {
    let config = load_config(cli)?;
    IntlService::from_config(&config).context("Failed to set up the i18n service")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Translate { text, set } => {
            let intl = service(&cli)?;
            let replacements: Replacements = set.iter().cloned().collect();
            println!("{}", intl.tr(text, Some(&replacements), cli.locale.as_deref()));
        }
        Command::Plural {
            singular,
            plural,
            count,
            set,
        } => {
            let intl = service(&cli)?;
            let replacements: Replacements = set.iter().cloned().collect();
            println!(
                "{}",
                intl.tr_n(
                    singular,
                    plural,
                    *count,
                    Some(&replacements),
                    cli.locale.as_deref()
                )
            );
        }
        Command::PluralRule { rule, from, to } => {
            let parsed = PluralRule::parse(rule).context("Invalid plural rule")?;
            for n in *from..=*to {
                println!("{n}\t{}", resolve_index(Some(&parsed), n));
            }
        }
    }

    Ok(())
}
