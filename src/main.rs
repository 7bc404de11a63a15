use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use i18n_audit::output::format_json;
use i18n_audit::{
    run_audit, run_fix, run_keys, AuditConfig, AuditOptions, ConfigFile, ReportFormatter,
    SimpleFormatter,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter (e.g. `i18n_audit=debug`)
const LOG_ENV: &str = "I18N_AUDIT_LOG";

/// i18n audit - Find missing translations and hardcoded UI text
#[derive(Parser, Debug)]
#[command(name = "i18n-audit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Project root; relative directories are resolved against it
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (default: i18n-audit.toml in the project root, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    audit: AuditArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diff every catalog against the base language (default)
    Audit(AuditArgs),
    /// Insert placeholders from previously written missing-key reports
    Fix(FixArgs),
    /// List translation keys used in the source tree
    Keys(KeysArgs),
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
struct ScopeArgs {
    /// Base language every other catalog is compared against
    #[arg(long, value_parser = validate_language)]
    base: Option<String>,

    /// Languages to audit (e.g. "fr,en,he")
    #[arg(long, value_delimiter = ',', value_parser = validate_language)]
    languages: Vec<String>,

    /// Directory scanned for key usages
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Directory holding <lang>.json / <lang>.yml catalogs
    #[arg(long)]
    locales_dir: Option<PathBuf>,

    /// Directory for missing_keys_<lang>.json reports
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

#[derive(Args, Debug, Clone, Default)]
struct AuditArgs {
    #[command(flatten)]
    scope: ScopeArgs,

    /// Number of keys listed per section in the summary
    #[arg(long, value_parser = validate_preview)]
    preview: Option<usize>,

    /// Write missing_keys_<lang>.json reports
    #[arg(long)]
    write_missing: bool,

    /// Insert review-marked placeholders for every gap
    #[arg(long)]
    fix: bool,

    /// Also treat keys used in code but absent from a catalog as gaps
    #[arg(long)]
    include_unresolved: bool,

    /// Skip the hardcoded-text scan
    #[arg(long)]
    no_hardcoded: bool,

    /// Fail when values are identical to the base language
    #[arg(long)]
    fail_on_suspicious: bool,
}

#[derive(Args, Debug, Clone)]
struct FixArgs {
    #[command(flatten)]
    scope: ScopeArgs,
}

#[derive(Args, Debug, Clone)]
struct KeysArgs {
    #[command(flatten)]
    scope: ScopeArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Colored summary
    #[default]
    Human,
    /// One `kind:...` line per finding
    Simple,
    /// Full report as JSON
    Json,
}

/// Validate a language code: 2-8 ASCII letters, digits, '-' or '_'
fn validate_language(s: &str) -> Result<String, String> {
    let code = s.trim();
    if code.len() < 2 || code.len() > 8 {
        return Err(format!("'{}' is not a valid language code", s));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!("'{}' is not a valid language code", s));
    }
    Ok(code.to_string())
}

/// Validate that the preview cap is between 1 and 1000
fn validate_preview(s: &str) -> Result<usize, String> {
    let limit: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(1..=1000).contains(&limit) {
        return Err(format!("preview must be between 1 and 1000, got {}", limit));
    }

    Ok(limit)
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose > 0 {
        EnvFilter::new(match verbose {
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Defaults, then the config file, then command-line flags
fn build_config(root: &Path, config_path: Option<&Path>, scope: &ScopeArgs) -> Result<AuditConfig> {
    let mut config = AuditConfig::new(root);

    let file = match config_path {
        Some(path) => Some(ConfigFile::load(path)?),
        None => ConfigFile::discover(root)?,
    };
    if let Some(file) = file {
        config = config.apply_file(file);
    }

    if !scope.languages.is_empty() {
        config = config.with_languages(scope.languages.clone());
    }
    if let Some(base) = &scope.base {
        config = config.with_base_language(base.clone());
    }
    if let Some(dir) = &scope.source_dir {
        config = config.with_source_dir(dir.clone());
    }
    if let Some(dir) = &scope.locales_dir {
        config = config.with_locales_dir(dir.clone());
    }
    if let Some(dir) = &scope.report_dir {
        config = config.with_report_dir(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

fn audit(cli: &Cli, args: &AuditArgs) -> Result<i32> {
    let mut config = build_config(&cli.root, cli.config.as_deref(), &args.scope)?;
    if let Some(limit) = args.preview {
        config = config.with_preview_limit(limit);
    }
    if args.no_hardcoded {
        config = config.with_scan_hardcoded(false);
    }
    if args.include_unresolved {
        config = config.with_include_unresolved(true);
    }
    if args.fail_on_suspicious {
        config = config.with_fail_on_suspicious(true);
    }

    let options = AuditOptions::new()
        .with_fix(args.fix)
        .with_write_missing(args.write_missing);
    let outcome = run_audit(&config, options)?;

    let rendered = match args.scope.format {
        OutputFormat::Human => {
            ReportFormatter::with_preview_limit(config.preview_limit).format(&outcome)
        }
        OutputFormat::Simple => SimpleFormatter::new().format(&outcome),
        OutputFormat::Json => format_json(&outcome).context("Failed to serialize report")?,
    };
    print!("{}", rendered);

    Ok(if outcome.verdict.passed { 0 } else { 1 })
}

fn fix(cli: &Cli, args: &FixArgs) -> Result<i32> {
    let config = build_config(&cli.root, cli.config.as_deref(), &args.scope)?;
    let fixes = run_fix(&config)?;

    let rendered = match args.scope.format {
        OutputFormat::Human => ReportFormatter::new().format_fixes(&fixes),
        OutputFormat::Simple => SimpleFormatter::new().format_fixes(&fixes),
        OutputFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(&fixes).context("Failed to serialize fixes")?;
            text.push('\n');
            text
        }
    };
    print!("{}", rendered);
    Ok(0)
}

fn keys(cli: &Cli, args: &KeysArgs) -> Result<i32> {
    let config = build_config(&cli.root, cli.config.as_deref(), &args.scope)?;
    let scan = run_keys(&config)?;

    let rendered = match args.scope.format {
        OutputFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(&scan).context("Failed to serialize keys")?;
            text.push('\n');
            text
        }
        _ => SimpleFormatter::new().format_keys(&scan),
    };
    print!("{}", rendered);
    Ok(0)
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Some(Command::Audit(args)) => audit(cli, args),
        Some(Command::Fix(args)) => fix(cli, args),
        Some(Command::Keys(args)) => keys(cli, args),
        None => audit(cli, &cli.audit),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language() {
        assert_eq!(validate_language("fr"), Ok("fr".to_string()));
        assert_eq!(validate_language("pt-BR"), Ok("pt-BR".to_string()));
        assert!(validate_language("f").is_err());
        assert!(validate_language("../etc").is_err());
        assert!(validate_language("toolonglang").is_err());
    }

    #[test]
    fn test_validate_preview() {
        assert_eq!(validate_preview("20"), Ok(20));
        assert!(validate_preview("0").is_err());
        assert!(validate_preview("1001").is_err());
        assert!(validate_preview("many").is_err());
    }

    #[test]
    fn test_default_command_is_audit() {
        let cli = Cli::try_parse_from(["i18n-audit", "--write-missing", "--base", "en"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.audit.write_missing);
        assert_eq!(cli.audit.scope.base.as_deref(), Some("en"));
    }

    #[test]
    fn test_subcommand_args() {
        let cli =
            Cli::try_parse_from(["i18n-audit", "--root", "web", "keys", "--format", "json"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("web"));
        match cli.command {
            Some(Command::Keys(args)) => assert_eq!(args.scope.format, OutputFormat::Json),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_languages_are_comma_separated() {
        let cli = Cli::try_parse_from(["i18n-audit", "audit", "--languages", "fr,en"]).unwrap();
        match cli.command {
            Some(Command::Audit(args)) => assert_eq!(args.scope.languages, vec!["fr", "en"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
