//! AOWLN - SWRL rule diagram generator
//!
//! Draws the body and head diagram of every rule in a rule document.

use std::path::PathBuf;
use std::process::ExitCode;

use aowln_viz::{BatchRunner, OutputFormat, Result, RuleDocument, VizConfig};
use clap::Parser;

/// AOWLN rule diagram generator
#[derive(Parser, Debug)]
#[command(name = "aowln")]
#[command(version)]
#[command(about = "Draws AOWLN diagrams for the SWRL rules of an ontology", long_about = None)]
struct Args {
    /// Rule document (JSON)
    #[arg(required_unless_present = "print_config")]
    rules: Option<PathBuf>,

    /// Directory the diagrams are written to
    #[arg(required_unless_present_any = ["list", "print_config"])]
    output_dir: Option<PathBuf>,

    /// Output format, overriding the configuration file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Worker threads, overriding the configuration file (0 = one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the rules in SWRL notation and exit
    #[arg(long)]
    list: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Create config
    let mut config = match &args.config {
        Some(path) => VizConfig::load(path)?,
        None => VizConfig::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(rules_path) = args.rules else {
        log::error!("a rule document is required");
        return Ok(ExitCode::FAILURE);
    };
    let document = RuleDocument::load(&rules_path)?;
    let rules = document.to_rules();

    if args.list {
        for rule in &rules {
            println!("{}: {}", rule.name, rule);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(output_dir) = args.output_dir else {
        log::error!("an output directory is required");
        return Ok(ExitCode::FAILURE);
    };

    let summary = BatchRunner::new(config).run(&rules, &output_dir)?;
    if summary.failed() > 0 {
        log::warn!(
            "{} of {} rule(s) could not be drawn",
            summary.failed(),
            summary.reports.len()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_print_config_needs_no_rules() {
        let args = Args::try_parse_from(["aowln", "--print-config"]).unwrap();
        assert!(args.print_config);
        assert!(args.rules.is_none());
    }

    #[test]
    fn test_rules_required_for_drawing() {
        assert!(Args::try_parse_from(["aowln"]).is_err());
        assert!(Args::try_parse_from(["aowln", "rules.json"]).is_err());

        let args = Args::try_parse_from(["aowln", "rules.json", "out", "-f", "dot"]).unwrap();
        assert_eq!(args.rules, Some(PathBuf::from("rules.json")));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.format, Some(OutputFormat::Dot));
    }

    #[test]
    fn test_list_needs_no_output_dir() {
        let args = Args::try_parse_from(["aowln", "rules.json", "--list"]).unwrap();
        assert!(args.list);
        assert!(args.output_dir.is_none());
    }
}
