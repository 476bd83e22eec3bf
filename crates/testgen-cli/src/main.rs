//! `testgen` - generate pytest cases for a Python function

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use testgen_analysis::{analyze, Finding};
use testgen_core::{GeneratorConfig, TestGenerator};
use tracing::Level;

mod telemetry;

fn build_cli() -> Command {
    let source_arg = Arg::new("source")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Python file containing the function under test");

    let config_arg = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file");

    Command::new("testgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Static-analysis guided test generation for Python functions")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .value_parser(value_parser!(Level))
                .help("Log level when RUST_LOG is unset"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Print structural findings")
                .arg(source_arg.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("prompt")
                .about("Print the prompt that would be sent to the model")
                .arg(source_arg.clone())
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate and save a test file")
                .arg(source_arg)
                .arg(config_arg)
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the generated tests"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Requested test category (unit, integration, ...)"),
                )
                .arg(Arg::new("model").long("model").help("Model identifier"))
                .arg(Arg::new("endpoint").long("endpoint").help("Ollama base URL"))
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail instead of writing an empty file when generation fails"),
                ),
        )
}

/// Load the config file (if any) and apply command-line overrides
fn resolve_config(args: &ArgMatches) -> Result<GeneratorConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    // `prompt` does not define the override flags.
    if let Some(output) = args.try_get_one::<PathBuf>("output").ok().flatten() {
        config = config.with_output_path(output);
    }
    if let Some(category) = args.try_get_one::<String>("category").ok().flatten() {
        config = config.with_test_category(category);
    }
    if let Some(model) = args.try_get_one::<String>("model").ok().flatten() {
        config = config.with_model(model);
    }
    if let Some(endpoint) = args.try_get_one::<String>("endpoint").ok().flatten() {
        config = config.with_endpoint(endpoint);
    }

    config.validate()?;
    Ok(config)
}

fn read_source(args: &ArgMatches) -> Result<String> {
    let path = args
        .get_one::<PathBuf>("source")
        .context("missing source file")?;
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn render_findings(findings: &[Finding], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(findings)?);
    }
    if findings.is_empty() {
        return Ok("No major issues detected.".to_string());
    }
    Ok(findings
        .iter()
        .map(|f| format!("[{}] {}", f.kind, f.message))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let level = matches
        .get_one::<Level>("log-level")
        .copied()
        .unwrap_or(Level::INFO);
    telemetry::init_tracing(matches.get_flag("log-json"), level);

    match matches.subcommand() {
        Some(("analyze", args)) => {
            let source = read_source(args)?;
            println!("{}", render_findings(&analyze(&source), args.get_flag("json"))?);
        }
        Some(("prompt", args)) => {
            let source = read_source(args)?;
            let generator = TestGenerator::ollama(resolve_config(args)?);
            println!("{}", generator.prepare_prompt(&source).await);
        }
        Some(("generate", args)) => {
            let source = read_source(args)?;
            let generator = TestGenerator::ollama(resolve_config(args)?);

            let report = if args.get_flag("strict") {
                generator.try_run(&source).await?
            } else {
                generator.run(&source).await?
            };

            if report.is_empty() {
                tracing::warn!("Model returned no test code for {}", report.function_name);
            }
            println!(
                "Test case for {} saved to {} ({} bytes)",
                report.function_name,
                report.artifact_path.display(),
                report.generated_bytes
            );
        }
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn generate_overrides_config() {
        let matches = build_cli()
            .try_get_matches_from([
                "testgen",
                "generate",
                "fn.py",
                "--output",
                "out/test_fn.py",
                "--category",
                "integration",
                "--model",
                "codellama",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        let config = resolve_config(args).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/test_fn.py"));
        assert_eq!(config.test_category, "integration");
        assert_eq!(config.model, "codellama");
        assert_eq!(config.endpoint, testgen_core::config::DEFAULT_ENDPOINT);
    }

    #[test]
    fn prompt_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testgen.toml");
        std::fs::write(&path, "test_category = \"regression\"\n").unwrap();

        let matches = build_cli()
            .try_get_matches_from(["testgen", "prompt", "fn.py", "--config", path.to_str().unwrap()])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        assert_eq!(resolve_config(args).unwrap().test_category, "regression");
    }

    #[test]
    fn render_plain_and_json() {
        let findings = analyze("def divide(a,b):\n    return a/b");

        let plain = render_findings(&findings, false).unwrap();
        assert!(plain.starts_with("[division-risk] Function 'divide' performs division"));

        let json = render_findings(&findings, true).unwrap();
        assert!(json.contains("\"kind\": \"missing_exception_handling\""));

        assert_eq!(render_findings(&[], false).unwrap(), "No major issues detected.");
    }

    #[test]
    fn global_log_flags_parse() {
        let matches = build_cli()
            .try_get_matches_from(["testgen", "analyze", "fn.py", "--log-level", "debug", "--log-json"])
            .unwrap();
        assert_eq!(matches.get_one::<Level>("log-level"), Some(&Level::DEBUG));
        assert!(matches.get_flag("log-json"));
    }
}
