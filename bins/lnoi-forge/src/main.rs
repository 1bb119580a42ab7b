use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use arcstr::ArcStr;
use clap::{Parser, Subcommand};
use config::Config;
use lnoi400::components::generator;
use lnoi400::{generators, lnoi400, Lnoi400Params};
use photonir::regression::{RegressionHarness, Tolerances};
use photonir::{Context, Technology};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cwd = std::env::current_dir().with_context(|| "Failed to get the working directory.")?;
    let config = match &args.config {
        Some(path) => Config::from_path(&cwd, path)?,
        None => Config::new(&cwd)?,
    };
    init_logging(&config);

    match args.command {
        Command::Technology { params, out } => {
            let tech = technology(params.as_deref())?;
            write_output(out.as_deref(), &tech.to_json()?)?;
        }
        Command::UiSchema { out } => {
            let schema = lnoi400::ui::schema()?;
            write_output(out.as_deref(), &serde_json::to_string_pretty(&schema)?)?;
        }
        Command::Component { name, params, out } => {
            let layout = component(&name, params.as_deref())?;
            write_output(out.as_deref(), &serde_json::to_string(&layout)?)?;
        }
        Command::Regress { names, bless } => {
            let failures = regress(&config, &names, bless)?;
            if failures > 0 {
                bail!("{failures} component families differ from their golden layouts");
            }
        }
    }

    Ok(())
}

/// Generates LNOI400 technology files, component layouts and UI schemas.
#[derive(Parser)]
#[command(version, about)]
pub struct Args {
    /// The configuration file.
    ///
    /// If unspecified, the nearest `lnoi-forge.toml` in the working directory
    /// or its ancestors is used.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Writes the technology as JSON.
    Technology {
        /// A JSON file of technology parameters. Missing parameters take their defaults.
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// The output path. If unspecified, the output is written to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Writes the argument schema of every component and of the technology.
    UiSchema {
        /// The output path. If unspecified, the output is written to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generates a component and writes its flattened layout as JSON.
    Component {
        /// The generator function, such as `mmi1x2`.
        name: String,
        /// A JSON file of generator parameters. Missing parameters take their defaults.
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// The output path. If unspecified, the output is written to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Compares default components against their golden layouts.
    Regress {
        /// The generator functions to check. Checks every generator if empty.
        names: Vec<String>,
        /// Write golden layouts that do not exist yet.
        #[arg(long)]
        bless: bool,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}.", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {:?}.", path))
}

/// Writes `contents` to `out`, creating parent directories, or to stdout.
fn write_output(out: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}.", parent))?;
            }
            fs::write(path, contents).with_context(|| format!("Failed to write {:?}.", path))?;
            eprintln!("Wrote {:?}.", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{contents}").with_context(|| "Failed to write to stdout.")?;
        }
    }
    Ok(())
}

fn technology(params: Option<&Path>) -> anyhow::Result<Technology> {
    let params: Lnoi400Params = match params {
        Some(path) => serde_json::from_value(read_json(path)?)
            .with_context(|| format!("Invalid technology parameters in {:?}.", path))?,
        None => Lnoi400Params::default(),
    };
    Ok(lnoi400(&params)?)
}

fn component(name: &str, params: Option<&Path>) -> anyhow::Result<photonir::FlatLayout> {
    let entry = generator(name)?;
    let params = match params {
        Some(path) => read_json(path)?,
        None => serde_json::json!({}),
    };
    let mut ctx = Context::new(technology(None)?);
    let id = entry
        .generate(&mut ctx, params)
        .with_context(|| format!("Failed to generate `{name}`."))?;
    if !ctx.issues.is_empty() {
        eprint!("{}", ctx.issues);
    }
    Ok(ctx.library.component(id)?.flatten(&ctx.library)?)
}

fn harness(config: &Config, bless: bool) -> RegressionHarness {
    let regression = &config.regression;
    RegressionHarness {
        golden_dir: regression.golden_dir.clone(),
        artifact_dir: regression.artifact_dir.clone(),
        tolerances: Tolerances {
            default: regression.tolerance,
            overrides: regression
                .overrides
                .iter()
                .map(|(family, tolerance)| (ArcStr::from(family.as_str()), *tolerance))
                .collect(),
        },
        bless,
    }
}

/// Checks the default component of each family, returning the number of failures.
fn regress(config: &Config, names: &[String], bless: bool) -> anyhow::Result<usize> {
    let harness = harness(config, bless);
    let entries = if names.is_empty() {
        generators()
    } else {
        names
            .iter()
            .map(|name| generator(name))
            .collect::<photonir::Result<Vec<_>>>()?
    };

    let technology = technology(None)?;
    let mut failures = 0;
    for entry in entries {
        let mut ctx = Context::new(technology.clone());
        let id = entry
            .generate(&mut ctx, serde_json::json!({}))
            .with_context(|| format!("Failed to generate `{}`.", entry.function))?;
        let layout = ctx.library.component(id)?.flatten(&ctx.library)?;
        match harness.check(entry.function, &layout) {
            Ok(diff) => println!("ok    {} (diff ratio {:e})", entry.function, diff.ratio()),
            Err(err) => {
                println!("FAIL  {}: {err}", entry.function);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();

        let args = Args::try_parse_from([
            "lnoi-forge",
            "regress",
            "mmi1x2",
            "chip_frame",
            "--bless",
            "--config",
            "forge.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("forge.toml")));
        let Command::Regress { names, bless } = args.command else {
            panic!("expected the regress command");
        };
        assert_eq!(names, ["mmi1x2", "chip_frame"]);
        assert!(bless);
    }

    #[test]
    fn blessed_goldens_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.regression.golden_dir = dir.path().join("golden");
        config.regression.artifact_dir = dir.path().join("artifacts");
        let names = ["l_turn_bend".to_string(), "mmi2x2".to_string()];

        assert_eq!(regress(&config, &names, false).unwrap(), 2);
        assert_eq!(regress(&config, &names, true).unwrap(), 0);
        assert!(dir.path().join("golden/mmi2x2.json").is_file());
        assert_eq!(regress(&config, &names, false).unwrap(), 0);
        assert!(!dir.path().join("artifacts").exists());

        assert!(regress(&config, &["ring".to_string()], false).is_err());
    }
}
