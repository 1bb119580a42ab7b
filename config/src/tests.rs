use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{ARTIFACT_DIR_VAR, CONFIG_FILE, Config, GOLDEN_DIR_VAR, LOG_VAR, TOLERANCE_VAR};

fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn test_defaults_without_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = Config::with_env(dir.path(), None, &env(&[]))?;
    assert_eq!(cfg.regression.tolerance, 1e-5);
    assert_eq!(cfg.regression.golden_dir, dir.path().join("golden"));
    assert_eq!(cfg.log.filter, "info");
    Ok(())
}

#[test]
fn test_file_is_found_in_ancestors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        r#"
[regression]
tolerance = 1e-4
golden_dir = "tests/golden"

[regression.overrides]
mz_modulator_unbalanced = 1e-3

[log]
filter = "photonir=debug"
"#,
    )?;
    let nested = dir.path().join("a/b");
    std::fs::create_dir_all(&nested)?;

    let cfg = Config::with_env(&nested, None, &env(&[]))?;
    assert_eq!(cfg.regression.tolerance, 1e-4);
    assert_eq!(cfg.regression.golden_dir, dir.path().join("tests/golden"));
    assert_eq!(cfg.regression.artifact_dir, dir.path().join("target/regression"));
    assert_eq!(
        cfg.regression.overrides.get("mz_modulator_unbalanced"),
        Some(&1e-3)
    );
    assert_eq!(cfg.log.filter, "photonir=debug");
    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[regression]\ntolerance = 0.5\n")?;

    let cfg = Config::with_env(
        dir.path(),
        Some(Path::new("custom.toml")),
        &env(&[
            (TOLERANCE_VAR, "2e-5"),
            (GOLDEN_DIR_VAR, "/data/golden"),
            (ARTIFACT_DIR_VAR, "out"),
            (LOG_VAR, "warn"),
        ]),
    )?;
    assert_eq!(cfg.regression.tolerance, 2e-5);
    assert_eq!(cfg.regression.golden_dir, PathBuf::from("/data/golden"));
    assert_eq!(cfg.regression.artifact_dir, dir.path().join("out"));
    assert_eq!(cfg.log.filter, "warn");

    // Empty variables count as unset.
    let cfg = Config::with_env(dir.path(), Some(path.as_path()), &env(&[(TOLERANCE_VAR, "")]))?;
    assert_eq!(cfg.regression.tolerance, 0.5);
    Ok(())
}

#[test]
fn test_invalid_input_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(Config::with_env(dir.path(), None, &env(&[(TOLERANCE_VAR, "tight")])).is_err());
    assert!(Config::parse("[regression]\nbogus = 1\n", dir.path()).is_err());
    assert!(Config::with_env(dir.path(), Some(dir.path().join("missing.toml").as_path()), &env(&[])).is_err());
    Ok(())
}
