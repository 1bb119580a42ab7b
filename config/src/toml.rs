use std::path::Path;

use anyhow::{Context, Result};

use crate::Config;

pub(crate) fn parse_document(toml: &str, file: &Path) -> Result<Config> {
    // At the moment, no compatibility checks are needed.
    ::toml::from_str(toml).with_context(|| {
        format!(
            "could not parse `{}` as a configuration file",
            file.display()
        )
    })
}
