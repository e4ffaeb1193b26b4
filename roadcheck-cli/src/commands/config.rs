//! `roadcheck config` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use roadcheck_core::config::RoadcheckConfig;

use crate::cli::ConfigAction;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Result of `config validate`.
#[derive(Debug, Serialize)]
pub struct ConfigCheck {
    pub path: String,
    pub valid: bool,
}

impl Render for ConfigCheck {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{} {}", "OK".green(), self.path)
    }
}

/// Effective configuration for `config show`.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub path: String,
    #[serde(flatten)]
    pub config: RoadcheckConfig,
}

impl Render for ConfigView {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "# effective configuration ({})", self.path)?;
        let rendered = toml::to_string_pretty(&self.config)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        write!(w, "{rendered}")
    }
}

/// Execute a `config` action.
pub fn execute(
    action: &ConfigAction,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Validate => {
            // Strict: the file must exist and parse cleanly.
            RoadcheckConfig::load(config_path)?;
            writer.render(&ConfigCheck {
                path: config_path.display().to_string(),
                valid: true,
            })
        }
        ConfigAction::Show => {
            let config = RoadcheckConfig::load_or_default(config_path)?;
            writer.render(&ConfigView {
                path: config_path.display().to_string(),
                config,
            })
        }
    }
}
