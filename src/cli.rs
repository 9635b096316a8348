use std::path::PathBuf;

use clap::Parser;

use crate::config::ViewerConfig;
use crate::error::Result;

#[derive(Parser, Debug, Clone)]
#[command(name = "cube-viewer")]
#[command(about = "Real-time 3D viewer with live parameter sliders", long_about = None)]
pub struct Cli {
    /// Hide the parameter panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Rotation rate in radians per tick
    #[arg(long)]
    pub rate: Option<f32>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,
}

impl Cli {
    /// Load the config file, if any, and apply flag overrides on top
    pub fn resolve(&self) -> Result<ViewerConfig> {
        let base = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, mut config: ViewerConfig) -> ViewerConfig {
        if self.no_ui {
            config.show_panel = false;
        }
        if let Some(rate) = self.rate {
            config.rotation_rate = rate;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config
    }
}
