use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `HVAC_INVOICE_OUTPUT_PATH`
pub const ENV_PREFIX: &str = "HVAC_INVOICE_";

/// Configuration for the application
///
/// Every field has a default, so an empty environment gives the stock
/// behaviour: `invoice.pdf` in the working directory with `images.png` as logo.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the invoice PDF is written. Overwritten on every render.
    pub output_path: PathBuf,
    /// Optional logo drawn next to the title
    pub logo_path: PathBuf,
    /// Ask the OS to print the PDF after writing it (Windows only)
    pub print_after_render: bool,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("invoice.pdf"),
            logo_path: PathBuf::from("images.png"),
            print_after_render: true,
            log_file: PathBuf::from("hvac-invoice.log"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize `HVAC_INVOICE_*` variables into Config, defaulting the rest
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;

        Ok(config)
    }

    /// Same as `load` but reads from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
