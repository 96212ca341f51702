pub mod layout;
pub mod logo;
pub mod pdf;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::ledger::Ledger;
use crate::models::{CustomerRecord, LineItem};

pub use logo::{LogoError, LogoImage};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not build the PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("could not compress the logo: {0}")]
    Image(#[source] io::Error),
    #[error("could not serialize the PDF: {0}")]
    Serialize(#[source] io::Error),
    #[error("could not write invoice to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoStatus {
    Embedded,
    Missing,
    /// The file exists but could not be used; carries the reason
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintStatus {
    Skipped,
    Requested,
    Failed(String),
}

/// What a successful render produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub logo: LogoStatus,
    pub print: PrintStatus,
}

/// Render an invoice document to bytes without touching the filesystem
pub fn render(
    customer: &CustomerRecord,
    items: &[LineItem],
    total: f64,
    logo: Option<&LogoImage>,
    created: DateTime<Local>,
) -> Result<Vec<u8>, RenderError> {
    let runs = layout::compose(customer, items, total);
    pdf::encode(&runs, logo, created)
}

/// Service for writing the invoice PDF to its configured location
pub struct InvoiceGenerator {
    output_path: PathBuf,
    logo_path: PathBuf,
    print_after_render: bool,
}

impl InvoiceGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            output_path: config.output_path.clone(),
            logo_path: config.logo_path.clone(),
            print_after_render: config.print_after_render,
        }
    }

    /// Render the ledger's current contents and overwrite the output file
    pub fn generate_invoice(
        &self,
        customer: &CustomerRecord,
        ledger: &Ledger,
    ) -> Result<RenderOutcome, RenderError> {
        let (logo, logo_status) = self.load_logo();

        let bytes = render(
            customer,
            ledger.items(),
            ledger.total(),
            logo.as_ref(),
            Local::now(),
        )?;

        fs::write(&self.output_path, &bytes).map_err(|source| RenderError::Write {
            path: self.output_path.clone(),
            source,
        })?;

        info!(
            path = %self.output_path.display(),
            items = ledger.len(),
            total = ledger.total(),
            bytes = bytes.len(),
            "invoice written"
        );

        let print = if self.print_after_render {
            request_print(&self.output_path)
        } else {
            PrintStatus::Skipped
        };

        Ok(RenderOutcome {
            path: self.output_path.clone(),
            logo: logo_status,
            print,
        })
    }

    fn load_logo(&self) -> (Option<LogoImage>, LogoStatus) {
        match logo::load(&self.logo_path) {
            Ok(image) => (Some(image), LogoStatus::Embedded),
            Err(err @ LogoError::NotFound(_)) => {
                warn!("{err}, rendering without it");
                (None, LogoStatus::Missing)
            }
            Err(err) => {
                error!("{err}, rendering without it");
                (None, LogoStatus::Failed(err.to_string()))
            }
        }
    }
}

/// Hand the file to the Windows shell's print verb without waiting for it
#[cfg(windows)]
fn request_print(path: &Path) -> PrintStatus {
    use std::process::Command;

    let quoted = path.display().to_string().replace('\'', "''");
    let spawned = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command"])
        .arg(format!("Start-Process -FilePath '{quoted}' -Verb Print"))
        .spawn();

    match spawned {
        Ok(_) => {
            info!(path = %path.display(), "print requested");
            PrintStatus::Requested
        }
        Err(err) => {
            warn!(path = %path.display(), "could not request print: {err}");
            PrintStatus::Failed(err.to_string())
        }
    }
}

#[cfg(not(windows))]
fn request_print(_path: &Path) -> PrintStatus {
    PrintStatus::Skipped
}
