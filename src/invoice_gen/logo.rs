use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use image::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("logo not found at {0}")]
    NotFound(PathBuf),
    #[error("could not read logo {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("logo {path} is not a usable image: {source}")]
    Decode { path: PathBuf, source: ImageError },
}

/// Decoded logo pixels, split into colour and alpha planes the way PDF image
/// XObjects expect them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Vec<u8>,
}

impl LogoImage {
    pub fn has_transparency(&self) -> bool {
        self.alpha.iter().any(|a| *a != u8::MAX)
    }
}

pub fn load(path: &Path) -> Result<LogoImage, LogoError> {
    let decoded = image::open(path).map_err(|err| classify(path, err))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    Ok(LogoImage {
        width,
        height,
        rgb,
        alpha,
    })
}

fn classify(path: &Path, err: ImageError) -> LogoError {
    match err {
        ImageError::IoError(io_err) if io_err.kind() == ErrorKind::NotFound => {
            LogoError::NotFound(path.to_path_buf())
        }
        ImageError::IoError(io_err) => LogoError::Io {
            path: path.to_path_buf(),
            source: io_err,
        },
        other => LogoError::Decode {
            path: path.to_path_buf(),
            source: other,
        },
    }
}
