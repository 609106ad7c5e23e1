//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to temporary files,
//! invoking the compiler, and managing the output PDF.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;
use tempfile::TempDir;

use super::GeneratorError;

const SOURCE_FILE: &str = "invoices.typ";
const OUTPUT_FILE: &str = "invoices.pdf";

/// A file made available next to the Typst source, e.g. the logo.
#[derive(Debug, Clone, Copy)]
pub struct Asset<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
}

/// Stateless engine for rendering Typst source to PDF.
///
/// Each call compiles in its own temporary directory, so one engine can serve
/// concurrent renders.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: PathBuf,
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Render a Typst string to PDF bytes.
    ///
    /// # Arguments
    /// * `typst_source` - The complete Typst document.
    /// * `assets` - Files the source refers to by bare name.
    pub fn render(&self, typst_source: &str, assets: &[Asset<'_>]) -> Result<Vec<u8>, GeneratorError> {
        let temp_dir = tempdir().map_err(GeneratorError::TempDir)?;

        fs::write(temp_dir.path().join(SOURCE_FILE), typst_source)
            .map_err(GeneratorError::WriteTypst)?;

        for asset in assets {
            fs::write(temp_dir.path().join(asset.name), asset.bytes).map_err(|source| {
                GeneratorError::WriteAsset {
                    name: asset.name.to_string(),
                    source,
                }
            })?;
        }

        let pdf = self.compile(&temp_dir)?;
        log::debug!("Typst produced {} bytes", pdf.len());
        Ok(pdf)
    }

    fn compile(&self, temp_dir: &TempDir) -> Result<Vec<u8>, GeneratorError> {
        let typ_path = temp_dir.path().join(SOURCE_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        let output = Command::new(&self.binary)
            .arg("compile")
            .arg(&typ_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .output()
            .map_err(GeneratorError::TypstIo)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("Typst compile failed with status {}: {}", code, stderr);
            return Err(GeneratorError::TypstExit { code, stderr });
        }

        fs::read(&output_path).map_err(GeneratorError::ReadPdf)
    }
}
