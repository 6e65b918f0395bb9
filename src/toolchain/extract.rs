//! Release archive extraction

#[cfg(test)]
use mockall::automock;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;
use zip::ZipArchive;

use crate::toolchain::error::ExtractError;

/// Trait for unpacking a downloaded archive
#[cfg_attr(test, automock)]
pub trait ArchiveExtractor {
    /// Unpacks `archive` into `dest`, creating `dest` if needed
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError>;
}

/// Extractor for the release archive formats: `.tar.gz` and `.zip`
///
/// Entries whose paths would escape `dest` are skipped by `tar` and `zip`.
#[derive(Debug, Default)]
pub struct ReleaseExtractor;

impl ArchiveExtractor for ReleaseExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
        let name = archive
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            fs::create_dir_all(dest)?;
            unpack_tar_gz(archive, dest)
        } else if name.ends_with(".zip") {
            fs::create_dir_all(dest)?;
            unpack_zip(archive, dest)
        } else {
            Err(ExtractError::UnsupportedFormat(archive.to_path_buf()))
        }
    }
}

fn unpack_tar_gz(archive: &Path, dest: &Path) -> Result<(), ExtractError> {
    debug!("Unpacking tar.gz {:?} to {:?}", archive, dest);
    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(BufReader::new(file)));
    tar.set_preserve_permissions(true);
    tar.unpack(dest)?;
    Ok(())
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<(), ExtractError> {
    debug!("Unpacking zip {:?} to {:?}", archive, dest);
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    zip.extract(dest)?;
    Ok(())
}
