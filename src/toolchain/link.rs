//! Directory symlink replacement

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Points `link` at `target`, replacing whatever `link` was before.
///
/// On Unix the new link is created next to `link` and renamed over it, so
/// `link` itself is never observed missing.
#[cfg(unix)]
pub fn replace_link(target: &Path, link: &Path) -> io::Result<()> {
    let tmp = link.with_file_name(format!(
        ".{}.tmp",
        link.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("link")
    ));

    remove_existing(&tmp)?;
    std::os::unix::fs::symlink(target, &tmp)?;

    // rename cannot replace a real directory
    if fs::symlink_metadata(link).is_ok_and(|m| m.is_dir()) {
        fs::remove_dir_all(link)?;
    }

    fs::rename(&tmp, link).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

/// Points `link` at `target` through a directory junction.
///
/// Junctions need no elevated rights, unlike directory symlinks. The old
/// link is removed first, so `link` is briefly missing.
#[cfg(windows)]
pub fn replace_link(target: &Path, link: &Path) -> io::Result<()> {
    remove_existing(link)?;

    let status = std::process::Command::new("cmd")
        .arg("/C")
        .arg("mklink")
        .arg("/J")
        .arg(link)
        .arg(target)
        .stdout(std::process::Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "mklink /J {:?} {:?} failed with {}",
            link, target, status
        )))
    }
}

/// Removes a file, symlink or directory at `path`; absence is not an error
fn remove_existing(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        // Directory symlinks on Windows need remove_dir
        fs::remove_file(path).or_else(|_| fs::remove_dir(path))
    }
}
