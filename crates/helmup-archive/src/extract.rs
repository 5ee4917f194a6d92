use crate::error::ArchiveError;
use crate::format::ArchiveFormat;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Pull the entry whose path ends with `member` out of `archive` and write
/// it to `dest`, preserving the entry's file mode where the archive carries
/// one. Release tarballs nest the binary under a platform directory
/// (`linux-amd64/helm`), so matching is by trailing path components.
pub fn extract_member(
    archive: &Path,
    format: ArchiveFormat,
    member: &str,
    dest: &Path,
) -> Result<PathBuf, ArchiveError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match format {
        ArchiveFormat::TarGz => extract_tar_gz(archive, member, dest),
        ArchiveFormat::Zip => extract_zip(archive, member, dest),
    }
}

fn ensure_contained(path: &Path) -> Result<(), ArchiveError> {
    for component in path.components() {
        match component {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::UnsafePath(path.to_path_buf()));
            }
            Component::Normal(_) | Component::CurDir => {}
        }
    }
    Ok(())
}

fn extract_tar_gz(archive: &Path, member: &str, dest: &Path) -> Result<PathBuf, ArchiveError> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    for entry in tar.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        ensure_contained(&path)?;

        if entry.header().entry_type().is_file() && path.ends_with(member) {
            entry.unpack(dest)?;
            return Ok(dest.to_path_buf());
        }
    }

    Err(ArchiveError::MemberNotFound(member.to_string()))
}

fn extract_zip(archive: &Path, member: &str, dest: &Path) -> Result<PathBuf, ArchiveError> {
    let mut zip = zip::ZipArchive::new(File::open(archive)?)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(path) = entry.enclosed_name() else {
            return Err(ArchiveError::UnsafePath(PathBuf::from(entry.name())));
        };

        if entry.is_file() && path.ends_with(member) {
            let mut out = File::create(dest)?;
            io::copy(&mut entry, &mut out)?;
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(dest, std::fs::Permissions::from_mode(mode))?;
            }
            return Ok(dest.to_path_buf());
        }
    }

    Err(ArchiveError::MemberNotFound(member.to_string()))
}
