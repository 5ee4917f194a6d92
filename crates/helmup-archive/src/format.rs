use crate::error::ArchiveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Detect the format from a file name.
    pub fn detect(file_name: &str) -> Result<Self, ArchiveError> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Ok(ArchiveFormat::TarGz)
        } else if lower.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else {
            Err(ArchiveError::UnknownFormat(file_name.to_string()))
        }
    }

    /// Extension used when building an artifact file name.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }
}
