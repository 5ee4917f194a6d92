use std::env;
use std::path::PathBuf;

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

pub fn user_cache() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("Cache"))
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Caches"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".cache")))
    }
}

/// Root directory that provisioned binaries are installed under.
///
/// `HELMUP_HOME` overrides the platform cache location.
pub fn install_root() -> Option<PathBuf> {
    if let Some(root) = env::var_os("HELMUP_HOME") {
        if !root.is_empty() {
            return Some(PathBuf::from(root));
        }
    }
    user_cache().map(|p| p.join("helmup"))
}
