//! Host OS and architecture detection, mapped to release artifact names.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::env;
use sysinfo::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X86_64,
    Arm,
    Arm64,
    Unknown,
}

static HOST: Lazy<Host> = Lazy::new(Host::load);

struct Host {
    os:   Os,
    arch: Arch,
}

impl Host {
    fn load() -> Self {
        let os = match System::name().as_deref() {
            Some("Windows") => Os::Windows,
            Some("macOS") | Some("Darwin") => Os::Macos,
            Some(name) if name.starts_with("Linux") => Os::Linux,
            _ => from_compile_target(),
        };

        let arch = match System::cpu_arch().as_str() {
            "i386" | "i686" => Arch::X86,
            "x86_64" | "amd64" => Arch::X86_64,
            "arm" | "armv7l" => Arch::Arm,
            "aarch64" | "arm64" => Arch::Arm64,
            _ => arch_from_compile_target(),
        };

        Self { os, arch }
    }
}

// sysinfo can come up empty inside minimal containers; the compile target
// still identifies the host for a natively built binary.
fn from_compile_target() -> Os {
    match env::consts::OS {
        "linux" => Os::Linux,
        "macos" => Os::Macos,
        "windows" => Os::Windows,
        _ => Os::Unknown,
    }
}

fn arch_from_compile_target() -> Arch {
    match env::consts::ARCH {
        "x86" => Arch::X86,
        "x86_64" => Arch::X86_64,
        "arm" => Arch::Arm,
        "aarch64" => Arch::Arm64,
        _ => Arch::Unknown,
    }
}

pub fn detect_os() -> Os { HOST.os }

pub fn detect_arch() -> Arch { HOST.arch }

/// Release artifact OS name, as used in helm download URLs.
pub fn artifact_os(os: Os) -> Result<&'static str> {
    match os {
        Os::Linux => Ok("linux"),
        Os::Macos => Ok("darwin"),
        Os::Windows => Ok("windows"),
        Os::Unknown => Err(Error::UnsupportedOs(env::consts::OS.to_string())),
    }
}

/// Release artifact architecture name, as used in helm download URLs.
pub fn artifact_arch(arch: Arch) -> Result<&'static str> {
    match arch {
        Arch::X86 => Ok("386"),
        Arch::X86_64 => Ok("amd64"),
        Arch::Arm => Ok("arm"),
        Arch::Arm64 => Ok("arm64"),
        Arch::Unknown => Err(Error::UnsupportedArch(env::consts::ARCH.to_string())),
    }
}

/// Artifact pair for the machine we are running on.
pub fn host_artifact() -> Result<(&'static str, &'static str)> {
    Ok((artifact_os(detect_os())?, artifact_arch(detect_arch())?))
}
