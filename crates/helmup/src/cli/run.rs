use crate::config::Settings;
use crate::helm;
use crate::ui::ConsoleReporter;
use anyhow::Context;
use std::ffi::OsString;
use std::process::Command;
use std::sync::Arc;

/// Resolve helm, then hand the terminal over to it.
pub async fn run_tool(settings: &Settings, args: Vec<OsString>) -> anyhow::Result<()> {
    let cancel = helm::cancel_on_ctrl_c();
    let binary = helm::helm_binary_path(cancel, Arc::new(ConsoleReporter), settings).await?;

    let status = Command::new(&binary)
        .args(&args)
        .status()
        .with_context(|| format!("failed to launch {}", binary.display()))?;

    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}
