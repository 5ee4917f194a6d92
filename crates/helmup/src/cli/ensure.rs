use crate::config::Settings;
use crate::helm;
use crate::ui::ConsoleReporter;
use std::sync::Arc;

pub async fn ensure(settings: &Settings) -> anyhow::Result<()> {
    let cancel = helm::cancel_on_ctrl_c();
    let path = helm::helm_binary_path(cancel, Arc::new(ConsoleReporter), settings).await?;
    println!("{}", path.display());
    Ok(())
}
