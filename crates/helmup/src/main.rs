use clap::Parser;

mod cli;
mod config;
mod helm;
mod ui;

#[tokio::main]
async fn main() {
    let app = cli::App::parse();
    if let Err(err) = cli::run(app).await {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
        std::process::exit(1);
    }
}
