use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    filmwiki::logging::init().context("init logging")?;

    let cli = filmwiki::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        filmwiki::cli::Command::Extract(args) => {
            filmwiki::article::run(args).context("extract")?;
        }
        filmwiki::cli::Command::Fetch(args) => {
            filmwiki::enrich::fetch(args).await.context("fetch")?;
        }
        filmwiki::cli::Command::Import(args) => {
            filmwiki::import::run(args).await.context("import")?;
        }
        filmwiki::cli::Command::Show(args) => {
            filmwiki::enrich::show(args).await.context("show")?;
        }
    }

    Ok(())
}
