use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Extract(ExtractArgs),
    Fetch(FetchArgs),
    Import(ImportArgs),
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Path to a file holding raw article markup.
    #[arg(long)]
    pub source: String,

    /// Article title (used when the infobox has no `name`).
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Article title to look up on the wiki.
    #[arg(long)]
    pub title: String,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Release feed JSON file.
    #[arg(long)]
    pub file: String,

    /// Movie store directory.
    #[arg(long)]
    pub store: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Movie store directory.
    #[arg(long)]
    pub store: String,

    /// Stored movie id.
    #[arg(long)]
    pub id: String,

    /// Skip the wiki lookup and merge stored values with defaults only.
    #[arg(long)]
    pub offline: bool,
}
