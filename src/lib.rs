#![forbid(unsafe_code)]

pub mod app;
pub mod article;
pub mod cast;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod field;
pub mod formats;
pub mod import;
pub mod logging;
pub mod markup;
pub mod merge;
pub mod money;
pub mod normalize;
pub mod ott;
pub mod source;

/// Writes `value` to stdout as pretty JSON followed by a newline.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    use std::io::Write as _;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
