//! Single-tool commands: publish, view and like

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use sharer_core::Error;

use crate::context::Context;
use crate::error::Result;

/// Body served for unknown tool ids.
pub const NOT_FOUND_PAGE: &str = concat!(
    "<h1>404 - Tool Not Found</h1>",
    "<p>The link may be broken or the tool may have been removed.</p>"
);

/// Run the publish command
///
/// Code comes from `--code` or `--file`; with neither, publishing fails
/// with a missing-field error.
pub fn run_publish(
    ctx: &Context,
    prompt: &str,
    code: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let code = match (code, file) {
        (Some(code), _) => code.to_string(),
        (None, Some(file)) => sharer_fs::io::read_text(file)?,
        (None, None) => String::new(),
    };

    let created = ctx.gallery.publish(prompt, &code)?;

    println!("{} {}", "Published".green().bold(), created.id.cyan());
    println!("{}", created.link);
    Ok(())
}

/// Run the view command
///
/// Writes the stored HTML verbatim to stdout.
pub fn run_view(ctx: &Context, id: &str) -> Result<()> {
    match ctx.gallery.retrieve(id) {
        Ok(code) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(code.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Err(e @ Error::NotFound { .. }) => {
            eprintln!("{}", NOT_FOUND_PAGE);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the like command
pub fn run_like(ctx: &Context, id: &str) -> Result<()> {
    let likes = ctx.gallery.like(id)?;
    println!("{} {}", "♥".red(), likes);
    Ok(())
}
