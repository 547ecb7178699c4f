//! Share link commands: import and encode

use std::path::Path;

use colored::Colorize;
use sharer_core::encode_reference;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the import command
pub fn run_import(ctx: &Context, reference: &str) -> Result<()> {
    let created = ctx.gallery.import_from_share(reference)?;

    println!(
        "{} Your tool is now permanently hosted at:",
        "Success!".green().bold()
    );
    println!("{}", created.link);
    Ok(())
}

/// Run the encode command
pub fn run_encode(file: &Path, base: &str) -> Result<()> {
    let html = sharer_fs::io::read_text(file)?;
    if html.trim().is_empty() {
        return Err(CliError::user(format!("{} is empty", file.display())));
    }

    println!("{}", encode_reference(base, &html));
    Ok(())
}
