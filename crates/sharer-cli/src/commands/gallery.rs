//! Gallery listing command

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use sharer_core::{SortMode, ToolRecord, summary};

use crate::context::Context;
use crate::error::Result;

/// Gallery row as emitted by `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GalleryEntry<'a> {
    id: &'a str,
    prompt: Option<&'a str>,
    likes: u64,
    created_at: Option<DateTime<Utc>>,
    link: String,
}

/// Run the gallery command
pub fn run_gallery(
    ctx: &Context,
    search: &str,
    sort: Option<SortMode>,
    json: bool,
) -> Result<()> {
    let sort = sort.unwrap_or(ctx.config.gallery.default_sort);
    let tools = ctx.gallery.gallery(search, sort)?;
    tracing::debug!(count = tools.len(), %sort, "gallery listed");

    if json {
        let entries: Vec<GalleryEntry<'_>> = tools.iter().map(|t| entry(ctx, t)).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if tools.is_empty() {
        println!("No projects found matching your criteria.");
        return Ok(());
    }

    for tool in &tools {
        let prompt = tool.prompt().unwrap_or_default();
        println!(
            "{}  {} {}",
            summary(prompt, ctx.config.gallery.summary_len).bold(),
            "♥".red(),
            tool.likes()
        );
        println!("    {}", ctx.gallery.view_link(tool.id()).dimmed());
    }
    Ok(())
}

fn entry<'a>(ctx: &Context, tool: &'a ToolRecord) -> GalleryEntry<'a> {
    GalleryEntry {
        id: tool.id(),
        prompt: tool.prompt(),
        likes: tool.likes(),
        created_at: tool.created_at(),
        link: ctx.gallery.view_link(tool.id()),
    }
}
