//! `pkglens search` command implementation.

use pkglens_registry::SearchOptions;

use super::CommandContext;
use crate::tools::search::search;

/// Execute the `pkglens search` command
pub async fn execute(query: &str, limit: u32, offset: u32, ctx: &CommandContext) -> bool {
    let report = search(&ctx.client, query, SearchOptions { limit, offset }).await;

    ctx.output.emit(&report, |out, summary| {
        if summary.results.is_empty() {
            out.info(&format!("No packages found for '{}'", summary.query));
            return;
        }

        out.info(&format!(
            "{} packages match '{}', showing {}-{}",
            summary.total,
            summary.query,
            summary.offset + 1,
            summary.offset as usize + summary.results.len()
        ));
        for hit in &summary.results {
            let score = hit.score.map(|s| format!("{:.2}", s)).unwrap_or_default();
            println!(
                "{} {} {}",
                out.colors().bold(&hit.name),
                hit.version.as_deref().unwrap_or(""),
                out.colors().dim(&score)
            );
            if let Some(description) = &hit.description {
                println!("    {}", description);
            }
        }
    })
}
