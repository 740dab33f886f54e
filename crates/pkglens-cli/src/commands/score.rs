//! `pkglens score` command implementation.

use super::CommandContext;
use crate::tools::score::quality_score;

/// Execute the `pkglens score` command
pub async fn execute(package: &str, ctx: &CommandContext) -> bool {
    let report = quality_score(&ctx.client, package).await;

    ctx.output.emit(&report, |out, quality| {
        out.title(&quality.name, quality.version.as_deref().unwrap_or(""));
        let headline = format!("{}/100 ({})", quality.score, quality.grade.as_str());
        let colored = if quality.score >= 80 {
            out.colors().green(&headline)
        } else if quality.score >= 40 {
            out.colors().yellow(&headline)
        } else {
            out.colors().red(&headline)
        };
        out.field("score", Some(&colored));
        out.field("metadata", Some(&format!("{}/30", quality.breakdown.metadata)));
        out.field("maintenance", Some(&format!("{}/30", quality.breakdown.maintenance)));
        out.field("popularity", Some(&format!("{}/25", quality.breakdown.popularity)));
        out.field("community", Some(&format!("{}/15", quality.breakdown.community)));
        for note in &quality.notes {
            out.warn(note);
        }
    })
}
