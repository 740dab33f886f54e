//! `pkglens info` command implementation.

use super::CommandContext;
use crate::tools::info::package_info;

/// Execute the `pkglens info` command
pub async fn execute(package: &str, ctx: &CommandContext) -> bool {
    let report = package_info(&ctx.client, package).await;

    ctx.output.emit(&report, |out, info| {
        out.title(&info.name, info.latest_version.as_deref().unwrap_or("(no latest tag)"));
        out.field("description", info.description.as_deref());
        out.field("license", info.license.as_deref());
        out.field("homepage", info.homepage.as_deref());
        out.field("repository", info.repository.as_deref());
        if !info.keywords.is_empty() {
            out.field("keywords", Some(&info.keywords.join(", ")));
        }
        out.field("maintainers", Some(&info.maintainers.len().to_string()));
        out.field("versions", Some(&info.version_count.to_string()));
        out.field("created", info.created.as_deref());
        out.field("modified", info.modified.as_deref());
        if let Some(notice) = &info.deprecated {
            out.warn(&format!("deprecated: {}", notice));
        }
    })
}
