//! `pkglens size` command implementation.

use super::{parse_spec, CommandContext};
use crate::tools::size::package_size;

/// Execute the `pkglens size` command
pub async fn execute(package: &str, ctx: &CommandContext) -> bool {
    let Some(spec) = parse_spec(package, ctx) else {
        return false;
    };
    let report = package_size(&ctx.client, &spec.name, spec.version.as_deref()).await;

    ctx.output.emit(&report, |out, size| {
        out.title(&format!("{}@{}", size.name, size.version), size.category.as_str());
        out.field("unpacked", size.human_size.as_deref());
        out.field("files", size.file_count.map(|n| n.to_string()).as_deref());
        out.field("dependencies", Some(&size.dependency_count.to_string()));
    })
}
