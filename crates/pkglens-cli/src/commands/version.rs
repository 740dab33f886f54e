//! `pkglens version` command implementation.

use std::collections::BTreeMap;

use super::{parse_spec, CommandContext};
use crate::output::OutputHandler;
use crate::tools::size::format_bytes;
use crate::tools::version::version_details;

/// Execute the `pkglens version` command
///
/// An explicit `version` argument wins over one given as `name@version`.
pub async fn execute(package: &str, version: Option<&str>, ctx: &CommandContext) -> bool {
    let Some(spec) = parse_spec(package, ctx) else {
        return false;
    };
    let version = version.or(spec.version.as_deref());
    let report = version_details(&ctx.client, &spec.name, version).await;

    ctx.output.emit(&report, |out, details| {
        out.title(&format!("{}@{}", details.name, details.version), "");
        out.field("description", details.description.as_deref());
        out.field("license", details.license.as_deref());
        out.field("size", details.unpacked_size.map(format_bytes).as_deref());
        out.field("files", details.file_count.map(|n| n.to_string()).as_deref());
        out.field("tarball", Some(&details.tarball));
        print_table(out, "dependencies", &details.dependencies);
        print_table(out, "peerDependencies", &details.peer_dependencies);
        print_table(out, "engines", &details.engines);
        if let Some(notice) = &details.deprecated {
            out.warn(&format!("deprecated: {}", notice));
        }
    })
}

fn print_table(out: &OutputHandler, heading: &str, entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
        return;
    }
    out.info(&format!("{} ({})", heading, entries.len()));
    for (name, range) in entries {
        println!("    {} {}", name, out.colors().dim(range));
    }
}
