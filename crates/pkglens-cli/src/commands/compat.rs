//! `pkglens compat` command implementation.

use camino::Utf8Path;
use pkglens_config::json::load_from_file;

use super::{parse_spec, CommandContext};
use crate::tools::compat::{check_compat, CheckStatus, Verdict};
use crate::tools::Report;

/// Execute the `pkglens compat` command
pub async fn execute(package: &str, project: &Utf8Path, node: Option<&str>, ctx: &CommandContext) -> bool {
    let Some(spec) = parse_spec(package, ctx) else {
        return false;
    };
    let project = match load_from_file(project).await {
        Ok(project) => project,
        Err(err) => return ctx.output.emit(&Report::<()>::failed(&err), |_, _| {}),
    };
    let report = check_compat(&ctx.client, &spec.name, spec.version.as_deref(), &project, node).await;

    ctx.output.emit(&report, |out, compat| {
        let verdict = match compat.verdict {
            Verdict::Compatible => out.colors().green(compat.verdict.as_str()),
            Verdict::Incompatible => out.colors().red(compat.verdict.as_str()),
            Verdict::Unknown => out.colors().yellow(compat.verdict.as_str()),
        };
        out.title(&format!("{}@{}", compat.name, compat.version), &verdict);

        for check in compat.peers.iter().chain(compat.engine.as_ref()) {
            let found = check.found.as_deref().unwrap_or("not declared");
            let line = format!("{} requires {}, project has {}", check.name, check.required, found);
            match check.status {
                CheckStatus::Satisfied => out.success(&line),
                CheckStatus::Skipped => out.info(&format!("{} (optional)", line)),
                CheckStatus::Unsatisfied | CheckStatus::Missing => out.error(&line),
                CheckStatus::Unknown => out.warn(&line),
            }
        }
    })
}
