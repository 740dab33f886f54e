//! `pkglens downloads` command implementation.

use pkglens_registry::DownloadPeriod;

use super::CommandContext;
use crate::tools::downloads::downloads;
use crate::tools::Report;

/// Execute the `pkglens downloads` command
pub async fn execute(package: &str, period: &str, ctx: &CommandContext) -> bool {
    let period = match period.parse::<DownloadPeriod>() {
        Ok(period) => period,
        Err(err) => return ctx.output.emit(&Report::<()>::failed(&err), |_, _| {}),
    };
    let report = downloads(&ctx.client, package, period).await;

    ctx.output.emit(&report, |out, summary| {
        out.title(&summary.package, summary.period.as_str());
        out.field("downloads", Some(&summary.downloads.to_string()));
        out.field("from", Some(&summary.start));
        out.field("to", Some(&summary.end));
    })
}
