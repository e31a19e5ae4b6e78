use formq_core::connectivity::ConnectivityMonitor;

use crate::commands::common::{format_resync_report, open_queue, resolve_queue_config, CliContext};
use crate::error::CliError;

pub async fn run_resync(ctx: &CliContext, as_json: bool) -> Result<(), CliError> {
    let config = resolve_queue_config(ctx)?;
    // Attaching the store runs the pass
    let (_queue, report) = open_queue(ctx, &config, ConnectivityMonitor::new(true)).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_resync_report(&report));
    }
    Ok(())
}
