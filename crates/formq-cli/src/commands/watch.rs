use std::time::Duration;

use formq_core::connectivity::{probe_endpoint, ConnectivityMonitor};

use crate::commands::common::{
    format_resync_report, open_queue, resolve_queue_config, CliContext, CliQueue,
};
use crate::error::CliError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run_watch(ctx: &CliContext, interval_secs: u64) -> Result<(), CliError> {
    let config = resolve_queue_config(ctx)?;
    let interval = Duration::from_secs(interval_secs.max(1));

    let online = probe_endpoint(&config.endpoint, PROBE_TIMEOUT).await;
    let (queue, report) = open_queue(ctx, &config, ConnectivityMonitor::new(online)).await?;
    println!("{}", format_resync_report(&report));
    println!(
        "Watching {} every {}s (Ctrl-C to stop)",
        config.endpoint,
        interval.as_secs()
    );

    tokio::select! {
        () = queue.resync_on_reconnect() => {}
        () = probe_loop(&queue, &config.endpoint, interval) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            println!("Stopped watching");
        }
    }
    Ok(())
}

async fn probe_loop(queue: &CliQueue, endpoint: &str, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately and the initial probe already ran
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let online = probe_endpoint(endpoint, PROBE_TIMEOUT).await;
        tracing::debug!("Probed {endpoint}: online={online}");
        queue.connectivity().set_online(online);
    }
}
