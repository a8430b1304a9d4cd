use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const COMMANDS: [&str; 9] = [
    "start",
    "help",
    "whatifdate",
    "addpos",
    "portfolio",
    "remove",
    "clear",
    "ath",
    "gm",
];

/// Install the Prometheus recorder and pre-register the bot's counters.
/// The returned handle renders the text/plain scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    for name in COMMANDS {
        counter!("commands_total", "command" => name).absolute(0);
        counter!("command_errors_total", "command" => name).absolute(0);
    }

    Ok(handle)
}

/// Handle to a recorder that is not installed globally. Used by tests.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
