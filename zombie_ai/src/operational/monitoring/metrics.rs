// zombie_ai/src/operational/monitoring/metrics.rs
use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

pub struct MetricsSystem {
    start_time: Instant,
}

impl MetricsSystem {
    /// Registers metric descriptions. With `exporter_addr` set, also serves
    /// them over HTTP for Prometheus.
    pub fn new(exporter_addr: Option<SocketAddr>) -> Result<Self> {
        if let Some(addr) = exporter_addr {
            PrometheusBuilder::new()
                .with_http_listener(addr)
                .install()
                .context("Failed to install Prometheus exporter")?;
            info!("Prometheus exporter listening on {}", addr);
        }

        describe_counter!("zombie_ai_updates_total", "Successful per-agent AI updates");
        describe_counter!("zombie_ai_update_failures_total", "Per-agent AI updates that returned an error");
        describe_counter!("zombie_ai_state_transitions_total", "Behavior state transitions, labelled from/to");
        describe_gauge!("zombie_ai_lod_agents", "Agents per LOD level after the last tick");
        describe_gauge!("zombie_ai_uptime_seconds", "Seconds since the simulation started");
        describe_histogram!("zombie_ai_tick_seconds", "Wall time spent updating the horde per tick");

        Ok(MetricsSystem { start_time: Instant::now() })
    }

    pub fn record_uptime(&self) {
        gauge!("zombie_ai_uptime_seconds").set(self.start_time.elapsed().as_secs_f64());
    }
}

// Logging setup
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "zombie_ai=info,warn".into()))
        .with(fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
