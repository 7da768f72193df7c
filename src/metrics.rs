use std::time::Duration;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const ENV_PUSHGATEWAY_URL: &str = "METRICS_PUSHGATEWAY_URL";
const JOB_NAME: &str = "hot_bot";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder for this process and describe the run series.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("digest_runs_total", "Digest pipeline runs started.");
        describe_counter!("digest_published_total", "Digests sent to the channel.");
        describe_counter!(
            "digest_skipped_total",
            "Runs that ended without anything to publish."
        );
        describe_counter!(
            "digest_summarize_fallback_total",
            "Runs that published raw sections because summarization failed."
        );
        describe_histogram!("digest_run_duration_ms", "Wall time of one run in milliseconds.");

        Ok(Self { handle })
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// PUT the current exposition to a Pushgateway, replacing this job's group.
    pub async fn push(&self, gateway_url: &str) -> Result<()> {
        let url = pushgateway_job_url(gateway_url);
        reqwest::Client::new()
            .put(&url)
            .timeout(Duration::from_secs(5))
            .header("content-type", "text/plain; version=0.0.4")
            .body(self.render())
            .send()
            .await
            .context("pushgateway put")?
            .error_for_status()
            .context("pushgateway non-2xx")?;
        tracing::debug!(%url, "metrics pushed");
        Ok(())
    }
}

pub fn pushgateway_job_url(gateway_url: &str) -> String {
    format!("{}/metrics/job/{JOB_NAME}", gateway_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_url_tolerates_trailing_slash() {
        assert_eq!(
            pushgateway_job_url("http://pg:9091/"),
            "http://pg:9091/metrics/job/hot_bot"
        );
    }
}
