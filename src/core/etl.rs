use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: ProcessMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ProcessMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<P::Output> {
        tracing::info!("Loading dashboard data");
        self.monitor.log_stats("start");

        let sources = self.pipeline.extract().await?;
        tracing::debug!(
            crime_csv = sources.crime_csv.as_ref().map_or(0, Vec::len),
            boundaries = sources.boundaries_json.as_ref().map_or(0, Vec::len),
            "Extracted sources (bytes)"
        );
        self.monitor.log_stats("extract");

        let data = self.pipeline.transform(sources).await?;
        tracing::debug!(
            observations = data.crimes.as_ref().map_or(0, |c| c.len()),
            "Transformed crime data"
        );
        self.monitor.log_stats("transform");

        let output = self.pipeline.load(data).await?;
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(output)
    }
}
