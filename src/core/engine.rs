use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting cuisine network analysis...");
        self.monitor.log_stats("Start");

        // Extract
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} recipes, {} ingredients, {} relations",
            dataset.recipes.len(),
            dataset.ingredients.len(),
            dataset.relations.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let report = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Analysed graph with {} nodes and {} edges",
            report.graph_summary.nodes,
            report.graph_summary.edges
        );
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
