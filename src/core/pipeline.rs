use crate::analysis::{detect_common_and_popular_ingredients, detect_uncommon_ingredients, find_similar_recipes};
use crate::config::settings::AnalysisSettings;
use crate::core::report::{
    AnalysisReport, CentralityRanking, CommunityReport, DatasetCounts, OutputFile,
};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::Dataset;
use crate::loader::DatasetLoader;
use crate::network::{BuildOptions, NetworkAnalysis};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 讀取資料集、執行所有分析並輸出報告
pub struct AnalysisPipeline<S: Storage, W: Storage, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) output: W,
    pub(crate) config: C,
}

impl<S: Storage, W: Storage, C: ConfigProvider> AnalysisPipeline<S, W, C> {
    pub fn new(source: S, output: W, config: C) -> Self {
        Self {
            source,
            output,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

/// 對已載入的資料集執行全部分析
pub fn analyze(dataset: &Dataset, settings: &AnalysisSettings) -> AnalysisReport {
    let profiles = dataset.profiles();
    let cuisines: HashSet<&str> = profiles.iter().map(|p| p.cuisine.as_str()).collect();

    let counts = DatasetCounts {
        recipes: dataset.recipes.len(),
        ingredients: dataset.ingredients.len(),
        compound_ingredients: dataset.compound_ingredients.len(),
        relations: dataset.relations.len(),
        cuisines: cuisines.len(),
    };

    let uncommon_ingredients = detect_uncommon_ingredients(&profiles, settings.uncommon_threshold);
    tracing::debug!(
        "Found {} ingredients used fewer than {} times",
        uncommon_ingredients.len(),
        settings.uncommon_threshold
    );

    let similar_recipes = find_similar_recipes(&profiles, settings.similarity_threshold);
    tracing::debug!("Found {} recipes with similar counterparts", similar_recipes.len());

    let regional = detect_common_and_popular_ingredients(&profiles, settings.top_n);

    let options = BuildOptions {
        min_edge_weight: settings.min_edge_weight,
        similarity_threshold: settings.similarity_threshold,
    };
    let network = NetworkAnalysis::from_profiles(settings.graph_kind, &profiles, &options);
    let graph_summary = network.summary();
    tracing::info!(
        "🕸️ {:?} graph: {} nodes, {} edges, {} components",
        settings.graph_kind,
        graph_summary.nodes,
        graph_summary.edges,
        graph_summary.connected_components
    );

    let centrality = settings
        .centrality_measures
        .iter()
        .map(|measure| CentralityRanking {
            measure: *measure,
            nodes: network.top_nodes_by_centrality(*measure, settings.top_n),
        })
        .collect();

    let partition = network.communities();
    let modularity = network.modularity(&partition);
    let communities = CommunityReport {
        count: partition.iter().copied().max().map(|c| c + 1).unwrap_or(0),
        modularity,
        assignments: network.community_assignments(&partition),
    };
    tracing::info!(
        "🧩 Detected {} communities (modularity {:.4})",
        communities.count,
        modularity
    );

    AnalysisReport {
        generated_at: chrono::Utc::now(),
        graph_kind: settings.graph_kind,
        counts,
        uncommon_ingredients,
        similar_recipes,
        regional,
        graph_summary,
        degree_histogram: network.degree_distribution().histogram,
        centrality,
        communities,
        graph: network.snapshot(),
    }
}

fn build_archive(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for file in files {
        zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
        zip.write_all(&file.data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, W: Storage, C: ConfigProvider> Pipeline for AnalysisPipeline<S, W, C> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::info!(
            "🚀 Loading {} dataset from {}",
            self.config.file_type(),
            self.config.source().describe()
        );
        DatasetLoader::new(
            &self.source,
            self.config.dataset_files(),
            self.config.file_type(),
        )
        .load()
        .await
    }

    async fn transform(&self, dataset: Dataset) -> Result<AnalysisReport> {
        tracing::info!("🔧 Analysing {} recipes", dataset.recipes.len());
        Ok(analyze(&dataset, self.config.settings()))
    }

    async fn load(&self, report: AnalysisReport) -> Result<String> {
        let files = report.render(self.config.output_formats())?;
        let output_path = self.config.output_path();

        match self.config.archive_name() {
            Some(archive) => {
                tracing::debug!("Creating ZIP file with {} files", files.len());
                let zip_data = build_archive(&files)?;
                tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.output.write_file(archive, &zip_data).await?;
                Ok(format!("{}/{}", output_path, archive))
            }
            None => {
                for file in &files {
                    tracing::debug!("Writing {} ({} bytes)", file.name, file.data.len());
                    self.output.write_file(&file.name, &file.data).await?;
                }
                Ok(output_path.to_string())
            }
        }
    }
}
