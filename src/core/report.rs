use crate::analysis::{IngredientCount, RegionalPopularity, SimilarRecipes};
use crate::network::{
    CentralityMeasure, CommunityAssignment, GraphKind, GraphSnapshot, GraphSummary, RankedNode,
};
use crate::utils::error::{AnalysisError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub recipes: usize,
    pub ingredients: usize,
    pub compound_ingredients: usize,
    pub relations: usize,
    pub cuisines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityRanking {
    pub measure: CentralityMeasure,
    pub nodes: Vec<RankedNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub count: usize,
    pub modularity: f64,
    pub assignments: Vec<CommunityAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub graph_kind: GraphKind,
    pub counts: DatasetCounts,
    pub uncommon_ingredients: Vec<IngredientCount>,
    pub similar_recipes: SimilarRecipes,
    pub regional: RegionalPopularity,
    pub graph_summary: GraphSummary,
    pub degree_histogram: Vec<usize>,
    pub centrality: Vec<CentralityRanking>,
    pub communities: CommunityReport,
    /// 圖形另外輸出成 graph.json
    #[serde(skip)]
    pub graph: GraphSnapshot,
}

/// 一個輸出檔：檔名與內容
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl OutputFile {
    fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }
}

fn write_csv<F>(headers: &[&str], fill: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> Result<()>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    fill(&mut writer)?;
    writer
        .into_inner()
        .map_err(|e| AnalysisError::IoError(e.into_error()))
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn graph_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.graph)?)
    }

    pub fn uncommon_ingredients_csv(&self) -> Result<Vec<u8>> {
        write_csv(&["ingredient", "count"], |w| {
            for entry in &self.uncommon_ingredients {
                w.write_record([entry.ingredient.as_str(), &entry.count.to_string()])?;
            }
            Ok(())
        })
    }

    pub fn similar_recipes_csv(&self) -> Result<Vec<u8>> {
        write_csv(&["recipe", "similar_recipe", "shared_ingredients"], |w| {
            for (recipe, similar) in &self.similar_recipes {
                for (other, shared) in similar {
                    w.write_record([recipe.as_str(), other.as_str(), &shared.to_string()])?;
                }
            }
            Ok(())
        })
    }

    pub fn regional_popularity_csv(&self) -> Result<Vec<u8>> {
        write_csv(&["cuisine", "rank", "ingredient"], |w| {
            for (cuisine, ingredients) in &self.regional.popular_by_region {
                for (rank, ingredient) in ingredients.iter().enumerate() {
                    w.write_record([cuisine.as_str(), &(rank + 1).to_string(), ingredient.as_str()])?;
                }
            }
            // 所有地區共有的食材以 "*" 表示
            for (rank, ingredient) in self.regional.common_to_all_regions.iter().enumerate() {
                w.write_record(["*", &(rank + 1).to_string(), ingredient.as_str()])?;
            }
            Ok(())
        })
    }

    pub fn centrality_csv(&self) -> Result<Vec<u8>> {
        write_csv(&["measure", "rank", "node", "score"], |w| {
            for ranking in &self.centrality {
                for (rank, node) in ranking.nodes.iter().enumerate() {
                    w.write_record([
                        ranking.measure.name(),
                        &(rank + 1).to_string(),
                        node.label.as_str(),
                        &format!("{:.6}", node.score),
                    ])?;
                }
            }
            Ok(())
        })
    }

    pub fn degree_distribution_csv(&self) -> Result<Vec<u8>> {
        write_csv(&["degree", "count"], |w| {
            for (degree, count) in self.degree_histogram.iter().enumerate() {
                w.write_record([degree.to_string(), count.to_string()])?;
            }
            Ok(())
        })
    }

    pub fn communities_csv(&self) -> Result<Vec<u8>> {
        write_csv(&["node", "community"], |w| {
            for assignment in &self.communities.assignments {
                w.write_record([assignment.label.as_str(), &assignment.community.to_string()])?;
            }
            Ok(())
        })
    }

    /// 依輸出格式產生所有檔案，graph.json 一律輸出
    pub fn render(&self, formats: &[String]) -> Result<Vec<OutputFile>> {
        let mut files = Vec::new();

        if formats.iter().any(|f| f == "json") {
            files.push(OutputFile::new("report.json", self.to_json()?));
        }

        if formats.iter().any(|f| f == "csv") {
            files.push(OutputFile::new("uncommon_ingredients.csv", self.uncommon_ingredients_csv()?));
            files.push(OutputFile::new("similar_recipes.csv", self.similar_recipes_csv()?));
            files.push(OutputFile::new("regional_popularity.csv", self.regional_popularity_csv()?));
            files.push(OutputFile::new("centrality.csv", self.centrality_csv()?));
            files.push(OutputFile::new("degree_distribution.csv", self.degree_distribution_csv()?));
            files.push(OutputFile::new("communities.csv", self.communities_csv()?));
        }

        files.push(OutputFile::new("graph.json", self.graph_json()?));
        Ok(files)
    }
}
