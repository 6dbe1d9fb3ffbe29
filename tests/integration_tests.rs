use anyhow::Result;
use cuisine_net::config::settings::{AnalysisSettings, DatasetFiles, DatasetSource};
use cuisine_net::core::report::AnalysisReport;
use cuisine_net::loader::FileType;
use cuisine_net::network::{CentralityMeasure, GraphKind, NetworkAnalysis};
use cuisine_net::utils::error::ErrorCategory;
use cuisine_net::{
    AnalysisEngine, AnalysisPipeline, CliConfig, LocalStorage, SourceStorage, TomlConfig,
};
use httpmock::prelude::*;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const RECIPES_JSON: &str = r#"[
    {"Recipe ID": 1, "Title": "Margherita", "Source": "Food Network", "Cuisine": "Italian"},
    {"Recipe ID": 2, "Title": "Bruschetta", "Source": "Epicurious", "Cuisine": "Italian"},
    {"Recipe ID": 3, "Title": "Guacamole", "Source": "AllRecipes", "Cuisine": "Mexican"}
]"#;

const INGREDIENTS_JSON: &str = r#"[
    {"Entity ID": 10, "Category": "Vegetable", "Ingredient Synonyms": "", "Aliased Ingredient Name": "tomato"},
    {"Entity ID": 11, "Category": "Herb", "Ingredient Synonyms": "sweet basil", "Aliased Ingredient Name": "basil"},
    {"Entity ID": 12, "Category": "Fruit", "Ingredient Synonyms": "", "Aliased Ingredient Name": "avocado"},
    {"Entity ID": 13, "Category": "Fruit", "Ingredient Synonyms": "", "Aliased Ingredient Name": "lime"}
]"#;

const RELATIONS_JSON: &str = r#"[
    {"Recipe ID": 1, "Entity ID": 10, "Original Ingredient Name": "2 ripe tomatoes"},
    {"Recipe ID": 1, "Entity ID": 11},
    {"Recipe ID": 2, "Entity ID": 10},
    {"Recipe ID": 2, "Entity ID": 11},
    {"Recipe ID": 3, "Entity ID": 12},
    {"Recipe ID": 3, "Entity ID": 10},
    {"Recipe ID": 3, "Entity ID": 13}
]"#;

fn write_json_dataset(dir: &Path) -> Result<()> {
    std::fs::write(dir.join("01_Recipe_Details.json"), RECIPES_JSON)?;
    std::fs::write(dir.join("02_Ingredients.json"), INGREDIENTS_JSON)?;
    std::fs::write(dir.join("04_Recipe-Ingredients_Aliases.json"), RELATIONS_JSON)?;
    Ok(())
}

fn write_csv_dataset(dir: &Path) -> Result<()> {
    std::fs::write(
        dir.join("01_Recipe_Details.csv"),
        "Recipe ID,Title,Source,Cuisine\n\
         1,Margherita,Food Network,Italian\n\
         2,Bruschetta,Epicurious,Italian\n\
         3,Guacamole,AllRecipes,Mexican\n",
    )?;
    std::fs::write(
        dir.join("02_Ingredients.csv"),
        "Entity ID,Category,Ingredient Synonyms,Aliased Ingredient Name\n\
         10,Vegetable,,tomato\n\
         11,Herb,sweet basil,basil\n\
         12,Fruit,,avocado\n\
         13,Fruit,,lime\n",
    )?;
    std::fs::write(
        dir.join("03_Compound_Ingredients.csv"),
        "Compound Ingredient Name,Compound Ingredient Synonyms,entity_id,Contituent Ingredients,Category\n\
         salsa,pico de gallo,900,\"tomato, lime\",Dish\n",
    )?;
    std::fs::write(
        dir.join("04_Recipe-Ingredients_Aliases.csv"),
        "Recipe ID,Entity ID\n1,10\n1,11\n2,10\n2,11\n3,12\n3,10\n3,13\n",
    )?;
    Ok(())
}

fn cli_config(data_dir: &Path, output_dir: &Path, file_type: FileType) -> CliConfig {
    CliConfig {
        source: DatasetSource::Local {
            path: data_dir.to_string_lossy().to_string(),
        },
        files: DatasetFiles::with_extension(file_type.extension()),
        file_type,
        output_path: output_dir.to_string_lossy().to_string(),
        output_formats: vec!["json".to_string(), "csv".to_string()],
        archive_name: None,
        settings: AnalysisSettings::default(),
        verbose: false,
        monitor: false,
        json_logs: false,
    }
}

async fn run(config: CliConfig) -> cuisine_net::Result<String> {
    let source = SourceStorage::from_source(&config.source)?;
    let output = LocalStorage::new(config.output_path.clone());
    let pipeline = AnalysisPipeline::new(source, output, config);
    AnalysisEngine::new_with_monitoring(pipeline, false).run().await
}

#[tokio::test]
async fn test_end_to_end_local_json_dataset() -> Result<()> {
    let data_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_json_dataset(data_dir.path())?;

    let config = cli_config(data_dir.path(), output_dir.path(), FileType::Json);
    let location = run(config).await?;
    assert_eq!(location, output_dir.path().to_string_lossy());

    // 報告內容
    let report_json = std::fs::read(output_dir.path().join("report.json"))?;
    let report: AnalysisReport = serde_json::from_slice(&report_json)?;
    assert_eq!(report.counts.recipes, 3);
    assert_eq!(report.counts.compound_ingredients, 0);
    assert_eq!(report.graph_kind, GraphKind::Cooccurrence);
    assert_eq!(report.regional.common_to_all_regions, vec!["tomato"]);
    assert_eq!(report.similar_recipes["Bruschetta"]["Margherita"], 2);

    let pagerank = report
        .centrality
        .iter()
        .find(|r| r.measure == CentralityMeasure::PageRank)
        .expect("pagerank ranking");
    assert_eq!(pagerank.nodes[0].label, "tomato");

    // 每種 CSV 都有輸出
    for name in [
        "uncommon_ingredients.csv",
        "similar_recipes.csv",
        "regional_popularity.csv",
        "centrality.csv",
        "degree_distribution.csv",
        "communities.csv",
    ] {
        assert!(output_dir.path().join(name).exists(), "missing {}", name);
    }

    // graph.json 可重新載入
    let network = NetworkAnalysis::load_graph(output_dir.path().join("graph.json"))?;
    assert_eq!(network.summary().nodes, 4);
    assert_eq!(network.summary().edges, 4);
    assert_eq!(network.summary().connected_components, 1);

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_csv_dataset_with_archive() -> Result<()> {
    let data_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_csv_dataset(data_dir.path())?;

    let mut config = cli_config(data_dir.path(), output_dir.path(), FileType::Csv);
    config.archive_name = Some("analysis_output.zip".to_string());
    config.settings.graph_kind = GraphKind::CuisineIngredient;

    let location = run(config).await?;
    assert!(location.ends_with("analysis_output.zip"));

    let zip_path = output_dir.path().join("analysis_output.zip");
    assert!(zip_path.exists());
    assert!(!output_dir.path().join("report.json").exists());

    let zip_data = std::fs::read(&zip_path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 8);

    let mut report_json = String::new();
    archive.by_name("report.json")?.read_to_string(&mut report_json)?;
    let report: AnalysisReport = serde_json::from_str(&report_json)?;

    assert_eq!(report.counts.compound_ingredients, 1);
    assert_eq!(report.counts.cuisines, 2);
    assert_eq!(report.graph_kind, GraphKind::CuisineIngredient);
    // 2 個菜系 + 4 種食材
    assert_eq!(report.graph_summary.nodes, 6);
    assert_eq!(report.graph_summary.edges, 5);

    let mut communities = String::new();
    archive.by_name("communities.csv")?.read_to_string(&mut communities)?;
    assert!(communities.contains("Italian"));
    assert!(communities.contains("Mexican"));

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_http_source_from_toml() -> Result<()> {
    let output_dir = TempDir::new()?;

    let server = MockServer::start();
    let recipes_mock = server.mock(|when, then| {
        when.method(GET).path("/culinarydb/01_Recipe_Details.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(RECIPES_JSON);
    });
    let ingredients_mock = server.mock(|when, then| {
        when.method(GET).path("/culinarydb/02_Ingredients.json");
        then.status(200).body(INGREDIENTS_JSON);
    });
    let relations_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/culinarydb/04_Recipe-Ingredients_Aliases.json");
        then.status(200).body(RELATIONS_JSON);
    });
    let compounds_mock = server.mock(|when, then| {
        when.method(GET).path("/culinarydb/03_Compound_Ingredients.json");
        then.status(404);
    });

    let toml_content = format!(
        r#"
[analysis]
name = "http-test"
version = "1.0"

[source]
type = "http"
base_url = "{}"
timeout_seconds = 5

[settings]
graph_kind = "recipe_similarity"
similarity_threshold = 0.5

[load]
output_path = "{}"
output_formats = ["json"]
"#,
        server.url("/culinarydb"),
        output_dir.path().to_string_lossy().replace('\\', "/"),
    );

    let config = TomlConfig::from_toml_str(&toml_content)?;
    cuisine_net::utils::validation::Validate::validate(&config)?;

    let source = SourceStorage::from_source(&config.source)?;
    let output = LocalStorage::new(config.load.output_path.clone());
    let pipeline = AnalysisPipeline::new(source, output, config);
    AnalysisEngine::new(pipeline).run().await?;

    recipes_mock.assert();
    ingredients_mock.assert();
    relations_mock.assert();
    compounds_mock.assert();

    let report: AnalysisReport =
        serde_json::from_slice(&std::fs::read(output_dir.path().join("report.json"))?)?;
    assert_eq!(report.graph_kind, GraphKind::RecipeSimilarity);
    // Margherita 與 Bruschetta 相同 (1.0)，與 Guacamole 僅 0.25
    assert_eq!(report.graph_summary.nodes, 3);
    assert_eq!(report.graph_summary.edges, 1);
    assert!(!output_dir.path().join("centrality.csv").exists());
    assert!(output_dir.path().join("graph.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_dataset_reports_storage_error() -> Result<()> {
    let data_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;

    let config = cli_config(data_dir.path(), output_dir.path(), FileType::Json);
    let err = run(config).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.category(), ErrorCategory::Storage);
    assert!(!output_dir.path().join("report.json").exists());

    Ok(())
}
