use super::settings::{AnalysisSettings, DatasetFiles, DatasetSource};
use super::{DEFAULT_ARCHIVE_NAME, OUTPUT_FORMATS};
use crate::core::ConfigProvider;
use crate::loader::FileType;
use crate::network::{CentralityMeasure, GraphKind};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_one_of, validate_path, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cuisine-net")]
#[command(about = "Network analysis of recipes, ingredients and cuisines")]
pub struct CliArgs {
    /// Directory containing the dataset files
    #[arg(long, default_value = "./database", conflicts_with = "base_url")]
    pub data_dir: String,

    /// Fetch the dataset files from this base URL instead of a directory
    #[arg(long)]
    pub base_url: Option<String>,

    /// HTTP timeout in seconds when using --base-url
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Dataset file format; inferred from the recipes file name when omitted
    #[arg(long, value_enum)]
    pub file_type: Option<FileType>,

    #[arg(long)]
    pub recipes_file: Option<String>,

    #[arg(long)]
    pub ingredients_file: Option<String>,

    #[arg(long)]
    pub compound_ingredients_file: Option<String>,

    /// Skip the compound ingredient file
    #[arg(long)]
    pub no_compound_ingredients: bool,

    #[arg(long)]
    pub recipe_ingredients_file: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json,csv")]
    pub output_formats: Vec<String>,

    /// Bundle every output file into one ZIP archive
    #[arg(long)]
    pub compress: bool,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    /// Ingredients used fewer times than this are reported as uncommon
    #[arg(long, default_value = "5")]
    pub uncommon_threshold: usize,

    /// Minimum Jaccard similarity for two recipes to count as similar
    #[arg(long, default_value = "0.5")]
    pub similarity_threshold: f64,

    /// Number of entries kept in every ranking
    #[arg(long, default_value = "10")]
    pub top_n: usize,

    #[arg(long, value_enum, default_value = "cooccurrence")]
    pub graph_kind: GraphKind,

    #[arg(long, default_value = "1")]
    pub min_edge_weight: u32,

    /// Centrality measures to rank by (all when omitted)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub centrality: Vec<CentralityMeasure>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

/// 命令列參數解析後的設定
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub source: DatasetSource,
    pub files: DatasetFiles,
    pub file_type: FileType,
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub archive_name: Option<String>,
    pub settings: AnalysisSettings,
    pub verbose: bool,
    pub monitor: bool,
    pub json_logs: bool,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let source = match args.base_url {
            Some(base_url) => DatasetSource::Http {
                base_url,
                timeout_seconds: args.timeout_seconds,
            },
            None => DatasetSource::Local {
                path: args.data_dir,
            },
        };

        let file_type = args
            .file_type
            .or_else(|| {
                args.recipes_file
                    .as_deref()
                    .and_then(|name| FileType::from_extension(name).ok())
            })
            .unwrap_or_default();

        let mut files = DatasetFiles::with_extension(file_type.extension());
        if let Some(recipes) = args.recipes_file {
            files.recipes = recipes;
        }
        if let Some(ingredients) = args.ingredients_file {
            files.ingredients = ingredients;
        }
        if let Some(compound) = args.compound_ingredients_file {
            files.compound_ingredients = Some(compound);
        }
        if args.no_compound_ingredients {
            files.compound_ingredients = None;
        }
        if let Some(relations) = args.recipe_ingredients_file {
            files.recipe_ingredients = relations;
        }

        let centrality_measures = if args.centrality.is_empty() {
            CentralityMeasure::ALL.to_vec()
        } else {
            args.centrality
        };

        Self {
            source,
            files,
            file_type,
            output_path: args.output_path,
            output_formats: args
                .output_formats
                .into_iter()
                .map(|f| f.trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
            archive_name: args.compress.then_some(args.archive_name),
            settings: AnalysisSettings {
                uncommon_threshold: args.uncommon_threshold,
                similarity_threshold: args.similarity_threshold,
                top_n: args.top_n,
                graph_kind: args.graph_kind,
                min_edge_weight: args.min_edge_weight,
                centrality_measures,
            },
            verbose: args.verbose,
            monitor: args.monitor,
            json_logs: args.json_logs,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn source(&self) -> &DatasetSource {
        &self.source
    }

    fn dataset_files(&self) -> &DatasetFiles {
        &self.files
    }

    fn file_type(&self) -> FileType {
        self.file_type
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive_name.as_deref()
    }

    fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.source.validate()?;
        self.files.validate()?;
        self.settings.validate()?;
        validate_path("output_path", &self.output_path)?;
        for format in &self.output_formats {
            validate_one_of("output_formats", format, &OUTPUT_FORMATS)?;
        }
        if let Some(archive) = &self.archive_name {
            validate_file_extensions("archive_name", &[archive.as_str()], &["zip"])?;
        }
        Ok(())
    }
}
