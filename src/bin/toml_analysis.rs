use clap::Parser;
use cuisine_net::config::settings::DatasetSource;
use cuisine_net::core::ConfigProvider;
use cuisine_net::network::GraphKind;
use cuisine_net::utils::{logger, validation::Validate};
use cuisine_net::{AnalysisEngine, AnalysisPipeline, LocalStorage, SourceStorage, TomlConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-analysis")]
#[command(about = "Cuisine network analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "analysis-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the graph kind from config
    #[arg(long, value_enum)]
    graph_kind: Option<GraphKind>,

    /// Dry run - show what would be analysed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌，[monitoring] log_level = "debug" 等同 --verbose
    logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));

    tracing::info!("🚀 Starting TOML-based cuisine network analysis");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(kind) = args.graph_kind {
        config.settings.graph_kind = kind;
        tracing::info!("🔧 Graph kind overridden to: {:?}", kind);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = SourceStorage::from_source(config.source())?;
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = AnalysisPipeline::new(source, output, config);

    let engine = AnalysisEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Analysis completed successfully!");
            println!("✅ Analysis completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Analysis: {} v{}",
        config.analysis.name, config.analysis.version
    );
    if !config.analysis.description.is_empty() {
        println!("  Description: {}", config.analysis.description);
    }
    println!("  Source: {}", config.source.describe());
    println!("  File type: {}", config.file_type());
    println!("  Graph: {:?}", config.settings.graph_kind);
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Dataset Files:");
    for file in config.dataset_files().all() {
        match config.source() {
            DatasetSource::Local { path } => {
                let full_path = Path::new(path).join(file);
                let status = if tokio::fs::try_exists(&full_path).await? {
                    "✅ found"
                } else {
                    "⚠️ missing"
                };
                println!("  {} ({})", full_path.display(), status);
            }
            DatasetSource::Http { base_url, .. } => {
                println!("  {}/{}", base_url.trim_end_matches('/'), file);
            }
        }
    }

    let settings = config.settings();
    println!();
    println!("⚙️ Analysis Settings:");
    println!("  Uncommon threshold: {}", settings.uncommon_threshold);
    println!("  Similarity threshold: {}", settings.similarity_threshold);
    println!("  Top N: {}", settings.top_n);
    println!("  Min edge weight: {}", settings.min_edge_weight);
    let measures: Vec<String> = settings
        .centrality_measures
        .iter()
        .map(|m| m.to_string())
        .collect();
    println!("  Centrality: {}", measures.join(", "));

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    match config.archive_name() {
        Some(archive) => println!("  Compression: {} (ZIP)", archive),
        None => println!("  Compression: disabled"),
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
