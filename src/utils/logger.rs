use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日誌輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 終端機用的精簡單行格式
    #[default]
    Compact,
    /// 每行一筆 JSON，方便後續以工具收集
    Json,
}

/// RUST_LOG 未設定時使用的過濾規則
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "cuisine_net=debug,info"
    } else {
        "cuisine_net=info"
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        assert_eq!(default_directives(false), "cuisine_net=info");
        assert!(EnvFilter::try_new(default_directives(true)).is_ok());
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
