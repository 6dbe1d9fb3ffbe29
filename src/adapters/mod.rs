// Adapters layer: concrete storage backends behind the Storage port.

pub mod http;
pub mod storage;

pub use http::HttpStorage;
pub use storage::LocalStorage;

use crate::config::settings::DatasetSource;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// 依設定決定從本機或 HTTP 讀取資料集
#[derive(Debug, Clone)]
pub enum SourceStorage {
    Local(LocalStorage),
    Http(HttpStorage),
}

impl SourceStorage {
    pub fn from_source(source: &DatasetSource) -> Result<Self> {
        match source {
            DatasetSource::Local { path } => Ok(SourceStorage::Local(LocalStorage::new(path))),
            DatasetSource::Http {
                base_url,
                timeout_seconds,
            } => Ok(SourceStorage::Http(HttpStorage::new(base_url, *timeout_seconds)?)),
        }
    }
}

impl Storage for SourceStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        match self {
            SourceStorage::Local(storage) => storage.read_file(path).await,
            SourceStorage::Http(storage) => storage.read_file(path).await,
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        match self {
            SourceStorage::Local(storage) => storage.write_file(path, data).await,
            SourceStorage::Http(storage) => storage.write_file(path, data).await,
        }
    }
}
