use crate::config::settings::{AnalysisSettings, DatasetFiles, DatasetSource};
use crate::core::report::AnalysisReport;
use crate::domain::model::Dataset;
use crate::loader::FileType;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &DatasetSource;
    fn dataset_files(&self) -> &DatasetFiles;
    fn file_type(&self) -> FileType;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// 若回傳 Some，所有輸出會打包成這個 ZIP 檔
    fn archive_name(&self) -> Option<&str>;
    fn settings(&self) -> &AnalysisSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, dataset: Dataset) -> Result<AnalysisReport>;
    async fn load(&self, report: AnalysisReport) -> Result<String>;
}
