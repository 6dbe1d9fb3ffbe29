use crate::domain::ports::Storage;
use crate::utils::error::{AnalysisError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// 唯讀的 HTTP 資料來源，檔案路徑接在基底網址之後
#[derive(Debug, Clone)]
pub struct HttpStorage {
    base_url: Url,
    client: Client,
}

impl HttpStorage {
    pub fn new(base_url: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        // 確保以 '/' 結尾，否則 join 會取代最後一段路徑
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| AnalysisError::InvalidConfigValueError {
            field: "source.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn file_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AnalysisError::InvalidConfigValueError {
                field: "source.files".to_string(),
                value: path.to_string(),
                reason: format!("Cannot build URL: {}", e),
            })
    }
}

impl Storage for HttpStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.file_url(path)?;
        tracing::debug!("Fetching dataset file from: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("HTTP response status: {}", status);

        if !status.is_success() {
            return Err(AnalysisError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn write_file(&self, path: &str, _data: &[u8]) -> Result<()> {
        Err(AnalysisError::UnsupportedOperation {
            storage: "http".to_string(),
            operation: format!("write {}", path),
        })
    }
}
