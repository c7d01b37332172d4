use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio_util::io::ReaderStream;

use crate::config::UpstreamConfig;
use crate::error::AppError;

use super::staging::StagedFile;

/// 上游转发客户端：把暂存文件以 multipart 形式转发到固定的外部上传端点。
///
/// 端点与超时来自启动配置，进程内只构建一次（保存在 `AppState`），
/// 复用底层连接池。
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    /// 按配置构建客户端；超时覆盖整个转发过程（连接 + 请求体 + 响应读取）。
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| AppError::Internal(format!("初始化 HTTP Client 失败: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// 转发一次上传并返回上游响应的 JSON 原文。
    ///
    /// `file` 字段从暂存文件流式读取（不整体载入内存），保留原始文件名，
    /// content-type 按文件名推断；`uploader` 为纯文本字段。响应体不做
    /// 任何结构解释，原样传回调用方。
    pub async fn forward(&self, staged: &StagedFile, uploader: &str) -> Result<Value, AppError> {
        tracing::debug!(
            uploader = %uploader,
            file = %staged.original_name(),
            size = staged.size(),
            "转发上传到 {}",
            self.endpoint
        );

        let form = self.build_form(staged, uploader).await?;
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "upstream responded with status {status}"
            )));
        }

        match response.json::<Value>().await {
            Ok(value) => Ok(value),
            Err(e) if e.is_decode() => Err(AppError::Upstream("malformed response".to_string())),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn build_form(&self, staged: &StagedFile, uploader: &str) -> Result<Form, AppError> {
        let file = tokio::fs::File::open(staged.path())
            .await
            .map_err(|e| AppError::Internal(format!("failed to open staged file: {e}")))?;

        let mime = mime_guess::from_path(staged.original_name()).first_or_octet_stream();
        let part = Part::stream_with_length(
            reqwest::Body::wrap_stream(ReaderStream::new(file)),
            staged.size(),
        )
        .file_name(staged.original_name().to_string())
        .mime_str(mime.essence_str())
        .map_err(|e| AppError::Internal(format!("invalid inferred content type: {e}")))?;

        Ok(Form::new()
            .part("file", part)
            .text("uploader", uploader.to_string()))
    }
}
