use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppError;

/// 暂存区：为每个请求在固定目录下分配互不相关的暂存文件。
///
/// 暂存文件名随机生成、不带扩展名，与客户端提交的文件名完全解耦，
/// 原始文件名只作为元信息带到上游转发阶段。
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
    max_upload_bytes: u64,
}

impl StagingArea {
    pub fn new(dir: PathBuf, max_upload_bytes: u64) -> Self {
        Self {
            dir,
            max_upload_bytes,
        }
    }

    /// 暂存目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 单个文件的大小上限（字节）
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// 创建一个新的暂存写入器
    pub async fn create_writer(&self, original_name: &str) -> Result<StagedWriter, AppError> {
        let path = self.dir.join(Uuid::new_v4().simple().to_string());
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create staged file: {e}")))?;

        Ok(StagedWriter {
            path,
            file: Some(file),
            original_name: original_name.to_string(),
            written: 0,
            limit: self.max_upload_bytes,
            handed_off: false,
        })
    }
}

/// 暂存写入器：按块落盘，边写边检查大小上限。
///
/// 只要没有走到 [`StagedWriter::finish`]（超限、IO 失败、调用方中途放弃），
/// Drop 时就会删除已写入的部分文件。
pub struct StagedWriter {
    path: PathBuf,
    file: Option<tokio::fs::File>,
    original_name: String,
    written: u64,
    limit: u64,
    handed_off: bool,
}

impl StagedWriter {
    /// 追加一块内容；超出上限直接失败（部分文件交由 Drop 清理）
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        self.written += chunk.len() as u64;
        if self.written > self.limit {
            return Err(AppError::PayloadTooLarge { limit: self.limit });
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| AppError::Internal("staged file already closed".to_string()))?;
        file.write_all(chunk)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write staged file: {e}")))?;
        Ok(())
    }

    /// 结束写入，把文件所有权移交给 [`StagedFile`] 守卫
    pub async fn finish(mut self) -> Result<StagedFile, AppError> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| AppError::Internal(format!("failed to flush staged file: {e}")))?;
        }

        self.handed_off = true;
        Ok(StagedFile {
            path: self.path.clone(),
            original_name: std::mem::take(&mut self.original_name),
            size: self.written,
        })
    }
}

impl Drop for StagedWriter {
    fn drop(&mut self) {
        if self.handed_off {
            return;
        }
        // 先关句柄再删文件（Windows 上顺序敏感）。
        drop(self.file.take());
        remove_staged(&self.path);
    }
}

/// 暂存文件守卫：持有路径与元信息，Drop 时无条件删除盘上文件。
///
/// 请求处理的所有出口（转发成功、校验失败、上游失败、任务被取消）
/// 都经由守卫离开作用域完成清理；删除失败只记日志，绝不影响
/// 已经确定的请求处理结果。
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    original_name: String,
    size: u64,
}

impl StagedFile {
    /// 盘上暂存路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 客户端提交的原始文件名
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// 已写入的字节数
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        remove_staged(&self.path);
    }
}

/// 删除暂存文件；文件不存在视为已清理，其余失败记 warn。
fn remove_staged(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("已删除暂存文件: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("删除暂存文件失败 {}: {e}", path.display()),
    }
}
