use std::path::Path;

use crate::config::AppConfig;
use crate::error::AppError;

/// 执行启动检查
///
/// 1. 检查并创建暂存目录
/// 2. 清理上一次进程遗留的暂存文件
/// 3. 检查静态资源目录（仅告警，不阻断启动）
pub async fn run_startup_checks(config: &AppConfig) -> Result<(), AppError> {
    tracing::info!("🔍 开始执行启动检查...");

    ensure_staging_dir(config).await?;
    sweep_staging_dir(&config.staging_path()).await?;
    check_static_assets(config);

    tracing::info!("✅ 启动检查完成");
    Ok(())
}

/// 确保暂存目录存在
async fn ensure_staging_dir(config: &AppConfig) -> Result<(), AppError> {
    let staging_path = config.staging_path();

    if !staging_path.exists() {
        tracing::warn!("📁 未找到暂存目录，正在创建: {:?}", staging_path);
        tokio::fs::create_dir_all(&staging_path)
            .await
            .map_err(|e| AppError::Internal(format!("创建暂存目录失败: {e}")))?;
        tracing::info!("✅ 暂存目录创建成功");
    } else {
        tracing::info!("✅ 暂存目录已存在");
    }

    Ok(())
}

/// 清空暂存目录中的遗留文件。
///
/// 暂存文件的生命周期与单个请求绑定；目录里启动时还能看到的
/// 任何文件都是上一次进程异常退出留下的孤儿，直接回收。
async fn sweep_staging_dir(staging_path: &Path) -> Result<(), AppError> {
    let mut entries = tokio::fs::read_dir(staging_path)
        .await
        .map_err(|e| AppError::Internal(format!("读取暂存目录失败: {e}")))?;

    let mut removed: u64 = 0;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(format!("遍历暂存目录失败: {e}")))?
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("清理遗留暂存文件失败 {}: {e}", path.display()),
        }
    }

    if removed > 0 {
        tracing::info!("🧹 已清理 {} 个遗留暂存文件", removed);
    }
    Ok(())
}

/// 检查静态资源目录与入口页（缺失仅告警，前端可单独部署）
fn check_static_assets(config: &AppConfig) {
    let assets_path = config.static_assets_path();
    if !assets_path.exists() {
        tracing::warn!("未找到静态资源目录: {:?}，回退路由将返回 404", assets_path);
        return;
    }
    if !assets_path.join("index.html").exists() {
        tracing::warn!("静态资源目录缺少 index.html: {:?}", assets_path);
    } else {
        tracing::info!("静态资源就绪: {:?}", assets_path);
    }
}

#[cfg(test)]
mod tests {
    use super::sweep_staging_dir;

    #[tokio::test]
    async fn sweep_removes_orphaned_files_but_keeps_subdirs() {
        let dir = tempfile::tempdir().expect("create tempdir");
        std::fs::write(dir.path().join("orphan-1"), b"a").expect("write orphan");
        std::fs::write(dir.path().join("orphan-2"), b"b").expect("write orphan");
        std::fs::create_dir(dir.path().join("keep")).expect("create subdir");

        sweep_staging_dir(dir.path()).await.expect("sweep");

        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from("keep")]);
    }
}
