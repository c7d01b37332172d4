//! 上传转发 API 处理模块（features/relay）
use axum::{
    Router,
    extract::{Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::Value;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

use super::staging::StagedFile;

/// multipart 表单结构（仅用于 OpenAPI 文档展示）
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
struct UploadForm {
    /// 待转发的文件内容
    #[schema(value_type = String, format = Binary)]
    file: String,
    /// 目标 uploader 名称（须在白名单内）
    uploader: String,
}

#[utoipa::path(
    get,
    path = "/list",
    summary = "列出可用的 uploader",
    description = "返回允许转发的 uploader 名称列表，顺序固定，进程生命周期内不变。",
    responses((status = 200, description = "白名单名称数组", body = Vec<String>)),
    tag = "Relay"
)]
pub async fn list_uploaders(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.uploaders.names().to_vec())
}

#[utoipa::path(
    post,
    path = "/upload",
    summary = "上传并转发文件",
    description = "接收 multipart 表单（file + uploader），校验通过后把文件转发到外部上传端点，并原样返回对端的 JSON 结果。",
    request_body(content = inline(UploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "上游返回的 JSON 原文", body = serde_json::Value),
        (status = 400, description = "缺少文件或 uploader 不在白名单", body = ErrorBody),
        (status = 413, description = "文件超出大小上限", body = ErrorBody),
        (status = 500, description = "上游转发失败", body = ErrorBody)
    ),
    tag = "Relay"
)]
pub async fn relay_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (staged, uploader) = read_upload_form(&state, &mut multipart).await?;

    // 校验顺序固定：先文件、后 uploader。
    // 两条消息原文是对外契约（前端按字符串匹配），不要改措辞。
    let staged = staged.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let uploader = match uploader {
        Some(name) if state.uploaders.contains(&name) => name,
        _ => return Err(AppError::Validation("Invalid uploader".to_string())),
    };

    tracing::info!(
        uploader = %uploader,
        file = %staged.original_name(),
        size = staged.size(),
        "开始转发上传"
    );

    let result: Value = state.relay.forward(&staged, &uploader).await.map_err(|e| {
        tracing::warn!(uploader = %uploader, "上游转发失败: {e}");
        e
    })?;

    tracing::info!(uploader = %uploader, "上游转发成功");
    Ok(Json(result))
    // staged 在此离开作用域；上面的每条失败路径同样经由守卫删除暂存文件
}

/// 读取 multipart 表单：`file` 字段边收边落盘，`uploader` 字段取文本。
///
/// 重复的 `file` 字段只保留第一个；未知字段跳过（读取器会丢弃其内容），
/// 与上线前端之外的调用方保持宽容。
async fn read_upload_form(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<(Option<StagedFile>, Option<String>), AppError> {
    let mut staged: Option<StagedFile> = None;
    let mut uploader: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart request: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                if staged.is_some() {
                    tracing::warn!("收到重复的 file 字段，忽略后续内容");
                    continue;
                }

                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "file".to_string());

                let mut writer = state.staging.create_writer(&original_name).await?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file field: {e}")))?
                {
                    writer.write_chunk(&chunk).await?;
                }
                staged = Some(writer.finish().await?);
            }
            "uploader" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("failed to read uploader field: {e}"))
                })?;
                uploader = Some(value);
            }
            _ => {}
        }
    }

    Ok((staged, uploader))
}

/// 注册上传转发路由
pub fn create_relay_router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/list", get(list_uploaders))
        .route("/upload", post(relay_upload))
}
