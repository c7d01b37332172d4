/// 健康检查
pub mod health;

/// 上传转发（白名单、暂存、上游客户端）
pub mod relay;
