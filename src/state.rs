use std::sync::Arc;

use crate::features::relay::client::RelayClient;
use crate::features::relay::registry::UploaderRegistry;
use crate::features::relay::staging::StagingArea;

/// 聚合的应用共享状态
///
/// 全部成员启动时构建、只读共享；逐请求的可变状态（暂存文件）
/// 由各请求独占持有，不进入这里。
#[derive(Clone)]
pub struct AppState {
    /// 上传器白名单
    pub uploaders: Arc<UploaderRegistry>,
    /// 上游转发客户端
    pub relay: Arc<RelayClient>,
    /// 暂存区
    pub staging: Arc<StagingArea>,
}
