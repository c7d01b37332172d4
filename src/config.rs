use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    #[serde(default = "ApiConfig::default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    fn default_prefix() -> String {
        "/api".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

/// 上游转发配置
///
/// 所有 uploader 统一转发到同一个外部端点，由对端按 `uploader` 字段分发；
/// 本服务不持有任何具体图床的接入逻辑。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 外部上传端点 URL
    #[serde(default = "UpstreamConfig::default_endpoint")]
    pub endpoint: String,
    /// 单次转发的总超时（秒），覆盖连接与响应读取
    #[serde(default = "UpstreamConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    fn default_endpoint() -> String {
        "https://r-nozawa-uploader.hf.space/".to_string()
    }

    fn default_timeout() -> u64 {
        60
    }

    /// 获取转发超时时间
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 暂存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// 上传文件的落盘目录（随请求结束删除，不作持久存储）
    #[serde(default = "StagingConfig::default_dir")]
    pub dir: String,
    /// 单个上传文件的大小上限（字节）
    #[serde(default = "StagingConfig::default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl StagingConfig {
    fn default_dir() -> String {
        "./uploads".to_string()
    }

    fn default_max_upload_bytes() -> u64 {
        512 * 1024 * 1024
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            max_upload_bytes: Self::default_max_upload_bytes(),
        }
    }
}

/// 上传器白名单配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadersConfig {
    /// 允许的 uploader 名称，保序、大小写敏感
    #[serde(default = "UploadersConfig::default_names")]
    pub names: Vec<String>,
}

impl UploadersConfig {
    fn default_names() -> Vec<String> {
        [
            "anonfiles",
            "bayfiles",
            "file.io",
            "gofile",
            "katfile",
            "mixdrop",
            "pixeldrain",
            "racaty",
            "transfer.sh",
            "uguu.se",
            "uploadfile",
            "vshare",
            "zippyshare",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }
}

impl Default for UploadersConfig {
    fn default() -> Self {
        Self {
            names: Self::default_names(),
        }
    }
}

/// 静态资源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticAssetsConfig {
    /// 前端静态资源目录（含 index.html）
    #[serde(default = "StaticAssetsConfig::default_dir")]
    pub dir: String,
}

impl StaticAssetsConfig {
    fn default_dir() -> String {
        "./public".to_string()
    }
}

impl Default for StaticAssetsConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 是否启用 CORS（前端可能部署在其他源，默认放开）
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    /// 允许的 Origin 列表（"*" 表示任意）
    #[serde(default = "CorsConfig::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_allowed_origins() -> Vec<String> {
        vec!["*".to_string()]
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_origins: Self::default_allowed_origins(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// 上游转发配置
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 暂存配置
    #[serde(default)]
    pub staging: StagingConfig,
    /// 上传器白名单
    #[serde(default)]
    pub uploaders: UploadersConfig,
    /// 静态资源配置
    #[serde(default)]
    pub static_assets: StaticAssetsConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖。
    ///
    /// 配置文件可以不存在（全部字段都有默认值），例如 `APP_SERVER_PORT`
    /// 这类环境变量可单独覆盖对应字段。
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置（文件可缺省）", config_path);

        let builder = ConfigBuilder::builder()
            // 加载配置文件（允许缺失，走默认值）
            .add_source(File::with_name(config_path.to_str().unwrap_or("config.toml")).required(false))
            // 支持环境变量覆盖，例如：APP_API_PREFIX
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取暂存目录路径
    pub fn staging_path(&self) -> PathBuf {
        PathBuf::from(&self.staging.dir)
    }

    /// 获取静态资源目录路径
    pub fn static_assets_path(&self) -> PathBuf {
        PathBuf::from(&self.static_assets.dir)
    }
}
