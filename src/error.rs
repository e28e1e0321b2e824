use crate::models::SubmissionRecord;

/// 应用程序错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 凭据解析错误
    #[error("凭据错误: {0}")]
    Credential(#[from] CredentialError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 浏览器相关错误
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 没有可用的标签页
    #[error("没有找到匹配的标签页: {hint}")]
    PageNotFound { hint: String },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Cookie 解析失败（区别于"解析成功但字段不全"）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("cookie text contains control characters")]
    MalformedCookie,
}

/// 提取错误
#[derive(Debug, thiserror::Error)]
#[error("extract failed: {kind}")]
pub struct ExtractError {
    #[source]
    pub kind: ExtractErrorKind,
    pub partial: Option<Box<SubmissionRecord>>,
}

impl ExtractError {
    pub fn new(kind: ExtractErrorKind) -> Self {
        Self {
            kind,
            partial: None,
        }
    }

    pub fn with_partial(kind: ExtractErrorKind, partial: SubmissionRecord) -> Self {
        Self {
            kind,
            partial: Some(Box::new(partial)),
        }
    }
}

/// 提取错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractErrorKind {
    #[error("page content is empty")]
    EmptyContent,
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// 请求构建错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestBuildError {
    #[error("record is not serializable: {0}")]
    NotSerializable(String),
    #[error("record did not serialize to a json object")]
    NotAnObject,
    #[error("invalid endpoint url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value for header `{0}`")]
    InvalidHeader(String),
}

/// 传输层错误
///
/// 超时与其他网络故障必须可区分
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timeout: no response within {after_ms} ms")]
    Timeout { after_ms: u64 },
    #[error("{0}")]
    Network(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest 自身的超时也归为超时
        if err.is_timeout() {
            TransportError::Timeout { after_ms: 0 }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// 文件操作错误
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的命令
    #[error("未知的命令: {0} (可用: login / submit / observe)")]
    UnknownCommand(String),
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON解析失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
