use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::services::dispatcher::DEFAULT_TIMEOUT_MS;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 默认评测主机（凭据未携带 chost 时使用）
    pub grading_host: String,
    /// 评测服务协议
    pub scheme: String,
    /// 外部 OJ 提交接口路径
    pub endpoint_path: String,
    /// 分发超时（毫秒）
    pub dispatch_timeout_ms: u64,
    /// 是否作为比赛内提交
    pub in_contest: bool,
    /// 是否把聚合站点的提交映射回真实 OJ
    pub map_aggregator: bool,
    /// 只提取不提交
    pub observe_only: bool,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 凭据持久化文件
    pub credential_file: String,
    /// 评测站点标签页 URL 关键字（为空时自动选择）
    pub judge_tab_hint: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grading_host: "oj.7fa4.cn".to_string(),
            scheme: "http".to_string(),
            endpoint_path: "/foreign_oj".to_string(),
            dispatch_timeout_ms: DEFAULT_TIMEOUT_MS,
            in_contest: false,
            map_aggregator: false,
            observe_only: false,
            browser_debug_port: 9222,
            credential_file: "credential.toml".to_string(),
            judge_tab_hint: String::new(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(&display, e))?;
        toml::from_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: display,
                source,
            })
        })
    }

    /// 读取 `OJ_SUBMIT_CONFIG` 指向的文件（若有），再应用环境变量覆盖
    pub fn from_env() -> AppResult<Self> {
        let base = match std::env::var("OJ_SUBMIT_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            grading_host: std::env::var("OJ_SUBMIT_GRADING_HOST").unwrap_or(self.grading_host),
            scheme: std::env::var("OJ_SUBMIT_SCHEME").unwrap_or(self.scheme),
            endpoint_path: std::env::var("OJ_SUBMIT_ENDPOINT_PATH").unwrap_or(self.endpoint_path),
            dispatch_timeout_ms: env_parse("OJ_SUBMIT_TIMEOUT_MS", "u64")?
                .unwrap_or(self.dispatch_timeout_ms),
            in_contest: env_parse("OJ_SUBMIT_IN_CONTEST", "bool")?.unwrap_or(self.in_contest),
            map_aggregator: env_parse("OJ_SUBMIT_MAP_AGGREGATOR", "bool")?
                .unwrap_or(self.map_aggregator),
            observe_only: env_parse("OJ_SUBMIT_OBSERVE", "bool")?.unwrap_or(self.observe_only),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", "u16")?
                .unwrap_or(self.browser_debug_port),
            credential_file: std::env::var("OJ_SUBMIT_CREDENTIAL_FILE")
                .unwrap_or(self.credential_file),
            judge_tab_hint: std::env::var("OJ_SUBMIT_JUDGE_TAB").unwrap_or(self.judge_tab_hint),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }
}

/// 读取并解析环境变量，未设置时为 `None`
fn env_parse<T: std::str::FromStr>(name: &str, expected_type: &str) -> AppResult<Option<T>> {
    let Ok(value) = std::env::var(name) else {
        return Ok(None);
    };
    value.trim().parse().map(Some).map_err(|_| {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        })
    })
}
