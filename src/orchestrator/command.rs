//! 命令行命令

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::workflow::SubmitMode;

/// 程序命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 从评测服务标签页读取 cookie 并保存凭据
    Login,
    /// 从评测站点标签页提取记录并提交
    Submit,
    /// 只提取不提交
    Observe,
}

impl Command {
    /// 解析第一个命令行参数，缺省为 `submit`
    pub fn parse(arg: Option<&str>) -> Result<Self, ConfigError> {
        arg.map_or(Ok(Command::Submit), |s| s.parse())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Login => "login",
            Command::Submit => "submit",
            Command::Observe => "observe",
        }
    }

    /// 提交类命令对应的运行模式
    pub fn submit_mode(self) -> Option<SubmitMode> {
        match self {
            Command::Login => None,
            Command::Submit => Some(SubmitMode::Submit),
            Command::Observe => Some(SubmitMode::Observe),
        }
    }
}

impl FromStr for Command {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "login" => Ok(Command::Login),
            "submit" => Ok(Command::Submit),
            "observe" => Ok(Command::Observe),
            other => Err(ConfigError::UnknownCommand(other.to_string())),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
