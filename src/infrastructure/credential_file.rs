//! 凭据文件 - 基础设施层
//!
//! 凭据槽内容以 TOML 保存：
//! `{login, sid, chost?}` 或解析失败时的 `{raw_cookie, raw_origin}`

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AppError, AppResult, FileError};
use crate::models::StoredCredential;

/// 凭据文件
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取凭据，文件不存在时返回 `None`
    pub async fn load(&self) -> AppResult<Option<StoredCredential>> {
        let path_text = self.path.display().to_string();
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("凭据文件不存在: {}", path_text);
                return Ok(None);
            }
            Err(e) => return Err(AppError::file_read_failed(path_text, e)),
        };

        let credential = toml::from_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: path_text,
                source,
            })
        })?;
        Ok(Some(credential))
    }

    /// 覆盖写入
    pub async fn save(&self, credential: &StoredCredential) -> AppResult<()> {
        let content = toml::to_string(credential).map_err(FileError::from)?;
        let path_text = self.path.display().to_string();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_write_failed(&path_text, e))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| AppError::file_write_failed(&path_text, e))?;

        info!("✓ 凭据已保存: {}", path_text);
        Ok(())
    }
}
