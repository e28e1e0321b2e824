//! 凭据槽 - 基础设施层
//!
//! 进程内唯一的凭据存放处：整体替换，不做局部修改。
//! 读者拿到的是某一次写入的完整快照

use std::sync::{Arc, RwLock};

use crate::models::StoredCredential;

/// 单槽凭据存储，克隆后共享同一个槽
#[derive(Debug, Clone, Default)]
pub struct CredentialSlot {
    inner: Arc<RwLock<Option<Arc<StoredCredential>>>>,
}

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带初始值创建
    pub fn with(credential: StoredCredential) -> Self {
        let slot = Self::new();
        slot.replace(credential);
        slot
    }

    /// 用新凭据整体替换，返回旧值
    pub fn replace(&self, credential: StoredCredential) -> Option<Arc<StoredCredential>> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.replace(Arc::new(credential))
    }

    /// 当前凭据快照
    pub fn load(&self) -> Option<Arc<StoredCredential>> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 清空
    pub fn clear(&self) -> Option<Arc<StoredCredential>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionCredential;

    fn parsed(login: &str) -> StoredCredential {
        StoredCredential::Parsed(SessionCredential {
            login: Some(login.to_string()),
            sid: Some("S".to_string()),
            chost: None,
        })
    }

    #[test]
    fn test_replace_on_refresh() {
        let slot = CredentialSlot::new();
        assert!(slot.load().is_none());

        assert!(slot.replace(parsed("first")).is_none());
        let snapshot = slot.load().unwrap();

        let previous = slot.replace(parsed("second")).unwrap();
        assert_eq!(*previous, parsed("first"));
        // 旧快照不受替换影响
        assert_eq!(*snapshot, parsed("first"));
        assert_eq!(*slot.load().unwrap(), parsed("second"));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let slot = CredentialSlot::new();
        let shared = slot.clone();
        shared.replace(parsed("L"));
        assert_eq!(*slot.load().unwrap(), parsed("L"));

        slot.clear();
        assert!(shared.load().is_none());
    }
}
