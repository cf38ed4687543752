use std::sync::{OnceLock, PoisonError, RwLock};

use serde_json::json;
use uuid::Uuid;

/// Worker运行身份
///
/// UUID在首次读取时生成，此后在进程生命周期内保持不变。
/// 名称可以随配置变化，持有同一个 `Arc` 的日志器会看到新名称。
#[derive(Debug)]
pub struct WorkerIdentity {
    name: RwLock<String>,
    uuid: OnceLock<Uuid>,
}

impl WorkerIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(name.into()),
            uuid: OnceLock::new(),
        }
    }

    pub fn name(&self) -> String {
        self.name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 更新名称，UUID保持不变
    pub fn rename(&self, name: impl Into<String>) {
        *self.name.write().unwrap_or_else(PoisonError::into_inner) = name.into();
    }

    pub fn uuid(&self) -> Uuid {
        *self.uuid.get_or_init(Uuid::new_v4)
    }

    /// 写入日志上下文 `worker` 键的值
    pub fn to_context_value(&self) -> serde_json::Value {
        json!({
            "name": self.name(),
            "UUID": self.uuid().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_is_stable() {
        let identity = WorkerIdentity::new("mailer");
        let first = identity.uuid();
        assert_eq!(identity.uuid(), first);
        assert_eq!(first.get_version_num(), 4);
    }

    #[test]
    fn test_identities_get_distinct_uuids() {
        let a = WorkerIdentity::new("mailer");
        let b = WorkerIdentity::new("mailer");
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_rename_keeps_uuid() {
        let identity = WorkerIdentity::new("mailer");
        let uuid = identity.uuid();

        identity.rename("courier");

        assert_eq!(identity.name(), "courier");
        assert_eq!(identity.uuid(), uuid);
        assert_eq!(identity.to_context_value()["name"], "courier");
    }

    #[test]
    fn test_context_value() {
        let identity = WorkerIdentity::new("mailer");
        let value = identity.to_context_value();
        assert_eq!(value["name"], "mailer");
        assert_eq!(value["UUID"], identity.uuid().to_string());
    }
}
