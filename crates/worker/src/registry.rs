use std::collections::BTreeMap;

use ghost_core::{GhostError, GhostResult};

use crate::worker::Worker;

pub type WorkerFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Worker>> + Send + Sync>;

/// 按类型名称构造Worker的注册表
#[derive(Default)]
pub struct WorkerRegistry {
    factories: BTreeMap<String, WorkerFactory>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// 注册工厂，同名注册会覆盖之前的工厂
    pub fn register<F>(&mut self, worker_type: impl Into<String>, factory: F)
    where
        F: Fn() -> anyhow::Result<Box<dyn Worker>> + Send + Sync + 'static,
    {
        self.factories.insert(worker_type.into(), Box::new(factory));
    }

    pub fn with<F>(mut self, worker_type: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Worker>> + Send + Sync + 'static,
    {
        self.register(worker_type, factory);
        self
    }

    pub fn contains(&self, worker_type: &str) -> bool {
        self.factories.contains_key(worker_type)
    }

    pub fn list_workers(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.factories.len()
    }

    /// 构造Worker；未注册或工厂失败都返回 `WorkerNotFound`
    pub fn resolve(&self, worker_type: &str) -> GhostResult<Box<dyn Worker>> {
        let factory = self
            .factories
            .get(worker_type)
            .ok_or_else(|| GhostError::worker_not_found(worker_type))?;

        factory().map_err(|e| GhostError::worker_construction_failed(worker_type, e))
    }
}

impl std::fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("workers", &self.list_workers())
            .finish()
    }
}
