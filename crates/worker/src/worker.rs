use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghost_core::{WorkerConfiguration, WorkerIdentity, WorkerLogger};
use uuid::Uuid;

use crate::signal::Signal;

/// 运行模式标志，两者相互独立
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerFlags {
    pub interactive: bool,
    pub test: bool,
}

impl WorkerFlags {
    /// 任一标志置位时都在前台运行
    pub fn is_foreground(&self) -> bool {
        self.interactive || self.test
    }
}

/// Worker公共状态
///
/// 具体Worker通过组合持有一个 `WorkerBase`，并在 [`Worker::base`] /
/// [`Worker::base_mut`] 中返回它。
#[derive(Debug)]
pub struct WorkerBase {
    configuration: WorkerConfiguration,
    identity: Arc<WorkerIdentity>,
    flags: WorkerFlags,
    logger: Option<Arc<WorkerLogger>>,
    arguments: HashMap<String, String>,
}

impl WorkerBase {
    pub fn new(configuration: WorkerConfiguration) -> Self {
        let identity = Arc::new(WorkerIdentity::new(configuration.app_name()));
        Self {
            configuration,
            identity,
            flags: WorkerFlags::default(),
            logger: None,
            arguments: HashMap::new(),
        }
    }

    pub fn configuration(&self) -> &WorkerConfiguration {
        &self.configuration
    }

    /// 替换配置（例如叠加配置文件之后）
    ///
    /// 名称变化只更新共享身份的名称，UUID和已挂载的日志器保持不变。
    pub fn set_configuration(&mut self, configuration: WorkerConfiguration) {
        if configuration.app_name() != self.configuration.app_name() {
            self.identity.rename(configuration.app_name());
        }
        self.configuration = configuration;
    }

    pub fn identity(&self) -> &Arc<WorkerIdentity> {
        &self.identity
    }

    pub fn flags(&self) -> WorkerFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: WorkerFlags) {
        self.flags = flags;
    }

    pub fn attach_logger(&mut self, logger: Arc<WorkerLogger>) {
        self.logger = Some(logger);
    }

    pub fn logger(&self) -> Option<&WorkerLogger> {
        self.logger.as_deref()
    }

    pub fn set_arguments(&mut self, arguments: HashMap<String, String>) {
        self.arguments = arguments;
    }

    pub fn arguments(&self) -> &HashMap<String, String> {
        &self.arguments
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

/// Worker契约
///
/// 具体实现只需提供配置（通过 `WorkerBase`）、有效性判断以及五个生命周期
/// 钩子；身份、标志和时间参数由默认方法从 `WorkerBase` 读取。
#[async_trait]
pub trait Worker: Send {
    fn base(&self) -> &WorkerBase;

    fn base_mut(&mut self) -> &mut WorkerBase;

    /// 返回 `false` 时主循环在下一轮开始前退出
    fn is_valid(&self) -> bool;

    async fn start_up(&mut self) -> anyhow::Result<()>;

    async fn wake(&mut self) -> anyhow::Result<()>;

    async fn execute(&mut self) -> anyhow::Result<Signal>;

    async fn sleep(&mut self) -> anyhow::Result<()>;

    async fn shutdown(&mut self) -> anyhow::Result<()>;

    fn init(&mut self, flags: WorkerFlags, logger: Arc<WorkerLogger>) {
        let base = self.base_mut();
        base.set_flags(flags);
        base.attach_logger(logger);
    }

    fn name(&self) -> &str {
        self.base().configuration().app_name()
    }

    fn uuid(&self) -> Uuid {
        self.base().identity().uuid()
    }

    fn identity(&self) -> Arc<WorkerIdentity> {
        Arc::clone(self.base().identity())
    }

    fn configuration(&self) -> &WorkerConfiguration {
        self.base().configuration()
    }

    fn logger(&self) -> Option<&WorkerLogger> {
        self.base().logger()
    }

    fn is_interactive(&self) -> bool {
        self.base().flags().interactive
    }

    fn is_test(&self) -> bool {
        self.base().flags().test
    }

    fn stall_time(&self) -> Duration {
        self.configuration().stall_time()
    }

    fn sleep_time(&self) -> Duration {
        self.configuration().sleep_time()
    }

    fn max_iteration_count(&self) -> u32 {
        self.configuration().max_iteration_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghost_core::MultiLogger;

    struct Idle {
        base: WorkerBase,
    }

    #[async_trait]
    impl Worker for Idle {
        fn base(&self) -> &WorkerBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut WorkerBase {
            &mut self.base
        }
        fn is_valid(&self) -> bool {
            true
        }
        async fn start_up(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn wake(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn execute(&mut self) -> anyhow::Result<Signal> {
            Ok(Signal::Continue)
        }
        async fn sleep(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn shutdown(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn idle() -> Idle {
        let configuration = WorkerConfiguration::builder("Idle Worker")
            .stall_time_seconds(5)
            .sleep_time_seconds(100)
            .max_iteration_count(2)
            .build()
            .unwrap();
        Idle {
            base: WorkerBase::new(configuration),
        }
    }

    #[test]
    fn test_accessors_come_from_configuration() {
        let worker = idle();
        assert_eq!(worker.name(), "Idle Worker");
        assert_eq!(worker.stall_time(), Duration::from_secs(5));
        assert_eq!(worker.sleep_time(), Duration::from_secs(100));
        assert_eq!(worker.max_iteration_count(), 2);
        assert_eq!(worker.uuid(), worker.uuid());
    }

    #[test]
    fn test_flags_are_independent() {
        let mut worker = idle();
        let logger = Arc::new(WorkerLogger::new(MultiLogger::new(), worker.identity()));

        worker.init(
            WorkerFlags {
                interactive: true,
                test: false,
            },
            logger,
        );

        assert!(worker.is_interactive());
        assert!(!worker.is_test());
        assert!(worker.logger().is_some());
    }

    #[test]
    fn test_renaming_keeps_uuid() {
        let mut worker = idle();
        let before = worker.uuid();
        let shared = worker.identity();

        let same_name = worker.configuration().to_builder().stall_time_seconds(1).build().unwrap();
        worker.base_mut().set_configuration(same_name);
        assert_eq!(worker.uuid(), before);

        let renamed = worker.configuration().to_builder().app_name("Other").build().unwrap();
        worker.base_mut().set_configuration(renamed);
        assert_eq!(worker.name(), "Other");
        assert_eq!(worker.identity().name(), "Other");
        assert_eq!(worker.uuid(), before);
        assert!(Arc::ptr_eq(&shared, &worker.identity()));
    }

    #[test]
    fn test_arguments() {
        let mut worker = idle();
        worker
            .base_mut()
            .set_arguments(HashMap::from([("queue".to_string(), "mail".to_string())]));
        assert_eq!(worker.base().argument("queue"), Some("mail"));
        assert_eq!(worker.base().argument("missing"), None);
    }
}
