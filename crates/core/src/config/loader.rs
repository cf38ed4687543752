use std::env;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use super::worker_config::{WorkerConfiguration, WorkerSettings};
use crate::{GhostError, GhostResult};

pub const CONFIG_PATH_ENV: &str = "GHOST_CONFIG_PATH";
const ENV_PREFIX: &str = "GHOST";

#[derive(Debug, Default, Deserialize)]
struct GhostSettings {
    #[serde(default)]
    worker: WorkerSettings,
}

/// 配置加载器，将外部配置覆盖到Worker自带的配置上
///
/// 优先级（从低到高）：
/// 1. Worker代码中构建的配置
/// 2. TOML配置文件的 `[worker]` 段
/// 3. `GHOST_WORKER__<FIELD>` 环境变量
pub struct ConfigLoader;

impl ConfigLoader {
    /// 加载配置，未指定路径时读取 `GHOST_CONFIG_PATH`
    pub fn load(
        config_path: Option<&str>,
        base: &WorkerConfiguration,
    ) -> GhostResult<WorkerConfiguration> {
        let from_env = env::var(CONFIG_PATH_ENV).ok();
        let path = config_path.or(from_env.as_deref());

        let mut builder = Config::builder();
        if let Some(path) = path {
            if !Path::new(path).exists() {
                return Err(GhostError::config_error(format!("配置文件不存在: {path}")));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: GhostSettings = builder.build()?.try_deserialize()?;
        base.to_builder().apply(settings.worker).build()
    }

    /// 仅从TOML字符串加载，便于测试和内嵌默认配置
    pub fn load_from_str(
        contents: &str,
        base: &WorkerConfiguration,
    ) -> GhostResult<WorkerConfiguration> {
        let settings: GhostSettings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        base.to_builder().apply(settings.worker).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn base() -> WorkerConfiguration {
        WorkerConfiguration::builder("Test Worker").build().unwrap()
    }

    #[test]
    fn test_load_from_str_overrides_timings() {
        let config = ConfigLoader::load_from_str(
            r#"
            [worker]
            max_iteration_count = 2
            stall_time_seconds = 5
            sleep_time_seconds = 100
            "#,
            &base(),
        )
        .unwrap();

        assert_eq!(config.app_name(), "Test Worker");
        assert_eq!(config.max_iteration_count(), 2);
        assert_eq!(config.stall_time(), Duration::from_secs(5));
        assert_eq!(config.sleep_time(), Duration::from_secs(100));
    }

    #[test]
    fn test_load_revalidates_name() {
        let result = ConfigLoader::load_from_str("[worker]\napp_name = \"???\"\n", &base());
        assert!(matches!(result, Err(GhostError::Configuration(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[worker]\nlog_location = \"/tmp/ghost-test.log\"").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = ConfigLoader::load(Some(&path), &base()).unwrap();
        assert_eq!(config.log_location(), "/tmp/ghost-test.log");
        assert_eq!(config.sanitized_app_name(), "test-worker");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = ConfigLoader::load(Some("/nonexistent/ghost.toml"), &base());
        assert!(matches!(result, Err(GhostError::Configuration(_))));
    }

    #[test]
    fn test_exported_toml_loads_back() {
        let original = WorkerConfiguration::builder("Exported Worker")
            .author("Jane", "jane@example.com")
            .max_iteration_count(7)
            .stall_time_seconds(1)
            .build()
            .unwrap();

        let exported = original.to_toml().unwrap();
        assert!(exported.starts_with("[worker]"));

        let loaded = ConfigLoader::load_from_str(&exported, &base()).unwrap();
        assert_eq!(loaded, original);
    }
}
