use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{GhostError, GhostResult};

pub const DEFAULT_MAX_ITERATION_COUNT: u32 = 4;
pub const DEFAULT_STALL_TIME_SECONDS: u64 = 15;
pub const DEFAULT_SLEEP_TIME_SECONDS: u64 = 3600;
pub const DEFAULT_MEMORY_LIMIT: &str = "128M";

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid name pattern"));
static UNWANTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-a-z0-9_]+").expect("valid name pattern"));

/// 将应用名称转换为可安全用于文件系统的名称
///
/// 非字母数字字符替换为 `-`，转写为ASCII并转为小写，最后移除所有
/// 非单词字符。结果为空时返回配置错误。
pub fn sanitize_app_name(app_name: &str) -> GhostResult<String> {
    let dashed = NON_ALNUM.replace_all(app_name, "-");
    let trimmed = dashed.trim_matches('-');
    let ascii = deunicode::deunicode(trimmed).to_lowercase();
    let cleaned = UNWANTED.replace_all(&ascii, "");
    // 转写可能在首尾留下 `-`
    let sanitized = cleaned.trim_matches('-').to_string();

    if sanitized.is_empty() {
        return Err(GhostError::config_error(format!(
            "不安全的应用名称: \"{app_name}\""
        )));
    }
    Ok(sanitized)
}

/// Worker配置
///
/// 通过 [`WorkerConfigurationBuilder`] 构建，构建完成后不可变。名称在构建时
/// 立即校验，因此 `sanitized_app_name` 在整个生命周期内都是非空且安全的。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerConfiguration {
    app_name: String,
    sanitized_app_name: String,
    app_description: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    sys_max_execution_time: Option<u64>,
    sys_max_input_time: Option<u64>,
    sys_memory_limit: String,
    run_as_uid: Option<u32>,
    run_as_gid: Option<u32>,
    log_location: Option<String>,
    pid_location: Option<String>,
    max_iteration_count: u32,
    stall_time_seconds: u64,
    sleep_time_seconds: u64,
    use_pear_style_daemon: bool,
}

impl WorkerConfiguration {
    pub fn builder(app_name: impl Into<String>) -> WorkerConfigurationBuilder {
        WorkerConfigurationBuilder::new(app_name)
    }

    /// 以当前配置为基础重新构建
    pub fn to_builder(&self) -> WorkerConfigurationBuilder {
        WorkerConfigurationBuilder {
            app_name: self.app_name.clone(),
            app_description: self.app_description.clone(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            sys_max_execution_time: self.sys_max_execution_time,
            sys_max_input_time: self.sys_max_input_time,
            sys_memory_limit: self.sys_memory_limit.clone(),
            run_as_uid: self.run_as_uid,
            run_as_gid: self.run_as_gid,
            log_location: self.log_location.clone(),
            pid_location: self.pid_location.clone(),
            max_iteration_count: self.max_iteration_count,
            stall_time_seconds: self.stall_time_seconds,
            sleep_time_seconds: self.sleep_time_seconds,
            use_pear_style_daemon: self.use_pear_style_daemon,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn sanitized_app_name(&self) -> &str {
        &self.sanitized_app_name
    }
    pub fn app_description(&self) -> Option<&str> {
        self.app_description.as_deref()
    }
    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }
    pub fn author_email(&self) -> Option<&str> {
        self.author_email.as_deref()
    }
    pub fn sys_max_execution_time(&self) -> Option<u64> {
        self.sys_max_execution_time
    }
    pub fn sys_max_input_time(&self) -> Option<u64> {
        self.sys_max_input_time
    }
    pub fn sys_memory_limit(&self) -> &str {
        &self.sys_memory_limit
    }
    pub fn run_as_uid(&self) -> Option<u32> {
        self.run_as_uid
    }
    pub fn run_as_gid(&self) -> Option<u32> {
        self.run_as_gid
    }

    /// 日志文件路径，未设置时为 `/var/log/<sanitized_app_name>.log`
    pub fn log_location(&self) -> String {
        self.log_location
            .clone()
            .unwrap_or_else(|| format!("/var/log/{}.log", self.sanitized_app_name))
    }

    /// PID文件路径，未设置时为 `/var/run/<name>/<name>.pid`
    pub fn pid_location(&self) -> String {
        self.pid_location.clone().unwrap_or_else(|| {
            format!(
                "/var/run/{name}/{name}.pid",
                name = self.sanitized_app_name
            )
        })
    }

    pub fn max_iteration_count(&self) -> u32 {
        self.max_iteration_count
    }
    pub fn stall_time(&self) -> Duration {
        Duration::from_secs(self.stall_time_seconds)
    }
    pub fn sleep_time(&self) -> Duration {
        Duration::from_secs(self.sleep_time_seconds)
    }
    pub fn use_pear_style_daemon(&self) -> bool {
        self.use_pear_style_daemon
    }

    /// 转发给守护进程控制器的选项集合
    pub fn to_daemon_options(&self) -> DaemonOptions {
        DaemonOptions {
            use_pear_style_daemon: self.use_pear_style_daemon,
            app_name: self.app_name.clone(),
            sanitized_app_name: self.sanitized_app_name.clone(),
            app_description: self.app_description.clone(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            sys_max_execution_time: self.sys_max_execution_time,
            sys_max_input_time: self.sys_max_input_time,
            sys_memory_limit: self.sys_memory_limit.clone(),
            run_as_uid: self.run_as_uid,
            run_as_gid: self.run_as_gid,
            log_location: self.log_location(),
            pid_location: self.pid_location(),
            app_dir: None,
        }
    }

    /// 以 `[worker]` 段输出TOML，可直接作为配置文件加载
    pub fn to_toml(&self) -> GhostResult<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            worker: &'a WorkerConfiguration,
        }

        toml::to_string(&Document { worker: self })
            .map_err(|e| GhostError::config_error(format!("序列化配置失败: {e}")))
    }
}

/// Fluent builder for [`WorkerConfiguration`]
#[derive(Debug, Clone)]
pub struct WorkerConfigurationBuilder {
    app_name: String,
    app_description: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    sys_max_execution_time: Option<u64>,
    sys_max_input_time: Option<u64>,
    sys_memory_limit: String,
    run_as_uid: Option<u32>,
    run_as_gid: Option<u32>,
    log_location: Option<String>,
    pid_location: Option<String>,
    max_iteration_count: u32,
    stall_time_seconds: u64,
    sleep_time_seconds: u64,
    use_pear_style_daemon: bool,
}

impl WorkerConfigurationBuilder {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_description: None,
            author_name: None,
            author_email: None,
            sys_max_execution_time: None,
            sys_max_input_time: None,
            sys_memory_limit: DEFAULT_MEMORY_LIMIT.to_string(),
            run_as_uid: None,
            run_as_gid: None,
            log_location: None,
            pid_location: None,
            max_iteration_count: DEFAULT_MAX_ITERATION_COUNT,
            stall_time_seconds: DEFAULT_STALL_TIME_SECONDS,
            sleep_time_seconds: DEFAULT_SLEEP_TIME_SECONDS,
            use_pear_style_daemon: false,
        }
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
    pub fn app_description(mut self, description: impl Into<String>) -> Self {
        self.app_description = Some(description.into());
        self
    }
    pub fn author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self.author_email = Some(email.into());
        self
    }
    pub fn sys_max_execution_time(mut self, seconds: u64) -> Self {
        self.sys_max_execution_time = Some(seconds);
        self
    }
    pub fn sys_max_input_time(mut self, seconds: u64) -> Self {
        self.sys_max_input_time = Some(seconds);
        self
    }
    pub fn sys_memory_limit(mut self, limit: impl Into<String>) -> Self {
        self.sys_memory_limit = limit.into();
        self
    }
    pub fn run_as(mut self, uid: u32, gid: u32) -> Self {
        self.run_as_uid = Some(uid);
        self.run_as_gid = Some(gid);
        self
    }
    pub fn log_location(mut self, path: impl Into<String>) -> Self {
        self.log_location = Some(path.into());
        self
    }
    pub fn pid_location(mut self, path: impl Into<String>) -> Self {
        self.pid_location = Some(path.into());
        self
    }
    pub fn max_iteration_count(mut self, count: u32) -> Self {
        self.max_iteration_count = count;
        self
    }
    pub fn stall_time_seconds(mut self, seconds: u64) -> Self {
        self.stall_time_seconds = seconds;
        self
    }
    pub fn sleep_time_seconds(mut self, seconds: u64) -> Self {
        self.sleep_time_seconds = seconds;
        self
    }
    pub fn use_pear_style_daemon(mut self, enabled: bool) -> Self {
        self.use_pear_style_daemon = enabled;
        self
    }

    pub(crate) fn apply(mut self, settings: WorkerSettings) -> Self {
        if let Some(app_name) = settings.app_name {
            self.app_name = app_name;
        }
        if settings.app_description.is_some() {
            self.app_description = settings.app_description;
        }
        if settings.author_name.is_some() {
            self.author_name = settings.author_name;
        }
        if settings.author_email.is_some() {
            self.author_email = settings.author_email;
        }
        if settings.sys_max_execution_time.is_some() {
            self.sys_max_execution_time = settings.sys_max_execution_time;
        }
        if settings.sys_max_input_time.is_some() {
            self.sys_max_input_time = settings.sys_max_input_time;
        }
        if let Some(limit) = settings.sys_memory_limit {
            self.sys_memory_limit = limit;
        }
        if settings.run_as_uid.is_some() {
            self.run_as_uid = settings.run_as_uid;
        }
        if settings.run_as_gid.is_some() {
            self.run_as_gid = settings.run_as_gid;
        }
        if settings.log_location.is_some() {
            self.log_location = settings.log_location;
        }
        if settings.pid_location.is_some() {
            self.pid_location = settings.pid_location;
        }
        if let Some(count) = settings.max_iteration_count {
            self.max_iteration_count = count;
        }
        if let Some(seconds) = settings.stall_time_seconds {
            self.stall_time_seconds = seconds;
        }
        if let Some(seconds) = settings.sleep_time_seconds {
            self.sleep_time_seconds = seconds;
        }
        if let Some(enabled) = settings.use_pear_style_daemon {
            self.use_pear_style_daemon = enabled;
        }
        self
    }

    pub fn build(self) -> GhostResult<WorkerConfiguration> {
        let sanitized_app_name = sanitize_app_name(&self.app_name)?;
        if self.max_iteration_count == 0 {
            return Err(GhostError::config_error(
                "max_iteration_count must be greater than 0",
            ));
        }

        Ok(WorkerConfiguration {
            app_name: self.app_name,
            sanitized_app_name,
            app_description: self.app_description,
            author_name: self.author_name,
            author_email: self.author_email,
            sys_max_execution_time: self.sys_max_execution_time,
            sys_max_input_time: self.sys_max_input_time,
            sys_memory_limit: self.sys_memory_limit,
            run_as_uid: self.run_as_uid,
            run_as_gid: self.run_as_gid,
            log_location: self.log_location,
            pid_location: self.pid_location,
            max_iteration_count: self.max_iteration_count,
            stall_time_seconds: self.stall_time_seconds,
            sleep_time_seconds: self.sleep_time_seconds,
            use_pear_style_daemon: self.use_pear_style_daemon,
        })
    }
}

/// 外部配置源（文件、环境变量）中可覆盖的字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerSettings {
    pub app_name: Option<String>,
    pub app_description: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub sys_max_execution_time: Option<u64>,
    pub sys_max_input_time: Option<u64>,
    pub sys_memory_limit: Option<String>,
    pub run_as_uid: Option<u32>,
    pub run_as_gid: Option<u32>,
    pub log_location: Option<String>,
    pub pid_location: Option<String>,
    pub max_iteration_count: Option<u32>,
    pub stall_time_seconds: Option<u64>,
    pub sleep_time_seconds: Option<u64>,
    pub use_pear_style_daemon: Option<bool>,
}

/// 守护进程选项，字段与 [`WorkerConfiguration`] 一一对应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaemonOptions {
    pub use_pear_style_daemon: bool,
    pub app_name: String,
    pub sanitized_app_name: String,
    pub app_description: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub sys_max_execution_time: Option<u64>,
    pub sys_max_input_time: Option<u64>,
    pub sys_memory_limit: String,
    pub run_as_uid: Option<u32>,
    pub run_as_gid: Option<u32>,
    pub log_location: String,
    pub pid_location: String,
    pub app_dir: Option<PathBuf>,
}

impl DaemonOptions {
    pub fn with_app_dir(mut self, app_dir: impl Into<PathBuf>) -> Self {
        self.app_dir = Some(app_dir.into());
        self
    }
}
