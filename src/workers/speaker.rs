use std::io::Write;

use anyhow::Context;
use async_trait::async_trait;
use ghost_core::{log_context, GhostResult, Logger, WorkerConfiguration};
use ghost_worker::{Signal, Worker, WorkerBase};

/// 示例服务：返回一句问候
#[derive(Debug, Clone)]
pub struct Greeter {
    phrase: String,
}

impl Greeter {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
        }
    }

    pub fn speak(&self) -> &str {
        &self.phrase
    }
}

impl Default for Greeter {
    fn default() -> Self {
        Self::new("Boo!")
    }
}

/// 示例Worker：说一次话之后失效
///
/// 可以通过 `--arg phrase=...` 替换问候语。
pub struct SpeakerWorker {
    base: WorkerBase,
    greeter: Greeter,
    spoken: bool,
    out: Box<dyn Write + Send>,
}

impl SpeakerWorker {
    pub const TYPE_NAME: &'static str = "speaker";

    pub fn new(greeter: Greeter) -> GhostResult<Self> {
        Self::with_output(greeter, Box::new(std::io::stdout()))
    }

    pub fn with_output(greeter: Greeter, out: Box<dyn Write + Send>) -> GhostResult<Self> {
        let configuration = WorkerConfiguration::builder("Speaker Worker")
            .app_description("Says one thing and goes back to sleep")
            .build()?;
        Ok(Self {
            base: WorkerBase::new(configuration),
            greeter,
            spoken: false,
            out,
        })
    }

    fn say(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{line}").context("写入输出失败")?;
        self.out.flush().context("写入输出失败")
    }
}

#[async_trait]
impl Worker for SpeakerWorker {
    fn base(&self) -> &WorkerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WorkerBase {
        &mut self.base
    }

    fn is_valid(&self) -> bool {
        !self.spoken
    }

    async fn start_up(&mut self) -> anyhow::Result<()> {
        self.say("Starting")
    }

    async fn wake(&mut self) -> anyhow::Result<()> {
        self.say("Waking")
    }

    async fn execute(&mut self) -> anyhow::Result<Signal> {
        self.say("Executing")?;

        let phrase = self
            .base
            .argument("phrase")
            .unwrap_or_else(|| self.greeter.speak())
            .to_string();
        self.say(&phrase)?;
        if let Some(logger) = self.logger() {
            logger.notice("Speaker spoke", log_context! { "phrase" => phrase });
        }

        self.spoken = true;
        Ok(Signal::Die)
    }

    async fn sleep(&mut self) -> anyhow::Result<()> {
        self.say("Sleeping")
    }

    async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.say("Shutting Down")
    }
}
