pub mod speaker;

use ghost_worker::{Worker, WorkerRegistry};

pub use speaker::{Greeter, SpeakerWorker};

/// 内置Worker注册表
pub fn registry() -> WorkerRegistry {
    WorkerRegistry::new().with(SpeakerWorker::TYPE_NAME, || {
        Ok(Box::new(SpeakerWorker::new(Greeter::default())?) as Box<dyn Worker>)
    })
}
