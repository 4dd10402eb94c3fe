use loadrep_store::BladeKind;

/// Progress notifications emitted while a report builds. Consumers must
/// not block; the builder calls them inline.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    RunSelected { run: String, date: i64 },
    BladeStarted { blade: String, kind: BladeKind },
    BladeFinished { blade: String, samples: u64 },
}

pub type ProgressFn = std::sync::Arc<dyn Fn(ProgressEvent) + Send + Sync + 'static>;
