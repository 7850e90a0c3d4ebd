//! Fire-and-forget progress reporting for execute steps.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started(String),
    Succeeded(String),
    Failed(String),
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}
