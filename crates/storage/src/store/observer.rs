#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Planned { buttons: usize, layouts: usize },
    HomeButtonCopied,
    HomeButtonPresent,
    ButtonsWritten { written: usize, total: usize },
    Finalized,
}

/// Side channel for a generation run. Observers cannot change what gets written, only ask the
/// run to stop; a stopped run rolls back.
pub trait RunObserver {
    fn on_progress(&mut self, _event: ProgressEvent) {}

    fn should_abort(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
