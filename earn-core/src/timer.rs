use crate::mount::Mounted;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A one-shot delayed action tied to the lifetime of whoever holds it.
///
/// Dropping the task aborts it. Must be created from within a Tokio runtime.
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn after<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Default)]
struct FlagState {
    raised: bool,
    generation: u64,
}

/// A flag that lowers itself after a fixed window.
///
/// Used for celebration effects and short-lived acknowledgements. Raising an
/// already raised flag restarts the window.
pub struct TransientFlag {
    state: Mounted<FlagState>,
    lower_task: Option<ScheduledTask>,
}

impl TransientFlag {
    pub fn new() -> Self {
        Self {
            state: Mounted::new(FlagState::default()),
            lower_task: None,
        }
    }

    pub fn raise(&mut self, window: Duration) {
        let generation = self.state.update(|s| {
            s.raised = true;
            s.generation += 1;
            s.generation
        });

        let handle = self.state.handle();
        self.lower_task = Some(ScheduledTask::after(window, move || {
            handle.update_if_mounted(|s| {
                // a later raise owns the flag now
                if s.generation == generation {
                    s.raised = false;
                }
            });
        }));
    }

    pub fn lower(&mut self) {
        self.lower_task = None;
        self.state.update(|s| s.raised = false);
    }

    pub fn is_raised(&self) -> bool {
        self.state.read(|s| s.raised)
    }
}

impl Default for TransientFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_task_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let task = ScheduledTask::after(Duration::from_millis(300), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_task_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let task = ScheduledTask::after(Duration::from_millis(300), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(task);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flag_lowers_after_window() {
        let mut flag = TransientFlag::new();
        flag.raise(Duration::from_secs(3));
        assert!(flag.is_raised());

        tokio::time::sleep(Duration::from_millis(3010)).await;
        assert!(!flag.is_raised());
    }

    #[tokio::test(start_paused = true)]
    async fn test_raising_again_restarts_window() {
        let mut flag = TransientFlag::new();
        flag.raise(Duration::from_secs(3));

        tokio::time::sleep(Duration::from_secs(2)).await;
        flag.raise(Duration::from_secs(3));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(flag.is_raised());

        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert!(!flag.is_raised());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lower_cancels_pending_window() {
        let mut flag = TransientFlag::new();
        flag.raise(Duration::from_secs(2));
        flag.lower();

        assert!(!flag.is_raised());
    }
}
