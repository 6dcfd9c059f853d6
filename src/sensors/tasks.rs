use std::collections::HashMap;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::warn;

use super::backend::{StreamKind, SubscriptionHandle};

/// Background tasks backing the live subscriptions of one sensor
pub(crate) struct SubscriptionTasks {
    kind: StreamKind,
    tasks: HashMap<SubscriptionHandle, JoinHandle<()>>,
}

impl SubscriptionTasks {
    pub(crate) fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            tasks: HashMap::new(),
        }
    }

    /// Spawn `task` and hand back the handle that cancels it
    pub(crate) fn spawn<F>(&mut self, task: F) -> SubscriptionHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = SubscriptionHandle::new(self.kind);
        self.tasks.insert(handle, tokio::spawn(task));
        handle
    }

    /// Abort the task behind `handle`. Returns `false` for unknown handles.
    pub(crate) fn cancel(&mut self, handle: SubscriptionHandle) -> bool {
        match self.tasks.remove(&handle) {
            Some(task) => {
                task.abort();
                true
            }
            None => {
                warn!("Unsubscribe for unknown {} subscription {}", self.kind, handle);
                false
            }
        }
    }
}

impl Drop for SubscriptionTasks {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
