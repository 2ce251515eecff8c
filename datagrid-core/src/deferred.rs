//! Mutations postponed out of listener callbacks.
//!
//! A cursor listener must not write to the table it is observing. When it
//! needs to, it pushes a task onto a [`DeferredQueue`]; the owner drains the
//! queue against the table on its next tick, after the current dispatch has
//! finished.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::error::DataError;
use crate::table::DataTable;

/// A mutation to run against a table later.
pub type DeferredTask = Box<dyn FnOnce(&mut DataTable) -> Result<(), DataError> + Send>;

/// Shared FIFO of deferred table mutations.
///
/// Cloning the queue shares the same underlying storage, so a clone can be
/// moved into a listener closure.
#[derive(Clone, Default)]
pub struct DeferredQueue {
    tasks: Arc<Mutex<VecDeque<DeferredTask>>>,
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.len())
            .finish()
    }
}

impl DeferredQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a mutation.
    pub fn push(
        &self,
        task: impl FnOnce(&mut DataTable) -> Result<(), DataError> + Send + 'static,
    ) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push_back(Box::new(task));
        }
    }

    /// Returns the number of queued mutations.
    pub fn len(&self) -> usize {
        self.tasks.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every queued mutation against the table, in queue order.
    ///
    /// Tasks queued while draining (by listeners reacting to these
    /// mutations) wait for the next drain. Failed tasks are logged and
    /// returned; they do not stop the remaining tasks.
    pub fn drain_into(&self, table: &mut DataTable) -> Vec<DataError> {
        let batch: Vec<DeferredTask> = match self.tasks.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(_) => return Vec::new(),
        };

        if !batch.is_empty() {
            debug!("Running {} deferred mutation(s) on {}", batch.len(), table.id());
        }

        let mut errors = Vec::new();
        for task in batch {
            if let Err(e) = task(table) {
                warn!("Deferred mutation failed: {}", e);
                errors.push(e);
            }
        }
        errors
    }
}
