//! Puerto hacia la cola de ejecución externa.
//!
//! El core sólo entrega descriptores; el transporte (REDCap, disco, lo que
//! sea) es del consumidor.

use crate::errors::QueueError;
use crate::model::TaskDescriptor;

pub trait TaskQueue {
    fn submit(&mut self, task: TaskDescriptor) -> Result<(), QueueError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTaskQueue {
    submitted: Vec<TaskDescriptor>,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> &[TaskDescriptor] {
        &self.submitted
    }

    pub fn len(&self) -> usize {
        self.submitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty()
    }
}

impl TaskQueue for InMemoryTaskQueue {
    fn submit(&mut self, task: TaskDescriptor) -> Result<(), QueueError> {
        self.submitted.push(task);
        Ok(())
    }
}
