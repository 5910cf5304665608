//! Deferred task queue.
//!
//! Native callbacks never run application code. They enqueue a [`Task`] and
//! return; the application thread drains the queue in FIFO order, so
//! re-emission always happens after the engine's callback frame is gone.

use huddle_media_model::{FrameDescriptor, NativeEvent};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Work handed from the engine boundary to the application thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Event(NativeEvent),
    Frames(Vec<FrameDescriptor>),
}

/// Producer side, cloned into every native callback.
#[derive(Debug, Clone)]
pub struct TaskSender {
    tx: mpsc::UnboundedSender<Task>,
}

impl TaskSender {
    /// Enqueue a task. Returns `false` once the consumer is gone.
    pub fn push(&self, task: Task) -> bool {
        if self.tx.send(task).is_err() {
            tracing::trace!("Task queue closed; dropping native callback");
            return false;
        }
        true
    }
}

/// Consumer side, owned by the client.
#[derive(Debug)]
pub struct TaskReceiver {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl TaskReceiver {
    /// Next queued task without waiting.
    pub fn try_next(&mut self) -> Option<Task> {
        match self.rx.try_recv() {
            Ok(task) => Some(task),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next task. `None` once every sender is dropped and the
    /// queue is empty.
    pub async fn next(&mut self) -> Option<Task> {
        self.rx.recv().await
    }
}

/// Create a connected sender/receiver pair.
pub fn task_queue() -> (TaskSender, TaskReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TaskSender { tx }, TaskReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_across_senders() {
        let (tx, mut rx) = task_queue();
        let tx2 = tx.clone();
        tx.push(Task::Event(NativeEvent::new("a", vec![])));
        tx2.push(Task::Frames(vec![]));
        tx.push(Task::Event(NativeEvent::new("b", vec![])));

        assert_eq!(rx.try_next(), Some(Task::Event(NativeEvent::new("a", vec![]))));
        assert_eq!(rx.try_next(), Some(Task::Frames(vec![])));
        assert_eq!(rx.try_next(), Some(Task::Event(NativeEvent::new("b", vec![]))));
        assert_eq!(rx.try_next(), None);
    }

    #[test]
    fn push_after_receiver_dropped_reports_closed() {
        let (tx, rx) = task_queue();
        drop(rx);
        assert!(!tx.push(Task::Frames(vec![])));
    }

    #[tokio::test]
    async fn next_ends_when_senders_drop() {
        let (tx, mut rx) = task_queue();
        tx.push(Task::Frames(vec![]));
        drop(tx);
        assert!(rx.next().await.is_some());
        assert!(rx.next().await.is_none());
    }
}
