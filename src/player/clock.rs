use std::{
    collections::HashMap,
    time::Duration,
};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
};

use super::state::TimerId;

/// Something that can call back after a delay. Disarming a timer that has
/// already fired, or was never armed, does nothing.
pub trait Clock {
    fn arm(&mut self, timer: TimerId, after: Duration);
    fn disarm(&mut self, timer: TimerId);
}

/// Virtual time. Nothing fires until the owner advances it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    armed: Vec<(Duration, TimerId)>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Removes the earliest timer due at or before `until` and moves the
    /// clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (index, _) = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| *due <= until)
            .min_by_key(|(_, (due, timer))| (*due, *timer))?;

        let (due, timer) = self.armed.remove(index);
        self.now = due;
        Some(timer)
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Clock for ManualClock {
    fn arm(&mut self, timer: TimerId, after: Duration) {
        self.armed.push((self.now + after, timer));
    }

    fn disarm(&mut self, timer: TimerId) {
        self.armed.retain(|(_, t)| *t != timer);
    }
}

/// Real time on the tokio runtime. Each armed timer is a sleeping task that
/// reports its id on the channel returned by [`TokioClock::new`].
pub struct TokioClock {
    sender: mpsc::UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioClock {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender, tasks: HashMap::new() }, receiver)
    }
}

impl Clock for TokioClock {
    fn arm(&mut self, timer: TimerId, after: Duration) {
        self.tasks.retain(|_, task| !task.is_finished());

        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = sender.send(timer);
        });
        self.tasks.insert(timer, task);
    }

    fn disarm(&mut self, timer: TimerId) {
        if let Some(task) = self.tasks.remove(&timer) {
            task.abort();
        }
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
