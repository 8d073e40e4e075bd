//! Scoped structured context.
//!
//! A [`LogContext`] is a stack of frames; each frame is a set of properties pushed
//! together. Pushing returns a [`ContextGuard`] that pops the frame when dropped, so
//! frames unwind in reverse order even when the guarded code panics.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

/// A single structured key/value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Value,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

type Frame = Vec<Property>;

/// Stack of context frames owned by one logger.
#[derive(Debug, Default)]
pub struct LogContext {
    frames: Mutex<Vec<Frame>>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic elsewhere must not leave the stack unusable.
    fn frames(&self) -> MutexGuard<'_, Vec<Frame>> {
        self.frames.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pushes one frame holding all `properties`.
    pub fn push<I>(&self, properties: I) -> ContextGuard<'_>
    where
        I: IntoIterator<Item = Property>,
    {
        let mut frames = self.frames();
        let depth = frames.len();
        frames.push(properties.into_iter().collect());
        ContextGuard {
            context: self,
            depth,
        }
    }

    /// Number of frames currently pushed.
    pub fn depth(&self) -> usize {
        self.frames().len()
    }

    /// All properties in push order, outermost frame first.
    pub fn snapshot(&self) -> Vec<Property> {
        self.frames().iter().flatten().cloned().collect()
    }
}

/// Pops its frame (and anything pushed after it) on drop.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ContextGuard<'a> {
    context: &'a LogContext,
    depth: usize,
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.context.frames().truncate(self.depth);
    }
}
