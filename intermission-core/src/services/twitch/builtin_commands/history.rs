use std::collections::VecDeque;

/// Fixed-capacity buffer of recent outputs. Oldest entries fall off first.
#[derive(Debug, Clone)]
pub struct RecentOutputHistory {
    items: VecDeque<String>,
    capacity: usize,
}

impl RecentOutputHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item.into());
    }

    /// Oldest first, newline separated. Empty string when nothing was recorded.
    pub fn joined(&self) -> String {
        self.items.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}
