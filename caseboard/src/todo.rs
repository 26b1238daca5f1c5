use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub task: String,
    #[serde(default)]
    pub done: bool,
}

/// The board's task list. Indices are positions in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_items(items: Vec<TodoItem>) -> Self {
        TodoList { items }
    }

    /// Appends a pending task; blank text is ignored.
    pub fn add(&mut self, task: &str) -> Option<usize> {
        let task = task.trim();
        if task.is_empty() {
            return None;
        }
        self.items.push(TodoItem {
            task: task.to_string(),
            done: false,
        });
        Some(self.items.len() - 1)
    }

    /// Replaces a task's text, keeping its completion state.
    pub fn edit(&mut self, index: usize, task: &str) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.task = task.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<TodoItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Flips completion and returns the new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.done = !item.done;
        if item.done {
            info!(task = %item.task, "task completed");
        }
        Some(item.done)
    }

    /// Appends suggestions, skipping blanks and tasks already on the list.
    pub fn extend_suggestions<I, S>(&mut self, suggestions: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for s in suggestions {
            let s = s.as_ref().trim();
            if s.is_empty() || self.items.iter().any(|i| i.task == s) {
                continue;
            }
            self.add(s);
            added += 1;
        }
        added
    }

    pub fn pending(&self) -> impl Iterator<Item = (usize, &TodoItem)> {
        self.items.iter().enumerate().filter(|(_, i)| !i.done)
    }

    pub fn completed(&self) -> impl Iterator<Item = (usize, &TodoItem)> {
        self.items.iter().enumerate().filter(|(_, i)| i.done)
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_moves_between_views() {
        let mut todo = TodoList::new();
        let a = todo.add("canvass neighbours").unwrap();
        todo.add("pull phone records");
        assert_eq!(todo.add("   "), None);
        assert_eq!(todo.toggle(a), Some(true));
        assert_eq!(todo.pending().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);
        assert_eq!(todo.completed().map(|(i, _)| i).collect::<Vec<_>>(), vec![0]);
        assert_eq!(todo.toggle(a), Some(false));
        assert_eq!(todo.toggle(9), None);
    }

    #[test]
    fn edit_keeps_done_flag() {
        let mut todo = TodoList::new();
        let i = todo.add("x").unwrap();
        todo.toggle(i);
        assert!(todo.edit(i, " y "));
        assert_eq!(todo.items()[0], TodoItem { task: "y".into(), done: true });
        assert!(!todo.edit(3, "z"));
        assert_eq!(todo.remove(0).map(|t| t.task), Some("y".to_string()));
        assert_eq!(todo.remove(0), None);
    }

    #[test]
    fn suggestions_skip_duplicates() {
        let mut todo = TodoList::new();
        todo.add("check CCTV");
        let added = todo.extend_suggestions(["check CCTV", "", "interview witness"]);
        assert_eq!(added, 1);
        assert_eq!(todo.len(), 2);
    }
}
