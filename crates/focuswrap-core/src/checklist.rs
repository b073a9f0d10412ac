//! Per-item completion state for a plan's checklist.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Checklist items paired with a parallel completion vector.
///
/// The item list is fixed at construction; only completion flags change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistTracker {
    items: Vec<String>,
    completed: Vec<bool>,
}

impl ChecklistTracker {
    pub fn new(items: Vec<String>) -> Self {
        let completed = vec![false; items.len()];
        Self { items, completed }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn completed(&self) -> &[bool] {
        &self.completed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_done(&self, index: usize) -> Option<bool> {
        self.completed.get(index).copied()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    /// Flip item `index` and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexOutOfRange`] if `index >= len()`.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.completed.len();
        let slot = self
            .completed
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        *slot = !*slot;
        Ok(*slot)
    }

    /// Fraction of items completed; 0.0 for an empty checklist.
    pub fn completion_ratio(&self) -> f64 {
        if self.completed.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.completed.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(n: usize) -> ChecklistTracker {
        ChecklistTracker::new((0..n).map(|i| format!("task {i}")).collect())
    }

    #[test]
    fn empty_checklist_ratio_is_zero() {
        let empty = ChecklistTracker::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.completion_ratio(), 0.0);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut list = tracker(3);
        assert_eq!(list.toggle(1).unwrap(), true);
        assert_eq!(list.is_done(1), Some(true));
        assert_eq!(list.toggle(1).unwrap(), false);
        assert_eq!(list.completed(), [false, false, false]);
    }

    #[test]
    fn toggle_out_of_range_fails() {
        let mut list = tracker(2);
        match list.toggle(2) {
            Err(CoreError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
        assert_eq!(list.completed_count(), 0);
    }

    #[test]
    fn ratio_counts_completed_items() {
        let mut list = tracker(4);
        list.toggle(0).unwrap();
        list.toggle(3).unwrap();
        assert_eq!(list.completed_count(), 2);
        assert!((list.completion_ratio() - 0.5).abs() < f64::EPSILON);
    }
}
