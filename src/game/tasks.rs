//! Task registry: the ordered list of routine tasks the game is built from.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Ordinal identifier of a routine task (1-based).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u8);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task {}", self.0)
    }
}

/// Reference to a task's image asset.
///
/// The asset reference is the matching identity: a draggable item belongs
/// in exactly the slot that expects the same reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    /// Creates an asset reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single routine task: identifier, display label, and image asset.
///
/// Tasks are immutable, defined once at startup, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Ordinal identifier (1-based).
    pub id: TaskId,
    /// Display label shown on the task's slot.
    pub label: String,
    /// Image asset reference, unique per task.
    pub asset: AssetRef,
}

impl Task {
    /// Creates a new task.
    pub fn new(id: u8, label: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            id: TaskId(id),
            label: label.into(),
            asset: AssetRef::new(asset),
        }
    }
}

/// Errors from registry validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RegistryError {
    /// The task list is empty.
    #[display("Task list is empty")]
    Empty,

    /// Task ids are not strictly increasing.
    #[display("Task ids must be strictly increasing: {} follows {}", _1, _0)]
    UnorderedIds(TaskId, TaskId),

    /// Two tasks share the same asset reference.
    #[display("Duplicate asset reference: {}", _0)]
    DuplicateAsset(AssetRef),

    /// The stage boundary does not split the list into two non-empty stages.
    #[display("Stage boundary {} is out of range for {} tasks", boundary, len)]
    InvalidBoundary {
        /// Requested boundary.
        boundary: usize,
        /// Number of tasks in the registry.
        len: usize,
    },
}

impl std::error::Error for RegistryError {}

/// Ordered, validated list of routine tasks.
///
/// Construction enforces the registry invariants: non-empty, ids strictly
/// increasing, asset references unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    /// Creates a registry from an ordered task list, validating it.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the list is empty, out of order, or
    /// contains duplicate asset references.
    #[instrument(skip(tasks), fields(task_count = tasks.len()))]
    pub fn new(tasks: Vec<Task>) -> Result<Self, RegistryError> {
        if tasks.is_empty() {
            return Err(RegistryError::Empty);
        }

        for pair in tasks.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(RegistryError::UnorderedIds(pair[0].id, pair[1].id));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for task in &tasks {
            if !seen.insert(&task.asset) {
                return Err(RegistryError::DuplicateAsset(task.asset.clone()));
            }
        }

        Ok(Self { tasks })
    }

    /// The daily routine shipped with the game, tasks 1 through 14.
    pub fn daily_routine() -> Self {
        Self {
            tasks: daily_routine_tasks(),
        }
    }

    /// Number of tasks in the registry.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the registry holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Splits the registry at the stage boundary: the first `boundary`
    /// tasks form stage one, the remainder form stage two.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidBoundary`] unless both halves are
    /// non-empty.
    #[instrument(skip(self), fields(task_count = self.tasks.len()))]
    pub fn partition(&self, boundary: usize) -> Result<(&[Task], &[Task]), RegistryError> {
        if boundary == 0 || boundary >= self.tasks.len() {
            return Err(RegistryError::InvalidBoundary {
                boundary,
                len: self.tasks.len(),
            });
        }
        Ok(self.tasks.split_at(boundary))
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::daily_routine()
    }
}

/// The built-in task table.
pub(crate) fn daily_routine_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "1. Get up", "assets/images/img1_get_up.jpg"),
        Task::new(2, "2. Brush the teeth", "assets/images/img2_brush_teeth.jpg"),
        Task::new(3, "3. Take bath", "assets/images/img3_take_bath.jpg"),
        Task::new(4, "4. Have breakfast", "assets/images/img4_breakfast.jpg"),
        Task::new(5, "5. Go to school", "assets/images/img5_go_to_school.jpg"),
        Task::new(6, "6. Be in class", "assets/images/img6_be_in_class.jpg"),
        Task::new(7, "7. Have lunch", "assets/images/img7_have_lunch.jpg"),
        Task::new(8, "8. Back to home", "assets/images/img8_back_to_home.jpg"),
        Task::new(9, "9. Wash hands", "assets/images/img9_wash_hands.jpg"),
        Task::new(
            10,
            "10. Play with friends",
            "assets/images/img10_play_with_friends.jpg",
        ),
        Task::new(
            11,
            "11. Do your homework",
            "assets/images/img11_do_homework.jpg",
        ),
        Task::new(12, "12. Have dinner", "assets/images/img12_have_dinner.jpg"),
        Task::new(13, "13. Read stories", "assets/images/img13_read_stories.jpg"),
        Task::new(14, "14. Go to bed", "assets/images/img14_go_to_bed.jpg"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_routine_is_valid() {
        let registry = TaskRegistry::new(daily_routine_tasks()).expect("Built-in tasks are valid");
        assert_eq!(registry.len(), 14);
        assert_eq!(registry.get(TaskId(1)).unwrap().label, "1. Get up");
        assert!(registry.get(TaskId(15)).is_none());
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(TaskRegistry::new(Vec::new()), Err(RegistryError::Empty));
    }

    #[test]
    fn test_unordered_ids_rejected() {
        let tasks = vec![
            Task::new(2, "b", "b.jpg"),
            Task::new(1, "a", "a.jpg"),
        ];
        assert!(matches!(
            TaskRegistry::new(tasks),
            Err(RegistryError::UnorderedIds(_, _))
        ));
    }

    #[test]
    fn test_duplicate_asset_rejected() {
        let tasks = vec![
            Task::new(1, "a", "same.jpg"),
            Task::new(2, "b", "same.jpg"),
        ];
        assert!(matches!(
            TaskRegistry::new(tasks),
            Err(RegistryError::DuplicateAsset(_))
        ));
    }

    #[test]
    fn test_partition_splits_at_boundary() {
        let registry = TaskRegistry::daily_routine();
        let (first, rest) = registry.partition(8).expect("Valid boundary");
        assert_eq!(first.len(), 8);
        assert_eq!(rest.len(), 6);
        assert_eq!(first[0].id, TaskId(1));
        assert_eq!(rest[0].id, TaskId(9));
        assert_eq!(rest.last().unwrap().id, TaskId(14));
    }

    #[test]
    fn test_partition_rejects_degenerate_boundaries() {
        let registry = TaskRegistry::daily_routine();
        assert!(registry.partition(0).is_err());
        assert!(registry.partition(14).is_err());
        assert!(registry.partition(20).is_err());
    }
}
