use serde::{Deserialize, Serialize};

/// A bot user, identified externally by their Telegram id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub tg_id: Option<i64>,
}

/// A task owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// Owning `User.id`
    pub user: i64,
}

/// New user input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub tg_id: Option<i64>,
}

impl NewUser {
    pub fn new(tg_id: i64) -> Self {
        Self { tg_id: Some(tg_id) }
    }
}

/// New task input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub user: i64,
}

impl NewTask {
    /// An open task for `user`.
    pub fn new(title: impl Into<String>, user: i64) -> Self {
        Self {
            title: title.into(),
            completed: false,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_defaults_to_open() {
        let task = NewTask::new("Buy milk", 1);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.user, 1);
    }

    #[test]
    fn test_new_user() {
        assert_eq!(NewUser::new(12345).tg_id, Some(12345));
        assert_eq!(NewUser::default().tg_id, None);
    }
}
