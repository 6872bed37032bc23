use crate::domain;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// DTO for creating a new task via the API
#[derive(Deserialize, Display, Validate, ToSchema)]
#[display("\"{title}\" (priority {priority})")]
#[cfg_attr(test, derive(Serialize))]
pub struct CreateTask {
    #[validate(length(min = 1))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "2%")]
    pub content: String,
    #[schema(example = 1)]
    pub priority: i32,
}

impl From<CreateTask> for domain::task::NewTask {
    fn from(value: CreateTask) -> Self {
        domain::task::NewTask {
            title: value.title,
            content: value.content,
            priority: value.priority,
        }
    }
}

/// DTO for replacing a task's content via the API. Completion is passed separately as a
/// query parameter.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct UpdateTask {
    #[validate(length(min = 1))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "whole")]
    pub content: String,
    #[schema(example = 2)]
    pub priority: i32,
}

impl UpdateTask {
    pub fn into_domain(self, completed: bool) -> domain::task::UpdateTask {
        domain::task::UpdateTask {
            title: self.title,
            content: self.content,
            priority: self.priority,
            completed,
        }
    }
}

/// DTO for a returned task on the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq, Eq))]
pub struct Task {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "2%")]
    pub content: String,
    #[schema(example = 1)]
    pub priority: i32,
    #[schema(example = false)]
    pub completed: bool,
    #[schema(example = 4)]
    pub user_id: i32,
    #[schema(example = "buy-milk")]
    pub slug: String,
}

impl From<domain::task::Task> for Task {
    fn from(value: domain::task::Task) -> Self {
        Task {
            id: value.id,
            title: value.title,
            content: value.content,
            priority: value.priority,
            completed: value.completed,
            user_id: value.owner_user_id,
            slug: value.slug,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskIdQuery {
    /// ID of the task to work with
    pub task_id: i32,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateTaskQuery {
    /// ID of the task to update
    pub task_id: i32,
    /// Whether the task is done
    pub completed: bool,
}
