use crate::domain;
use crate::domain::slug::slugify;
use crate::domain::task::driven_ports::{TaskReader, TaskWriter};
use crate::domain::task::driving_ports::TaskError;
use crate::external_connections::{
    ExternalConnectivity, TransactableExternalConnectivity, TransactionHandle,
};
use anyhow::Context;
use tracing::{info, warn};

/// A unit of work owned by a user. `slug` is fixed when the task is created and never follows
/// later title changes.
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Task {
    pub id: i32,
    pub owner_user_id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub priority: i32,
    pub completed: bool,
}

#[cfg_attr(test, derive(Clone, Debug))]
pub struct NewTask {
    pub title: String,
    pub content: String,
    pub priority: i32,
}

/// Replacement values for a task's mutable fields
#[cfg_attr(test, derive(Clone, Debug))]
pub struct UpdateTask {
    pub title: String,
    pub content: String,
    pub priority: i32,
    pub completed: bool,
}

pub mod driven_ports {
    use super::*;

    pub trait TaskReader: Sync {
        /// Every stored task, ordered by ID
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Task>, anyhow::Error>;
        async fn task_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Task>, anyhow::Error>;
        async fn tasks_for_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Task>, anyhow::Error>;
    }

    pub trait TaskWriter: Sync {
        /// Stores a new, incomplete task and returns its ID
        async fn create_task_for_user(
            &self,
            user_id: i32,
            new_task: &NewTask,
            slug: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;

        async fn update_task(
            &self,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;

        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::domain::user::driven_ports::DetectUser;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TaskError {
        #[error("No such user")]
        UserDoesNotExist,
        #[error("No such task")]
        TaskDoesNotExist,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    impl From<domain::user::UserExistsErr> for TaskError {
        fn from(value: domain::user::UserExistsErr) -> Self {
            match value {
                domain::user::UserExistsErr::UserDoesNotExist(user_id) => {
                    warn!("User {user_id} didn't exist when working with tasks.");
                    TaskError::UserDoesNotExist
                }
                domain::user::UserExistsErr::PortError(err) => {
                    TaskError::from(err.context("Verifying task owner"))
                }
            }
        }
    }


    pub trait TaskPort {
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl TaskReader,
        ) -> Result<Vec<Task>, TaskError>;
        async fn task_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl TaskReader,
        ) -> Result<Task, TaskError>;
        async fn tasks_for_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_read: &impl TaskReader,
        ) -> Result<Vec<Task>, TaskError>;
        async fn create_task_for_user(
            &self,
            user_id: i32,
            task: &NewTask,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            u_detect: &impl DetectUser,
            task_write: &impl TaskWriter,
        ) -> Result<i32, TaskError>;
        async fn update_task(
            &self,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            task_read: &impl TaskReader,
            task_write: &impl TaskWriter,
        ) -> Result<(), TaskError>;
        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            task_read: &impl TaskReader,
            task_write: &impl TaskWriter,
        ) -> Result<(), TaskError>;
    }
}

/// Fails with [TaskError::TaskDoesNotExist] unless the task is stored. Runs before any write
/// so a missing task never leaves partial changes behind.
async fn verify_task_exists(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_read: &impl TaskReader,
) -> Result<(), TaskError> {
    let task = task_read
        .task_by_id(task_id, ext_cxn)
        .await
        .context("Checking that a task exists")?;

    match task {
        Some(_) => Ok(()),
        None => Err(TaskError::TaskDoesNotExist),
    }
}

pub struct TaskService {}

impl driving_ports::TaskPort for TaskService {
    async fn all_tasks(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<Vec<Task>, TaskError> {
        let tasks = task_read
            .all_tasks(ext_cxn)
            .await
            .context("Fetching all tasks")?;

        Ok(tasks)
    }

    async fn task_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<Task, TaskError> {
        task_read
            .task_by_id(task_id, ext_cxn)
            .await
            .context("Fetching a task by ID")?
            .ok_or(TaskError::TaskDoesNotExist)
    }

    async fn tasks_for_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl domain::user::driven_ports::DetectUser,
        task_read: &impl TaskReader,
    ) -> Result<Vec<Task>, TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let tasks = task_read
            .tasks_for_user(user_id, &mut *ext_cxn)
            .await
            .context("Fetching a user's tasks")?;

        Ok(tasks)
    }

    async fn create_task_for_user(
        &self,
        user_id: i32,
        task: &NewTask,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        u_detect: &impl domain::user::driven_ports::DetectUser,
        task_write: &impl TaskWriter,
    ) -> Result<i32, TaskError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("Opening transaction for task creation")?;

        domain::user::verify_user_exists(user_id, &mut txn, u_detect).await?;
        let slug = slugify(&task.title);
        let created_task_id = task_write
            .create_task_for_user(user_id, task, &slug, &mut txn)
            .await
            .context("Inserting a new task")?;
        txn.commit().await.context("Committing new task")?;

        info!(task_id = created_task_id, user_id, %slug, "Created task");
        Ok(created_task_id)
    }

    async fn update_task(
        &self,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        task_read: &impl TaskReader,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("Opening transaction for task update")?;

        verify_task_exists(task_id, &mut txn, task_read).await?;
        task_write
            .update_task(task_id, update, &mut txn)
            .await
            .context("Updating a task")?;
        txn.commit().await.context("Committing task update")?;

        Ok(())
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        task_read: &impl TaskReader,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("Opening transaction for task removal")?;

        verify_task_exists(task_id, &mut txn, task_read).await?;
        task_write
            .delete_task(task_id, &mut txn)
            .await
            .context("Deleting a task")?;
        txn.commit().await.context("Committing task removal")?;

        Ok(())
    }
}
