use crate::domain;
use crate::domain::task::{NewTask, Task, UpdateTask};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

pub struct DbTaskReader;

#[derive(FromRow)]
struct TaskRow {
    id: i32,
    user_id: i32,
    title: String,
    slug: String,
    content: String,
    priority: i32,
    completed: bool,
}

impl From<TaskRow> for Task {
    fn from(value: TaskRow) -> Self {
        Task {
            id: value.id,
            owner_user_id: value.user_id,
            title: value.title,
            slug: value.slug,
            content: value.content,
            priority: value.priority,
            completed: value.completed,
        }
    }
}

impl domain::task::driven_ports::TaskReader for DbTaskReader {
    async fn all_tasks(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Task>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks: Vec<Task> = query_as::<_, TaskRow>(
            "SELECT t.id, t.user_id, t.title, t.slug, t.content, t.priority, t.completed \
             FROM tasks t ORDER BY t.id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all tasks")?
        .into_iter()
        .map(Task::from)
        .collect();

        Ok(tasks)
    }

    async fn task_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Task>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let task = query_as::<_, TaskRow>(
            "SELECT t.id, t.user_id, t.title, t.slug, t.content, t.priority, t.completed \
             FROM tasks t WHERE t.id = $1",
        )
        .bind(task_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a task by ID")?
        .map(Task::from);

        Ok(task)
    }

    async fn tasks_for_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<Task>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks: Vec<Task> = query_as::<_, TaskRow>(
            "SELECT t.id, t.user_id, t.title, t.slug, t.content, t.priority, t.completed \
             FROM tasks t WHERE t.user_id = $1 ORDER BY t.id",
        )
        .bind(user_id)
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch tasks for a user")?
        .into_iter()
        .map(Task::from)
        .collect();

        Ok(tasks)
    }
}

pub struct DbTaskWriter;

impl domain::task::driven_ports::TaskWriter for DbTaskWriter {
    async fn create_task_for_user(
        &self,
        user_id: i32,
        new_task: &NewTask,
        slug: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO tasks(title, content, priority, completed, user_id, slug) \
             VALUES ($1, $2, $3, FALSE, $4, $5) RETURNING tasks.id",
        )
        .bind(&new_task.title)
        .bind(&new_task.content)
        .bind(new_task.priority)
        .bind(user_id)
        .bind(slug)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new task into the database")?;

        Ok(new_id.id)
    }

    async fn update_task(
        &self,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query(
            "UPDATE tasks SET title = $1, content = $2, priority = $3, completed = $4 \
             WHERE id = $5",
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(update.priority)
        .bind(update.completed)
        .bind(task_id)
        .execute(cxn.borrow_connection())
        .await
        .context("trying to update a task in the database")?;

        Ok(())
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a task from the database")?;

        Ok(())
    }
}
