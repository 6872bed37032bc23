use super::Count;
use crate::domain;
use crate::domain::user::driven_ports::UserDescription;
use crate::domain::user::{CreateUser, User};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query_as};

pub struct DbDetectUser;

impl domain::user::driven_ports::DetectUser for DbDetectUser {
    async fn user_exists(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let user_with_id_count =
            query_as::<_, Count>("SELECT count(*) AS count FROM users u WHERE u.id = $1")
                .bind(user_id)
                .fetch_one(connection.borrow_connection())
                .await
                .context("Detecting user with ID")?;

        Ok(user_with_id_count.count > 0)
    }

    async fn user_with_name_exists<'strings>(
        &self,
        description: UserDescription<'strings>,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let user_with_name_count = query_as::<_, Count>(
            "SELECT count(*) AS count FROM users u WHERE u.first_name = $1 AND u.last_name = $2",
        )
        .bind(description.first_name)
        .bind(description.last_name)
        .fetch_one(connection.borrow_connection())
        .await
        .context("Detecting user via name")?;

        Ok(user_with_name_count.count > 0)
    }
}

pub struct DbReadUsers;

#[derive(FromRow)]
struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

impl domain::user::driven_ports::UserReader for DbReadUsers {
    async fn get_all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<User>, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let users: Vec<User> = query_as::<_, UserRow>(
            "SELECT u.id, u.first_name, u.last_name FROM users u ORDER BY u.id",
        )
        .fetch_all(connection.borrow_connection())
        .await
        .context("Fetching all users")?
        .into_iter()
        .map(User::from)
        .collect();

        Ok(users)
    }

    async fn get_by_id(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<User>, Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, UserRow>(
            "SELECT u.id, u.first_name, u.last_name FROM users u WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(cxn_handle.borrow_connection())
        .await
        .context("Fetching a user by id")?;

        Ok(user.map(User::from))
    }
}

pub struct DbWriteUsers;

impl domain::user::driven_ports::UserWriter for DbWriteUsers {
    async fn create_user(
        &self,
        user: &CreateUser,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let new_user = query_as::<_, super::NewId>(
            "INSERT INTO users(first_name, last_name) VALUES ($1, $2) RETURNING users.id",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(cxn_handle.borrow_connection())
        .await
        .context("Inserting new user")?;

        Ok(new_user.id)
    }
}
