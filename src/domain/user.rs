use crate::domain::user::driving_ports::CreateUserError;
use crate::external_connections::{
    ExternalConnectivity, TransactableExternalConnectivity, TransactionHandle,
};
use anyhow::Context;
use thiserror::Error;
use tracing::error;

/// A person who owns tasks
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[cfg_attr(test, derive(Clone, Debug))]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
}

pub mod driven_ports {
    use super::*;

    pub trait UserReader: Sync {
        async fn get_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<User>, anyhow::Error>;
        async fn get_by_id(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<User>, anyhow::Error>;
    }

    pub trait UserWriter: Sync {
        /// Inserts the user and returns its newly assigned ID
        async fn create_user(
            &self,
            user: &CreateUser,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;
    }

    pub struct UserDescription<'names> {
        pub first_name: &'names str,
        pub last_name: &'names str,
    }

    pub trait DetectUser: Sync {
        async fn user_exists(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        async fn user_with_name_exists<'strings>(
            &self,
            description: UserDescription<'strings>,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    #[derive(Debug, Error)]
    pub enum CreateUserError {
        #[error("The provided user already exists.")]
        UserAlreadyExists,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait UserPort {
        async fn get_users(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Vec<User>, anyhow::Error>;
        async fn get_user(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Option<User>, anyhow::Error>;
        async fn create_user(
            &self,
            new_user: &CreateUser,
            ext_cxn: &mut impl TransactableExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
            u_detect: &impl driven_ports::DetectUser,
        ) -> Result<i32, CreateUserError>;
    }
}

pub struct UserService {}

#[derive(Debug, Error)]
pub(super) enum UserExistsErr {
    #[error("user with ID {0} does not exist")]
    UserDoesNotExist(i32),

    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

/// Confirms a user is present before something gets attached to it
pub(super) async fn verify_user_exists(
    id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_detect: &impl driven_ports::DetectUser,
) -> Result<(), UserExistsErr> {
    let does_user_exist = user_detect.user_exists(id, ext_cxn).await?;

    if does_user_exist {
        Ok(())
    } else {
        Err(UserExistsErr::UserDoesNotExist(id))
    }
}

impl driving_ports::UserPort for UserService {
    async fn get_users(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Vec<User>, anyhow::Error> {
        let all_users_result = u_reader.get_all(ext_cxn).await;
        if let Err(ref port_err) = all_users_result {
            error!("User fetch failure: {port_err}");
        }

        all_users_result.context("Failed fetching users")
    }

    async fn get_user(
        &self,
        user_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Option<User>, anyhow::Error> {
        u_reader
            .get_by_id(user_id, ext_cxn)
            .await
            .context("Fetching a single user")
    }

    async fn create_user(
        &self,
        new_user: &CreateUser,
        ext_cxn: &mut impl TransactableExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
        u_detect: &impl driven_ports::DetectUser,
    ) -> Result<i32, CreateUserError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("Opening transaction for user creation")?;
        let description = driven_ports::UserDescription {
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
        };

        let user_exists = u_detect
            .user_with_name_exists(description, &mut txn)
            .await
            .context("Looking up user during creation")?;
        if user_exists {
            return Err(CreateUserError::UserAlreadyExists);
        }

        let new_user_id = u_writer
            .create_user(new_user, &mut txn)
            .await
            .context("Trying to create user at service level")?;
        txn.commit().await.context("Committing new user")?;

        Ok(new_user_id)
    }
}
