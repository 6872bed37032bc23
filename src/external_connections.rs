use sqlx::PgConnection;

/// A handle on a live database connection handed out by [ExternalConnectivity]. The connection
/// is returned to wherever it came from once the handle is dropped.
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Gives driven adapters access to the systems they talk to, so business logic never has to know
/// whether it's running against a plain connection pool or an open transaction.
pub trait ExternalConnectivity: Send {
    type DbHandle<'cxn_borrow>: ConnectionHandle + Send
    where
        Self: 'cxn_borrow;

    /// Acquires a database connection for the lifetime of the returned handle
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// Something that can open a database transaction. The produced handle behaves like any other
/// [ExternalConnectivity] until it's committed. Dropping it uncommitted rolls the work back.
pub trait Transactable {
    type Handle: TransactionHandle;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

/// An [ExternalConnectivity] with an in-flight transaction
pub trait TransactionHandle: ExternalConnectivity {
    async fn commit(self) -> Result<(), anyhow::Error>;
}

/// Shorthand for connectivity that can both hand out connections and open transactions
pub trait TransactableExternalConnectivity: ExternalConnectivity + Transactable {}

impl<T> TransactableExternalConnectivity for T where T: ExternalConnectivity + Transactable {}
