use crate::{database::Database, model::Entity, Error};
use futures::future::BoxFuture;

/// Type alias for migration tasks (creating one entity table).
///
/// These tasks are closures that take a `Database` connection and return a future.
pub type MigrationTask = Box<dyn Fn(Database) -> BoxFuture<'static, Result<(), Error>> + Send + Sync>;

/// Table creation manager.
///
/// Collects entity types and creates their tables in registration order.
pub struct Migrator<'a> {
    pub(crate) db: &'a Database,
    pub(crate) tasks: Vec<MigrationTask>,
}

impl<'a> Migrator<'a> {
    /// Creates a new Migrator instance associated with a Database.
    pub fn new(db: &'a Database) -> Self {
        Self { db, tasks: Vec::new() }
    }

    /// Registers an entity whose table should exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.migrator()
    ///   .register::<User>()
    ///   .register::<Blog>()
    ///   .run()
    ///   .await?;
    /// ```
    pub fn register<T: Entity>(mut self) -> Self {
        let task = Box::new(|db: Database| -> BoxFuture<'static, Result<(), Error>> {
            Box::pin(async move { db.create_table::<T>().await })
        });
        self.tasks.push(task);
        self
    }

    /// Creates every registered table, stopping at the first failure.
    pub async fn run(self) -> Result<Database, Error> {
        for task in self.tasks {
            (task)(self.db.clone()).await?;
        }
        Ok(self.db.clone())
    }
}
