mod conversations;
mod directory;
mod messages;
mod notifications;
mod read_receipts;

use sqlx::{Pool, Postgres};

/// Store backed by the hosted Postgres database.
#[derive(Clone)]
pub struct PgStore {
    db: Pool<Postgres>,
}

impl PgStore {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Pool<Postgres> {
        &self.db
    }
}
