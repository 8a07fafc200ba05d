use sea_orm::DatabaseConnection;

use crate::{LedgerEvent, ResultEngine, events::EventSender};

mod access;
mod balances;
mod expenses;
mod groups;
mod memberships;
mod payments;
mod reminders;
mod settlements;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The rollback happens when the uncommitted transaction is dropped, which also
/// covers early returns through `?`.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every ledger operation.
///
/// The engine owns the shared connection pool and passes it (or a
/// transaction opened on it) explicitly to the ledger store; there is no
/// process-wide state.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    events: Option<EventSender>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Hands an event to the notification worker, if one is attached.
    fn emit(&self, event: LedgerEvent) {
        if let Some(events) = &self.events {
            // A closed channel only means nobody is listening anymore.
            let _ = events.send(event);
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    events: Option<EventSender>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Emit a [`LedgerEvent`] on `sender` after every committed change.
    pub fn events(mut self, sender: EventSender) -> EngineBuilder {
        self.events = Some(sender);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            events: self.events,
        })
    }
}
