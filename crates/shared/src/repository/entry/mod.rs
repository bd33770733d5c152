mod command;
mod query;

use self::command::EntryCommandRepository;
use self::query::EntryQueryRepository;

use crate::{
    abstract_trait::{DynEntryCommandRepository, DynEntryQueryRepository},
    config::ConnectionPool,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct EntryRepository {
    pub query: DynEntryQueryRepository,
    pub command: DynEntryCommandRepository,
}

impl EntryRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(EntryQueryRepository::new(pool.clone())) as DynEntryQueryRepository;
        let command =
            Arc::new(EntryCommandRepository::new(pool.clone())) as DynEntryCommandRepository;

        Self { query, command }
    }
}
