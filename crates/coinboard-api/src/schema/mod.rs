pub mod query;
pub mod types;

use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use coinboard_store::SyncRunLog;
use coinboard_sync::MarketStore;
use std::sync::Arc;

pub use query::QueryRoot;

/// GraphQL Schema type
pub type ApiSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Build the read-only schema over the market store
pub fn build_schema(store: Arc<dyn MarketStore>, runs: Arc<SyncRunLog>) -> ApiSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(store)
        .data(runs)
        .finish()
}
