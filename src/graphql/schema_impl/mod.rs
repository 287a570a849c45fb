pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the quiz schema over the shared state. Production deployments do
/// not answer introspection queries.
pub fn create_schema(app_state: AppState) -> Schema {
    let production = app_state.config.is_production();
    let builder = GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription).data(app_state);

    if production {
        log::info!("GraphQL introspection disabled in production");
        builder.disable_introspection().finish()
    } else {
        builder.finish()
    }
}
