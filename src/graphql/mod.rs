pub mod helpers;
pub mod schema;
pub mod schema_impl;

pub use schema::{configure, create_schema, graphiql, graphql_handler};
pub use schema_impl::Schema;
