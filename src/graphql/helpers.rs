use async_graphql::Context;

use crate::{
    errors::{AppError, AppResult},
    session::SessionClaims,
};

/// The session bound to the current GraphQL request by the HTTP handler.
pub fn session_from_context(ctx: &Context<'_>) -> AppResult<SessionClaims> {
    ctx.data::<SessionClaims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Quiz session required".to_string()))
}
