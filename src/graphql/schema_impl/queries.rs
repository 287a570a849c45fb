use async_graphql::{Context, Object, ResultExt};

use crate::{
    app_state::AppState, graphql::helpers::session_from_context, models::dto::response::QuizView,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The caller's current quiz; a new one is drawn when none is active.
    async fn quiz(&self, ctx: &Context<'_>) -> async_graphql::Result<QuizView> {
        let state = ctx.data::<AppState>()?;
        let claims = session_from_context(ctx).extend()?;

        state
            .quiz_service
            .get_or_create_quiz_view(&claims.sid)
            .await
            .extend()
    }

    async fn questions_per_quiz(&self, ctx: &Context<'_>) -> async_graphql::Result<u32> {
        let state = ctx.data::<AppState>()?;
        Ok(state.quiz_service.quiz_size() as u32)
    }
}
