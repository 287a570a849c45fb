use async_graphql::{Context, Object, ResultExt};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    graphql::helpers::session_from_context,
    models::{
        domain::ScoreResult,
        dto::request::{submission_from_inputs, AnswerInput},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Scores and ends the active quiz. Fails with `NO_ACTIVE_SESSION` when
    /// there is nothing to score; clients should then query `quiz` again.
    async fn submit_answers(
        &self,
        ctx: &Context<'_>,
        answers: Vec<AnswerInput>,
    ) -> async_graphql::Result<ScoreResult> {
        let state = ctx.data::<AppState>()?;
        let claims = session_from_context(ctx).extend()?;

        for answer in &answers {
            answer.validate().map_err(AppError::from).extend()?;
        }

        state
            .quiz_service
            .submit_answers(&claims.sid, &submission_from_inputs(answers))
            .await
            .extend()
    }

    async fn reset_session(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let state = ctx.data::<AppState>()?;
        let claims = session_from_context(ctx).extend()?;

        state.quiz_service.reset_session(&claims.sid).await.extend()?;
        Ok(true)
    }
}
