use std::collections::HashMap;

use actix_web::{get, http::header::LOCATION, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::{AppError, QUIZ_START_PATH},
    models::{domain::AnswerSubmission, dto::request::SubmitAnswersRequest},
    session::CurrentSession,
};

fn redirect_to_quiz() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, QUIZ_START_PATH))
        .finish()
}

/// Returns the caller's quiz, drawing a new one when none is active.
#[get("/api/quiz")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    session: CurrentSession,
) -> Result<HttpResponse, AppError> {
    let (claims, cookie) = state.session_tokens.resolve_or_issue(session.0)?;
    let view = state.quiz_service.get_or_create_quiz_view(&claims.sid).await?;

    let mut response = HttpResponse::Ok();
    if let Some(cookie) = cookie {
        response.cookie(cookie);
    }
    Ok(response.json(view))
}

async fn submit(
    state: &AppState,
    session: CurrentSession,
    submission: AnswerSubmission,
) -> Result<HttpResponse, AppError> {
    let Some(sid) = session.sid() else {
        return Ok(redirect_to_quiz());
    };

    match state.quiz_service.submit_answers(sid, &submission).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(AppError::NoActiveSession) => Ok(redirect_to_quiz()),
        Err(e) => Err(e),
    }
}

#[post("/api/quiz/submit")]
pub async fn submit_answers(
    state: web::Data<AppState>,
    session: CurrentSession,
    request: web::Json<SubmitAnswersRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    submit(&state, session, request.into()).await
}

/// Same as `submit_answers` but for a plain HTML form, one field per
/// question id.
#[post("/api/quiz/submit-form")]
pub async fn submit_answers_form(
    state: web::Data<AppState>,
    session: CurrentSession,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    submit(&state, session, form.into_inner().into()).await
}

#[post("/api/quiz/reset")]
pub async fn reset_quiz(
    state: web::Data<AppState>,
    session: CurrentSession,
) -> Result<HttpResponse, AppError> {
    if let Some(sid) = session.sid() {
        state.quiz_service.reset_session(sid).await?;
    }
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/quiz/start-over")]
pub async fn start_over(
    state: web::Data<AppState>,
    session: CurrentSession,
) -> Result<HttpResponse, AppError> {
    if let Some(sid) = session.sid() {
        state.quiz_service.reset_session(sid).await?;
    }
    Ok(redirect_to_quiz())
}
