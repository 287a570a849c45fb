use actix_web::{web, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::GraphQLRequest;

use crate::{app_state::AppState, errors::AppError, session::CurrentSession};

pub use crate::graphql::schema_impl::{create_schema, Schema};

/// Executes a GraphQL request on behalf of the presented session, minting
/// one when the client has none yet.
pub async fn graphql_handler(
    schema: web::Data<Schema>,
    state: web::Data<AppState>,
    session: CurrentSession,
    request: GraphQLRequest,
) -> Result<HttpResponse, AppError> {
    let (claims, cookie) = state.session_tokens.resolve_or_issue(session.0)?;
    let response = schema.execute(request.into_inner().data(claims)).await;

    let mut builder = HttpResponse::Ok();
    if let Some(cookie) = cookie {
        builder.cookie(cookie);
    }
    Ok(builder.json(response))
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/graphql").route(web::post().to(graphql_handler)))
        .service(web::resource("/graphiql").route(web::get().to(graphiql)));
}
