use actix_web::{middleware::Logger, web, App, HttpServer};

use random_quiz_server::{
    app_state::AppState, config::Config, graphql, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state = match startup().await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let host = state.config.web_server_host.clone();
    let port = state.config.web_server_port;
    let schema = graphql::create_schema(state.clone());

    log::info!(
        "Serving {}-question quizzes from a bank of {} on http://{}:{}",
        state.quiz_service.quiz_size(),
        state.quiz_service.bank_size(),
        host,
        port
    );
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
            .configure(graphql::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

/// Everything that must succeed before traffic is served: configuration,
/// the question bank and the session store.
async fn startup() -> random_quiz_server::errors::AppResult<AppState> {
    let config = Config::from_env()?;
    if config.is_production() {
        config.validate_for_production()?;
    }

    AppState::new(config).await
}
