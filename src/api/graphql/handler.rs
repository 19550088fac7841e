use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::api::graphql::schema::AppSchema;
use crate::auth::application::services::SessionAuthenticator;

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Single GraphQL endpoint. The session is resolved up front and attached
/// to the request context; resolvers never see raw tokens.
pub async fn graphql(
    schema: web::Data<AppSchema>,
    authenticator: web::Data<SessionAuthenticator>,
    http_req: HttpRequest,
    gql_req: GraphQLRequest,
) -> GraphQLResponse {
    let session = authenticator.authenticate(bearer_token(&http_req)).await;
    schema
        .execute(gql_req.into_inner().data(session))
        .await
        .into()
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/graphql")
            .route(web::post().to(graphql))
            .route(web::get().to(graphiql)),
    );
}
