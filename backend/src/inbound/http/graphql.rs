//! GraphQL transport over HTTP.
//!
//! `POST /graphql` resolves the caller from the bearer header and executes
//! the operation with that identity attached. Debug builds also serve
//! GraphiQL on `GET /graphql`.

use actix_web::{HttpRequest, post, web};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use super::auth::caller_identity;
use super::state::HttpState;

/// Execute one GraphQL operation.
#[post("/graphql")]
pub async fn graphql(
    state: web::Data<HttpState>,
    request: HttpRequest,
    operation: GraphQLRequest,
) -> GraphQLResponse {
    let caller = caller_identity(request.headers(), state.tokens.as_ref());
    state
        .schema
        .execute(operation.into_inner().data(caller))
        .await
        .into()
}

/// Interactive query editor for local development.
#[cfg(debug_assertions)]
#[actix_web::get("/graphql")]
pub async fn graphiql() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(
            async_graphql::http::GraphiQLSource::build()
                .endpoint("/graphql")
                .finish(),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::AuthorizationPolicy;
    use crate::inbound::graphql::{Ports, Services, build_schema};
    use crate::outbound::memory::MemoryStore;
    use crate::outbound::security::{BcryptPasswordHasher, JwtTokenService};
    use actix_web::{App, test as actix_test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use zeroize::Zeroizing;

    #[fixture]
    fn state() -> HttpState {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(JwtTokenService::with_default_ttl(&Zeroizing::new(
            "graphql-handler-secret".to_owned(),
        )));
        let ports = Ports::in_memory(&store, Arc::new(BcryptPasswordHasher::new(4)), tokens.clone());
        let schema = build_schema(Services::new(&ports, AuthorizationPolicy::default()));
        HttpState::new(schema, tokens)
    }

    async fn post(state: &HttpState, body: Value, bearer: Option<&str>) -> Value {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(graphql),
        )
        .await;
        let mut req = actix_test::TestRequest::post().uri("/graphql").set_json(body);
        if let Some(token) = bearer {
            req = req.insert_header(("Authorization", format!("Bearer {token}")));
        }
        actix_test::call_and_read_body_json(&app, req.to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn bearer_token_identifies_the_caller(state: HttpState) {
        let signup = post(
            &state,
            json!({
                "query": "mutation { signup(input: {name: \"Ada\", email: \"ada@example.com\", password: \"secret12\"}) { token user { role } } }"
            }),
            None,
        )
        .await;
        assert_eq!(signup["data"]["signup"]["user"]["role"], "USER");
        let token = signup["data"]["signup"]["token"]
            .as_str()
            .expect("token issued")
            .to_owned();

        let me = post(&state, json!({ "query": "{ me { email } }" }), Some(&token)).await;
        assert_eq!(me["data"]["me"]["email"], "ada@example.com");
    }

    #[rstest]
    #[case::no_header(None)]
    #[case::forged(Some("not-a-token"))]
    #[actix_web::test]
    async fn bad_or_missing_tokens_are_anonymous(state: HttpState, #[case] bearer: Option<&str>) {
        let me = post(&state, json!({ "query": "{ me { id } }" }), bearer).await;
        assert!(me.get("errors").is_none(), "anonymous me must not error: {me}");
        assert_eq!(me["data"]["me"], Value::Null);

        let trips = post(&state, json!({ "query": "{ myTrips { id } }" }), bearer).await;
        assert!(trips.get("errors").is_none(), "anonymous myTrips must not error: {trips}");
        assert_eq!(trips["data"]["myTrips"], json!([]));

        let denied = post(
            &state,
            json!({
                "query": "mutation($id: ID!) { leaveTrip(participantId: $id) }",
                "variables": { "id": "00000000-0000-4000-8000-000000000001" }
            }),
            bearer,
        )
        .await;
        assert_eq!(denied["errors"][0]["extensions"]["code"], "unauthorized");
    }
}
