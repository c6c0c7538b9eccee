//! Authentication and role gates as route-layer middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bookcircle_postgres::types::UserRole;

use crate::extract::{AccessPolicy, Session};

/// Requires a valid identity token to proceed with the request.
///
/// #### Notes
///
/// - [`Session`] can't be extracted from requests without a *verified*
///   `x-auth-token` header, so any request failing verification is rejected
///   here, before handler logic runs.
/// - The verified session is cached in the request extensions; handlers
///   extracting [`Session`] afterwards reuse it.
pub async fn require_authentication(_: Session, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Requires the authenticated user to hold the `owner` role.
///
/// #### Notes
///
/// - Must be composed after [`require_authentication`]; see
///   [`AccessPolicy::require_role`] for the rejection it produces.
pub async fn require_owner(session: Session, request: Request, next: Next) -> Response {
    if let Err(error) = session.require_role(UserRole::Owner) {
        return error.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::Router;
    use axum::extract::FromRef;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum_test::TestServer;
    use uuid::Uuid;

    use super::*;
    use crate::extract::TOKEN_HEADER;
    use crate::service::{Claims, TokenSigner};

    /// Minimal state carrying only what the gates need.
    #[derive(Clone)]
    struct GateTestState {
        token_signer: TokenSigner,
    }

    impl FromRef<GateTestState> for TokenSigner {
        fn from_ref(state: &GateTestState) -> Self {
            state.token_signer.clone()
        }
    }

    fn test_signer() -> TokenSigner {
        TokenSigner::new("gate-test-secret", Duration::from_secs(3600))
    }

    /// A protected route guarded by both gates, authentication outermost.
    fn test_server(token_signer: TokenSigner) -> anyhow::Result<TestServer> {
        let state = GateTestState { token_signer };

        let router = Router::new()
            .route("/protected", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(state.clone(), require_owner))
            .route_layer(from_fn_with_state(state.clone(), require_authentication))
            .with_state(state);

        Ok(TestServer::new(router)?)
    }

    #[tokio::test]
    async fn missing_token_is_rejected_before_the_handler() -> anyhow::Result<()> {
        let server = test_server(test_signer())?;

        let response = server.get("/protected").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["msg"], "no token, authorization denied");
        Ok(())
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() -> anyhow::Result<()> {
        let server = test_server(test_signer())?;

        let response = server
            .get("/protected")
            .add_header(TOKEN_HEADER, "definitely-not-a-token")
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["msg"], "token is not valid");
        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> anyhow::Result<()> {
        let signer = test_signer();
        let server = test_server(signer.clone())?;

        let now = jiff::Timestamp::now().as_second();
        let stale = Claims {
            user_id: Uuid::new_v4(),
            role: UserRole::Owner,
            issued_at: now - 7200,
            expires_at: now - 3600,
        };
        let token = signer.sign(&stale)?;

        let response = server
            .get("/protected")
            .add_header(TOKEN_HEADER, token)
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["msg"], "token is not valid");
        Ok(())
    }

    #[tokio::test]
    async fn seeker_is_forbidden_even_with_a_valid_token() -> anyhow::Result<()> {
        let signer = test_signer();
        let server = test_server(signer.clone())?;

        let token = signer.issue(Uuid::new_v4(), UserRole::Seeker)?;

        let response = server
            .get("/protected")
            .add_header(TOKEN_HEADER, token)
            .await;

        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["msg"],
            "Access denied, only book owners can perform this action"
        );
        Ok(())
    }

    #[tokio::test]
    async fn owner_passes_both_gates() -> anyhow::Result<()> {
        let signer = test_signer();
        let server = test_server(signer.clone())?;

        let token = signer.issue(Uuid::new_v4(), UserRole::Owner)?;

        let response = server
            .get("/protected")
            .add_header(TOKEN_HEADER, token)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "ok");
        Ok(())
    }
}
