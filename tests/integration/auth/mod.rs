//! Bearer token integration tests
//!
//! Rejection reasons as seen by API clients, and key-set retrieval against
//! a mock identity provider.

use axum::http::{Method, StatusCode};
use gearshare_auth::AuthBackend;
use gearshare_items::ItemStore;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    auth_config, authed_request, create_test_jwt, now, parse_body, request, sign_with,
    test_claims, tent, TestApp, JWKS_JSON, KID, PRIVATE_KEY_PEM, ROTATED_JWKS_JSON, ROTATED_KID,
    ROTATED_PRIVATE_KEY_PEM,
};

async fn rejection_for(app: &TestApp, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut req = request(Method::GET, "/api_v1/items", None, None);
    if let Some(value) = authorization {
        req.headers_mut()
            .insert("authorization", value.parse().unwrap());
    }
    let resp = app.router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

async fn reason_for_claims(claims: Value) -> String {
    let app = TestApp::new();
    let token = sign_with(&claims, KID, PRIVATE_KEY_PEM);
    let (status, body) = rejection_for(&app, Some(&format!("Bearer {}", token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body["msg"].as_str().unwrap().to_string()
}

mod test_rejections {
    use super::*;

    #[tokio::test]
    async fn test_wrong_scheme() {
        let app = TestApp::new();
        let (status, body) = rejection_for(&app, Some("Token abc")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({ "msg": "UnauthorizedError: Format is Authorization: Bearer [token]" })
        );
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let app = TestApp::new();
        let (status, body) = rejection_for(&app, Some("Bearer abc.def.ghi")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "UnauthorizedError: jwt malformed");
    }

    #[tokio::test]
    async fn test_expired_token() {
        let mut claims = test_claims();
        claims["exp"] = json!(now() - 3600);
        assert_eq!(
            reason_for_claims(claims).await,
            "UnauthorizedError: jwt expired"
        );
    }

    #[tokio::test]
    async fn test_wrong_audience() {
        let mut claims = test_claims();
        claims["aud"] = json!("https://other-api");
        assert_eq!(
            reason_for_claims(claims).await,
            "UnauthorizedError: jwt audience invalid"
        );
    }

    #[tokio::test]
    async fn test_wrong_issuer() {
        let mut claims = test_claims();
        claims["iss"] = json!("https://impostor.auth0.com/");
        assert_eq!(
            reason_for_claims(claims).await,
            "UnauthorizedError: jwt issuer invalid"
        );
    }

    #[tokio::test]
    async fn test_symmetric_signature() {
        let app = TestApp::new();
        let mut header = Header::new(jsonwebtoken::Algorithm::HS256);
        header.kid = Some(KID.to_string());
        let token = jsonwebtoken::encode(
            &header,
            &test_claims(),
            &EncodingKey::from_secret(b"shared-secret"),
        )
        .unwrap();

        let (status, body) = rejection_for(&app, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "UnauthorizedError: invalid algorithm");
    }

    #[tokio::test]
    async fn test_unknown_signing_key() {
        let app = TestApp::new();
        let token = sign_with(&test_claims(), ROTATED_KID, ROTATED_PRIVATE_KEY_PEM);

        let (status, body) = rejection_for(&app, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["msg"],
            "UnauthorizedError: unable to find a signing key that matches 'gearshare-rotated-key'"
        );
    }

    #[tokio::test]
    async fn test_rejected_create_never_reaches_store() {
        let app = TestApp::new();
        let mut claims = test_claims();
        claims["exp"] = json!(now() - 5);
        let token = sign_with(&claims, KID, PRIVATE_KEY_PEM);

        let resp = app
            .router()
            .oneshot(authed_request(
                Method::POST,
                "/api_v1/items",
                &token,
                Some(tent()),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(app.store.list().await.unwrap().is_empty());
    }
}

mod test_key_set_retrieval {
    use super::*;

    fn jwks_response(json: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(json.to_string(), "application/json")
    }

    fn remote_app(server: &MockServer) -> TestApp {
        let config = auth_config(&format!("{}/.well-known/jwks.json", server.uri()));
        TestApp::with_backend(AuthBackend::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_keys_fetched_once_and_reused() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(jwks_response(JWKS_JSON))
            .expect(1)
            .mount(&server)
            .await;

        let app = remote_app(&server);
        let jwt = create_test_jwt();

        for _ in 0..3 {
            let resp = app
                .router()
                .oneshot(authed_request(Method::GET, "/api_v1/items", &jwt, None))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_rotated_key_is_picked_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(jwks_response(JWKS_JSON))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(jwks_response(ROTATED_JWKS_JSON))
            .mount(&server)
            .await;

        let app = remote_app(&server);

        let resp = app
            .router()
            .oneshot(authed_request(
                Method::GET,
                "/api_v1/items",
                &create_test_jwt(),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let rotated = sign_with(&test_claims(), ROTATED_KID, ROTATED_PRIVATE_KEY_PEM);
        let resp = app
            .router()
            .oneshot(authed_request(Method::GET, "/api_v1/items", &rotated, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreachable_key_set_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = remote_app(&server);
        let resp = app
            .router()
            .oneshot(authed_request(
                Method::POST,
                "/api_v1/items",
                &create_test_jwt(),
                Some(tent()),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            parse_body(resp).await,
            json!({ "msg": "UnauthorizedError: unable to retrieve signing key" })
        );
        assert!(app.store.list().await.unwrap().is_empty());
    }
}
