//! HttpRepository and AuthClient tests against a throwaway axum server

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::{ClaimId, PolicyId, PortError, RequestContext, UserId};
use domain_claims::{ClaimPort, ClaimStatus};
use domain_policy::PolicyPort;
use interface_client::{
    AuthClient, AuthError, Credentials, FileTokenStore, HttpRepository, MemoryTokenStore,
    RecordController, RecordError, Session, TokenStore,
};
use test_utils::{fixed_clock, fixed_now, token_for_user, ClaimFixtures, PolicyFixtures};

#[derive(Clone, Default)]
struct Stub {
    hits: Arc<AtomicUsize>,
    last_authorization: Arc<std::sync::Mutex<Option<String>>>,
}

impl Stub {
    fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_authorization.lock().unwrap() = auth;
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }
}

async fn create_policy(State(stub): State<Stub>, headers: HeaderMap, Json(_body): Json<Value>) -> Json<Value> {
    stub.record(&headers);
    Json(json!({ "message": "Policy created", "policyId": 41 }))
}

async fn update_policy(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    stub.record(&headers);
    body["policyId"] = json!(id);
    body["premiumAmt"] = json!("1500.00");
    body["endDate"] = json!(format!("{}T00:00:00.000Z", body["endDate"].as_str().unwrap_or_default()));
    Json(body)
}

async fn list_policies(State(stub): State<Stub>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    stub.record(&headers);
    if !headers.contains_key("authorization") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No token provided" })));
    }
    (
        StatusCode::OK,
        Json(json!([
            {
                "policyId": 1,
                "userId": 2,
                "insurer": "Acme",
                "policyType": "Motor",
                "premiumAmt": "450.00",
                "startDate": "2024-01-01T00:00:00.000Z",
                "endDate": "2025-01-01T00:00:00.000Z",
                "status": "Active"
            }
        ])),
    )
}

async fn delete_policy(State(stub): State<Stub>, headers: HeaderMap, Path(_id): Path<i64>) -> (StatusCode, Json<Value>) {
    stub.record(&headers);
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Policy not found" })))
}

async fn create_claim(State(stub): State<Stub>, headers: HeaderMap, Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.record(&headers);
    body["claimId"] = json!(77);
    (StatusCode::CREATED, Json(body))
}

async fn list_claims(State(stub): State<Stub>, headers: HeaderMap) -> StatusCode {
    stub.record(&headers);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "correct horse" {
        (StatusCode::OK, Json(json!({ "token": token_for_user(2) })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })))
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "taken@example.com" {
        (StatusCode::BAD_REQUEST, Json(json!({ "message": "Email already registered" })))
    } else {
        (StatusCode::CREATED, Json(json!({ "message": "User registered" })))
    }
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/policies", post(create_policy).get(list_policies))
        .route("/api/policies/:id", put(update_policy).delete(delete_policy))
        .route("/api/claims", post(create_claim).get(list_claims))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/health", get(|| async { "ok" }))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), stub)
}

fn bearer(user: i64) -> (String, RequestContext) {
    let token = token_for_user(user);
    let ctx = RequestContext::bearer(token.clone());
    (token, ctx)
}

// ============================================================================
// Repository
// ============================================================================

mod repository_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_builds_record_from_returned_id() {
        let (base, stub) = spawn_stub().await;
        let repo = HttpRepository::new(base, None).unwrap();
        let (token, ctx) = bearer(2);

        let submission = PolicyFixtures::acme_health_draft()
            .into_submission(UserId::new(2))
            .unwrap();
        let policy = repo.create_policy(&submission, &ctx).await.unwrap();

        assert_eq!(policy.policy_id, PolicyId::new(41));
        assert_eq!(policy.insurer, "Acme");
        assert_eq!(stub.last_authorization(), Some(format!("Bearer {}", token)));
    }

    #[tokio::test]
    async fn test_update_reads_server_shapes() {
        let (base, _stub) = spawn_stub().await;
        let repo = HttpRepository::new(base, None).unwrap();
        let (_, ctx) = bearer(2);

        let submission = PolicyFixtures::acme_health_draft()
            .into_submission(UserId::new(2))
            .unwrap();
        let policy = repo.update_policy(PolicyId::new(8), &submission, &ctx).await.unwrap();

        assert_eq!(policy.policy_id, PolicyId::new(8));
        assert_eq!(policy.premium_amt, dec!(1500.00));
        assert_eq!(policy.end_date, submission.end_date);
    }

    #[tokio::test]
    async fn test_list_without_token_is_unauthorized() {
        let (base, _stub) = spawn_stub().await;
        let repo = HttpRepository::new(base, None).unwrap();

        let err = repo.list_policies(&RequestContext::anonymous()).await.unwrap_err();
        assert!(matches!(err, PortError::Unauthorized { .. }));
        assert_eq!(err.server_message(), Some("No token provided"));

        let (_, ctx) = bearer(2);
        let policies = repo.list_policies(&ctx).await.unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].premium_amt, dec!(450));
    }

    #[tokio::test]
    async fn test_delete_not_found_keeps_server_message() {
        let (base, _stub) = spawn_stub().await;
        let repo = HttpRepository::new(base, None).unwrap();
        let (_, ctx) = bearer(2);

        let err = repo.delete_policy(PolicyId::new(99), &ctx).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.server_message(), Some("Policy not found"));
    }

    #[tokio::test]
    async fn test_claim_create_reads_echoed_record() {
        let (base, _stub) = spawn_stub().await;
        let repo = HttpRepository::new(base, None).unwrap();
        let (_, ctx) = bearer(2);

        let submission = ClaimFixtures::highway_draft()
            .into_submission(UserId::new(2), ClaimStatus::Submitted, fixed_now())
            .unwrap();
        let claim = repo.create_claim(&submission, &ctx).await.unwrap();
        assert_eq!(claim.claim_id, ClaimId::new(77));
        assert_eq!(claim.submitted_at, fixed_now());
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let (base, _stub) = spawn_stub().await;
        let repo = HttpRepository::new(base, None).unwrap();
        let (_, ctx) = bearer(2);

        let err = repo.list_claims(&ctx).await.unwrap_err();
        assert!(matches!(err, PortError::Rejected { status: 500, server_message: None }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let repo = HttpRepository::new("http://127.0.0.1:9/api", None).unwrap();
        let err = repo.list_policies(&RequestContext::anonymous()).await.unwrap_err();
        assert!(matches!(err, PortError::Connection { .. }));
    }
}

// ============================================================================
// Controller over HTTP
// ============================================================================

mod controller_over_http_tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthenticated_claim_sends_nothing() {
        let (base, stub) = spawn_stub().await;
        let repo = Arc::new(HttpRepository::new(base, None).unwrap());
        let controller =
            RecordController::new(repo.clone(), repo).with_clock(Arc::new(fixed_clock()));
        let policies = vec![PolicyFixtures::active_ending_in(5, 200)];

        let err = controller
            .create_claim(&Session::anonymous(), &ClaimFixtures::highway_draft(), &policies)
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::Unauthenticated));
        assert_eq!(stub.hits(), 0);
    }

    #[tokio::test]
    async fn test_list_failure_maps_to_fallback() {
        let (base, _stub) = spawn_stub().await;
        let repo = Arc::new(HttpRepository::new(base, None).unwrap());
        let controller = RecordController::new(repo.clone(), repo);

        let err = controller
            .list_claims(&Session::from_token(token_for_user(2)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to load claims");
    }
}

// ============================================================================
// Auth
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_persists_token_and_user() {
        let (base, _stub) = spawn_stub().await;
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(dir.path().join("session.json")));
        let auth = AuthClient::new(base, None, store.clone()).unwrap();

        auth.login(&Credentials {
            email: "jo@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();

        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user().unwrap()["id"], 2);

        let restored = FileTokenStore::new(dir.path().join("session.json"));
        let session = Session::from_store(&restored).unwrap();
        assert_eq!(session.current_user_id(), Some(UserId::new(2)));

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_bad_login_surfaces_server_message() {
        let (base, _stub) = spawn_stub().await;
        let store = Arc::new(MemoryTokenStore::new());
        let auth = AuthClient::new(base, None, store.clone()).unwrap();

        let err = auth
            .login(&Credentials {
                email: "jo@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Rejected { status: 401, .. }));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(store.token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_returns_payload_or_reason() {
        let (base, _stub) = spawn_stub().await;
        let auth = AuthClient::new(base, None, Arc::new(MemoryTokenStore::new())).unwrap();

        let ok = auth
            .register(&json!({ "name": "Jo", "email": "jo@example.com", "password": "pw" }))
            .await
            .unwrap();
        assert_eq!(ok["message"], "User registered");

        let err = auth
            .register(&json!({ "name": "Jo", "email": "taken@example.com", "password": "pw" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }
}
