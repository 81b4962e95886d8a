use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use worksphere_api::app::{self, AppServices};
use worksphere_api::token::Hs256Tokens;
use worksphere_auth::JwtClaims;
use worksphere_core::{NoteId, UserId};
use worksphere_infra::{Argon2Hasher, InMemoryWorkspaceStore, WorkspaceService};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, bound to an ephemeral port.
        let workspace = WorkspaceService::new(
            Arc::new(InMemoryWorkspaceStore::new()),
            Arc::new(Argon2Hasher::fast()),
        );
        let tokens = Arc::new(Hs256Tokens::new(JWT_SECRET.as_bytes(), ChronoDuration::hours(1)));
        let app = app::router(AppServices::new(workspace, tokens));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign up and return `(token, user id, default workspace id)`.
    async fn signup(&self, email: &str) -> (String, String, String) {
        let res = self
            .client
            .post(self.url("/auth/signup"))
            .json(&json!({ "email": email, "password": "correct horse" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
            body["defaultWorkspace"]["id"].as_str().unwrap().to_string(),
        )
    }

    fn get(&self, path: &str, token: &str, ws: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token).header("x-workspace-id", ws)
    }

    fn post(&self, path: &str, token: &str, ws: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token).header("x-workspace-id", ws)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(sub: UserId, issued_at: chrono::DateTime<Utc>, ttl: ChronoDuration) -> String {
    let claims = JwtClaims::issue(sub, issued_at, ttl);
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn error_code(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_protected_routes_need_a_token() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.client.get(srv.url("/workspaces")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "UNAUTHENTICATED");
}

#[tokio::test]
async fn tokens_for_unknown_or_expired_subjects_are_rejected() {
    let srv = TestServer::spawn().await;
    let (_, user_id, _) = srv.signup("me@acme.io").await;
    let now = Utc::now();

    let stranger = mint_jwt(UserId::new(), now, ChronoDuration::minutes(10));
    let res = srv.client.get(srv.url("/workspaces")).bearer_auth(stranger).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let expired = mint_jwt(user_id.parse().unwrap(), now - ChronoDuration::hours(2), ChronoDuration::hours(1));
    let res = srv.client.get(srv.url("/workspaces")).bearer_auth(expired).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let valid = mint_jwt(user_id.parse().unwrap(), now, ChronoDuration::minutes(10));
    let res = srv.client.get(srv.url("/workspaces")).bearer_auth(valid).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_login_and_duplicate_email() {
    let srv = TestServer::spawn().await;
    let (token, _, ws) = srv.signup("owner@acme.io").await;

    let res = srv.client.get(srv.url("/workspaces")).bearer_auth(&token).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["workspaces"][0]["id"], ws);
    assert_eq!(body["workspaces"][0]["role"], "OWNER");

    let res = srv
        .client
        .post(srv.url("/auth/signup"))
        .json(&json!({ "email": "owner@acme.io", "password": "another one" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .json(&json!({ "email": "owner@acme.io", "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .post(srv.url("/auth/login"))
        .json(&json!({ "email": "owner@acme.io", "password": "wrong horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn workspace_context_is_required_and_validated() {
    let srv = TestServer::spawn().await;
    let (token, _, ws) = srv.signup("me@acme.io").await;

    let res = srv.client.get(srv.url("/expenses")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "NO_WORKSPACE");

    let res = srv.get("/expenses", &token, "not-a-uuid").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv
        .client
        .get(srv.url(&format!("/expenses?workspace_id={ws}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn invited_viewer_reads_but_cannot_write_expenses() {
    let srv = TestServer::spawn().await;
    let (owner, _, ws) = srv.signup("owner@acme.io").await;
    let (viewer, viewer_id, _) = srv.signup("viewer@acme.io").await;

    let res = srv
        .post("/members/invite", &owner, &ws)
        .json(&json!({ "email": "viewer@acme.io" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["member"]["status"], "PENDING");
    assert_eq!(body["member"]["role"], "VIEWER");

    // pending looks like no access at all
    let res = srv.get("/expenses", &viewer, &ws).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv
        .post("/members/decision", &owner, &ws)
        .json(&json!({ "userId": viewer_id, "decision": "APPROVE" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.get("/expenses", &viewer, &ws).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .post("/expenses", &viewer, &ws)
        .json(&json!({ "title": "Taxi", "amountCents": 1500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "FORBIDDEN");

    // an empty body from a viewer is still refused before it is validated
    let res = srv.post("/expenses", &viewer, &ws).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .post("/expenses", &owner, &ws)
        .json(&json!({ "title": "Taxi", "amountCents": 1500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["expense"]["currency"], "USD");
    assert_eq!(body["expense"]["amountCents"], 1500);
}

#[tokio::test]
async fn private_notes_and_public_view() {
    let srv = TestServer::spawn().await;
    let (owner, _, ws) = srv.signup("owner@acme.io").await;

    let res = srv
        .post("/notes", &owner, &ws)
        .json(&json!({ "title": "Launch", "content": "Tuesday", "visibility": "PUBLIC" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let public: Value = res.json().await.unwrap();
    let public_id = public["note"]["id"].as_str().unwrap().to_string();

    let res = srv
        .post("/notes", &owner, &ws)
        .json(&json!({ "title": "Diary", "content": "secret" }))
        .send()
        .await
        .unwrap();
    let private: Value = res.json().await.unwrap();
    assert_eq!(private["note"]["visibility"], "PRIVATE");
    let private_id = private["note"]["id"].as_str().unwrap().to_string();

    let res = srv.client.get(srv.url(&format!("/public/notes/{public_id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["note"]["title"], "Launch");

    let res = srv.client.get(srv.url(&format!("/public/notes/{private_id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv.client.get(srv.url("/public/notes/garbage")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn field_values_are_checked_after_context_existence_and_role() {
    let srv = TestServer::spawn().await;
    let (owner, _, ws) = srv.signup("owner@acme.io").await;
    let (member, member_id, _) = srv.signup("member@acme.io").await;
    srv.signup("someone@acme.io").await;

    srv.post("/members/invite", &owner, &ws)
        .json(&json!({ "email": "member@acme.io", "role": "MEMBER" }))
        .send()
        .await
        .unwrap();
    srv.post("/members/decision", &owner, &ws)
        .json(&json!({ "userId": member_id, "decision": "APPROVE" }))
        .send()
        .await
        .unwrap();

    let res = srv
        .post("/notes", &owner, &ws)
        .json(&json!({ "title": "Plan", "content": "owner only" }))
        .send()
        .await
        .unwrap();
    let note: Value = res.json().await.unwrap();
    let note_id = note["note"]["id"].as_str().unwrap().to_string();

    // someone else's note: the creator check wins over the bad visibility
    let res = srv
        .client
        .put(srv.url(&format!("/notes/{note_id}")))
        .bearer_auth(&member)
        .header("x-workspace-id", &ws)
        .json(&json!({ "visibility": "SECRET" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .put(srv.url(&format!("/notes/{}", NoteId::new())))
        .bearer_auth(&owner)
        .header("x-workspace-id", &ws)
        .json(&json!({ "visibility": "SECRET" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = srv
        .client
        .put(srv.url(&format!("/notes/{note_id}")))
        .bearer_auth(&owner)
        .header("x-workspace-id", &ws)
        .json(&json!({ "visibility": "SECRET" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .post("/members/invite", &member, &ws)
        .json(&json!({ "email": "someone@acme.io", "role": "ROOT" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .post("/members/invite", &owner, &ws)
        .json(&json!({ "email": "someone@acme.io", "role": "ROOT" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .post("/members/invite", &owner, &ws)
        .json(&json!({ "email": "foo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // without a workspace header nothing about the body is looked at
    let res = srv
        .client
        .post(srv.url("/members/invite"))
        .bearer_auth(&owner)
        .json(&json!({ "email": "someone@acme.io", "role": "ROOT" }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "NO_WORKSPACE");

    let res = srv
        .client
        .post(srv.url("/members/decision"))
        .bearer_auth(&owner)
        .json(&json!({ "userId": member_id, "decision": "MAYBE" }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "NO_WORKSPACE");

    let res = srv
        .client
        .post(srv.url("/notes"))
        .bearer_auth(&owner)
        .json(&json!({ "title": "x", "content": "y", "visibility": "SECRET" }))
        .send()
        .await
        .unwrap();
    assert_eq!(error_code(res).await, "NO_WORKSPACE");
}

#[tokio::test]
async fn only_the_owner_deletes_a_workspace() {
    let srv = TestServer::spawn().await;
    let (owner, _, ws) = srv.signup("owner@acme.io").await;
    let (admin, admin_id, _) = srv.signup("admin@acme.io").await;

    srv.post("/members/invite", &owner, &ws)
        .json(&json!({ "email": "admin@acme.io", "role": "ADMIN" }))
        .send()
        .await
        .unwrap();
    srv.post("/members/decision", &owner, &ws)
        .json(&json!({ "userId": admin_id, "decision": "APPROVE" }))
        .send()
        .await
        .unwrap();

    let res = srv
        .client
        .delete(srv.url(&format!("/workspaces/{ws}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .delete(srv.url(&format!("/workspaces/{ws}")))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.post("/workspaces/switch", &owner, &ws).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
