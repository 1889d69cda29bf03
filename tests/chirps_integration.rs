//! Integration tests for posting, listing and deleting chirps

use chirpy::configuration::{ApplicationSettings, AuthSettings};
use chirpy::startup::run;
use chirpy::store::InMemoryStore;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

struct TestApp {
    address: String,
    client: reqwest::Client,
}

impl TestApp {
    /// Creates a user and returns `(user_id, access_token)`.
    async fn signed_in_user(&self, email: &str) -> (String, String) {
        let credentials = json!({"email": email, "password": "pw1"});
        let created = self
            .client
            .post(&format!("{}/api/users", self.address))
            .json(&credentials)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(created.status().as_u16(), 201);

        let session: Value = self
            .client
            .post(&format!("{}/api/login", self.address))
            .json(&credentials)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .unwrap();

        (
            session["id"].as_str().unwrap().to_string(),
            session["token"].as_str().unwrap().to_string(),
        )
    }

    async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/chirps", self.address))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let application = ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port,
        platform: "dev".to_string(),
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
    };
    let auth = AuthSettings {
        jwt_secret: "integration-test-secret".to_string(),
        polka_key: "test-polka-key".to_string(),
    };

    let server = run(listener, Arc::new(InMemoryStore::new()), application, auth)
        .expect("Failed to create server");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn validate_chirp_masks_profanity() {
    let app = spawn_app();

    let response = app
        .client
        .post(&format!("{}/api/validate_chirp", app.address))
        .json(&json!({"body": "This is a kerfuffle opinion I need to share with the world"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["cleaned_body"],
        "This is a **** opinion I need to share with the world"
    );

    let too_long = app
        .client
        .post(&format!("{}/api/validate_chirp", app.address))
        .json(&json!({ "body": "a".repeat(141) }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(too_long.status().as_u16(), 400);
}

#[tokio::test]
async fn create_chirp_requires_authentication() {
    let app = spawn_app();

    let response = app
        .client
        .post(&format!("{}/api/chirps", app.address))
        .json(&json!({"body": "hello"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 401);

    let forged = app.post_chirp("not.a.jwt", "hello").await;
    assert_eq!(forged.status().as_u16(), 401);
}

#[tokio::test]
async fn create_and_fetch_chirp() {
    let app = spawn_app();
    let (user_id, token) = app.signed_in_user("a@x.com").await;

    let response = app.post_chirp(&token, "Fornax is a word").await;
    assert_eq!(response.status().as_u16(), 201);
    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["body"], "**** is a word");
    assert_eq!(chirp["user_id"], user_id.as_str());

    let fetched = app
        .get(&format!("/api/chirps/{}", chirp["id"].as_str().unwrap()))
        .await;
    assert_eq!(fetched.status().as_u16(), 200);
    let fetched: Value = fetched.json().await.unwrap();
    assert_eq!(fetched["id"], chirp["id"]);

    let missing = app
        .get("/api/chirps/3311741c-680c-4546-99f3-fc9efac2036c")
        .await;
    assert_eq!(missing.status().as_u16(), 404);

    let malformed = app.get("/api/chirps/not-a-uuid").await;
    assert_eq!(malformed.status().as_u16(), 404);
}

#[tokio::test]
async fn list_chirps_filters_and_sorts() {
    let app = spawn_app();
    let (alice, alice_token) = app.signed_in_user("alice@x.com").await;
    let (_, bob_token) = app.signed_in_user("bob@x.com").await;

    for (token, body) in [(&alice_token, "first"), (&bob_token, "second"), (&alice_token, "third")] {
        let response = app.post_chirp(token, body).await;
        assert_eq!(response.status().as_u16(), 201);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let bodies = |list: &Value| -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect()
    };

    let asc: Value = app.get("/api/chirps").await.json().await.unwrap();
    assert_eq!(bodies(&asc), vec!["first", "second", "third"]);

    let desc: Value = app.get("/api/chirps?sort=desc").await.json().await.unwrap();
    assert_eq!(bodies(&desc), vec!["third", "second", "first"]);

    let by_alice: Value = app
        .get(&format!("/api/chirps?author_id={}&sort=desc", alice))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(&by_alice), vec!["third", "first"]);

    let bad_sort = app.get("/api/chirps?sort=sideways").await;
    assert_eq!(bad_sort.status().as_u16(), 400);

    let bad_author = app.get("/api/chirps?author_id=nobody").await;
    assert_eq!(bad_author.status().as_u16(), 400);
}

#[tokio::test]
async fn only_the_author_can_delete() {
    let app = spawn_app();
    let (_, alice_token) = app.signed_in_user("alice@x.com").await;
    let (_, bob_token) = app.signed_in_user("bob@x.com").await;

    let chirp: Value = app
        .post_chirp(&alice_token, "mine")
        .await
        .json()
        .await
        .unwrap();
    let url = format!("{}/api/chirps/{}", app.address, chirp["id"].as_str().unwrap());

    let anonymous = app
        .client
        .delete(&url)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(anonymous.status().as_u16(), 401);

    let not_owner = app
        .client
        .delete(&url)
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(not_owner.status().as_u16(), 403);

    let owner = app
        .client
        .delete(&url)
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(owner.status().as_u16(), 204);

    let again = app
        .client
        .delete(&url)
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(again.status().as_u16(), 404);
}
