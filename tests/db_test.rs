// tests/db_test.rs
//
// 需要真实 MongoDB 的端到端测试。默认忽略，运行方式：
//   MONGO_URI=mongodb://localhost:27017 cargo test --test db_test -- --ignored
// 每个测试使用独立的随机数据库，结束时删除。
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use config::Environment;
use futures::future::join_all;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Database,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use woodhy_api::{
    core::{config::Config, constants::COLLECTION_USERS, database},
    routes::create_router,
    state::AppState,
};

struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn spawn() -> Option<Self> {
        let uri = std::env::var("MONGO_URI").ok().filter(|uri| !uri.trim().is_empty())?;

        let mut env = config::Map::new();
        env.insert("MONGO_URI".to_string(), uri);
        env.insert("JWT_SECRET".to_string(), "db-test-secret".to_string());
        env.insert(
            "MONGO_DB_NAME".to_string(),
            format!("woodhy_test_{}", ObjectId::new().to_hex()),
        );
        let config =
            Config::from_environment(Environment::default().try_parsing(true).source(Some(env)))
                .expect("test config");

        let db = database::connect(&config).await.expect("MongoDB reachable");
        database::ensure_indexes(&db).await.expect("indexes");

        Some(Self {
            router: create_router(AppState::new(db.clone(), config)),
            db,
        })
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = if body.is_null() {
            Body::empty()
        } else {
            Body::from(body.to_string())
        };

        let response = self.send(builder.body(body).unwrap()).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// 注册并返回 `(user, token)`。
    async fn register(&self, name: &str, email: &str) -> (Value, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                json!({ "name": name, "email": email, "password": "secret123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        let token = body["data"]["token"].as_str().unwrap().to_string();
        (body["data"]["user"].clone(), token)
    }

    async fn create_product(&self, token: &str, name: &str, price: f64) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/products",
                Some(token),
                json!({ "name": name, "price": price, "category": "chairs" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }

    async fn cleanup(self) {
        self.db.drop().await.unwrap();
    }
}

macro_rules! app_or_skip {
    () => {
        match TestApp::spawn().await {
            Some(app) => app,
            None => {
                eprintln!("MONGO_URI not set, skipping");
                return;
            }
        }
    };
}

#[tokio::test]
#[ignore = "requires MongoDB via MONGO_URI"]
async fn register_returns_user_and_token_and_only_first_is_admin() {
    let app = app_or_skip!();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({ "name": "alice", "email": "Alice@Example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 201);
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (second, _) = app.register("bob", "bob@example.com").await;
    assert_eq!(second["role"], "user");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB via MONGO_URI"]
async fn concurrent_first_registrations_promote_exactly_one_admin() {
    let app = app_or_skip!();

    let registrations = (0..8).map(|i| {
        app.call(
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({ "name": format!("user{i}"), "email": format!("user{i}@example.com"), "password": "secret123" }),
        )
    });
    let results = join_all(registrations).await;

    let admins = results
        .iter()
        .inspect(|(status, body)| assert_eq!(*status, StatusCode::CREATED, "{body}"))
        .filter(|(_, body)| body["data"]["user"]["role"] == "admin")
        .count();
    assert_eq!(admins, 1);

    let stored_admins = app
        .db
        .collection::<mongodb::bson::Document>(COLLECTION_USERS)
        .count_documents(doc! { "role": "admin" })
        .await
        .unwrap();
    assert_eq!(stored_admins, 1);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB via MONGO_URI"]
async fn duplicate_email_is_a_conflict() {
    let app = app_or_skip!();
    app.register("alice", "alice@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({ "name": "alice2", "email": "ALICE@example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["msg"], "Email already exists");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB via MONGO_URI"]
async fn login_checks_password_and_me_returns_profile() {
    let app = app_or_skip!();
    app.register("alice", "alice@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Invalid credentials");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "email": "alice@example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app.call(Method::GET, "/api/v1/auth/me", Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB via MONGO_URI"]
async fn product_lifecycle_end_to_end() {
    let app = app_or_skip!();
    let (admin, token) = app.register("admin", "admin@example.com").await;
    let (_, user_token) = app.register("bob", "bob@example.com").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/products",
            Some(&user_token),
            json!({ "name": "Stool", "price": 5.0, "category": "chairs" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let created = app.create_product(&token, "Oak chair", 120.0).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["created_by"], admin["id"]);
    assert_eq!(created["featured"], false);

    let uri = format!("/api/v1/products/{id}");
    let (status, body) = app.call(Method::GET, &uri, None, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Oak chair");

    let (status, body) = app
        .call(Method::PUT, &uri, Some(&token), json!({ "price": 99.5, "featured": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 99.5);
    assert_eq!(body["data"]["featured"], true);
    assert_eq!(body["data"]["name"], "Oak chair");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call(Method::GET, &uri, None, Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], format!("No product with id: {id}"));

    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires MongoDB via MONGO_URI"]
async fn list_pages_sorts_and_filters() {
    let app = app_or_skip!();
    let (_, token) = app.register("admin", "admin@example.com").await;
    for (name, price) in [("Walnut table", 30.0), ("Pine shelf", 10.0), ("Oak table", 20.0)] {
        app.create_product(&token, name, price).await;
    }

    let prices = |body: &Value| -> Vec<f64> {
        body["data"]["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["price"].as_f64().unwrap())
            .collect()
    };

    let (status, body) = app
        .call(Method::GET, "/api/v1/products?sort=price&limit=2&page=1", None, Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 2);
    assert_eq!(prices(&body), vec![10.0, 20.0]);

    let (_, body) = app
        .call(Method::GET, "/api/v1/products?sort=price&limit=2&page=2", None, Value::Null)
        .await;
    assert_eq!(prices(&body), vec![30.0]);

    let (_, body) = app
        .call(Method::GET, "/api/v1/products?sort=-price", None, Value::Null)
        .await;
    assert_eq!(prices(&body), vec![30.0, 20.0, 10.0]);

    let (_, body) = app
        .call(Method::GET, "/api/v1/products?name=TABLE&sort=price", None, Value::Null)
        .await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(prices(&body), vec![20.0, 30.0]);

    app.cleanup().await;
}
