use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Extension, Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use uuid::Uuid;

use api_core::{Argon2Hasher, JwtSigner, TokenSigner};
use users::{
    api::rest::{
        auth,
        dto::{CreateUserReq, LoginReq, TokenDto, UserDto, UserListDto},
        routes,
    },
    contract::{
        client::UsersApi,
        model::{NewUser, UserPatch},
    },
    domain::service::Service,
    gateways::local::UsersLocalClient,
    infra::storage::migrations::Migrator,
};

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test domain service
async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    Arc::new(Service::new(db, Arc::new(Argon2Hasher)))
}

/// Create a test HTTP router with the identity middleware wired on
fn create_test_router(service: Arc<Service>) -> Router {
    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::new("test-secret", 3600));
    let users_api: Arc<dyn UsersApi> = Arc::new(UsersLocalClient::new(service.clone()));

    routes::router(service)
        .layer(middleware::from_fn(auth::resolve_identity))
        .layer(Extension(users_api))
        .layer(Extension(signer))
}

fn new_user(email: &str, password: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: password.to_string(),
        is_active: true,
        is_superuser: false,
        full_name: None,
    }
}

fn new_superuser(email: &str, password: &str) -> NewUser {
    NewUser {
        is_superuser: true,
        ..new_user(email, password)
    }
}

async fn login(router: &Router, email: &str, password: &str) -> TokenDto {
    let body = serde_json::to_string(&LoginReq {
        email: email.to_string(),
        password: password.to_string(),
    })
    .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/login/access-token")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_domain_service_crud() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_user(NewUser {
            full_name: Some("Test User".to_string()),
            ..new_user("test@example.com", "secret123")
        })
        .await?;
    assert_eq!(created.email, "test@example.com");
    assert_eq!(created.full_name.as_deref(), Some("Test User"));
    assert!(created.is_active);
    assert!(!created.is_superuser);

    let retrieved = service.get_user(created.id).await?.unwrap();
    assert_eq!(retrieved.id, created.id);
    assert_eq!(retrieved.email, created.email);

    let page = service.list_users(0, 100).await?;
    assert_eq!(page.count, 1);
    assert_eq!(page.data[0].id, created.id);

    let patch = UserPatch {
        full_name: Some(Some("Updated Name".to_string())),
        ..Default::default()
    };
    let updated = service.update_user(&retrieved, patch).await?;
    assert_eq!(updated.full_name.as_deref(), Some("Updated Name"));
    assert_eq!(updated.email, "test@example.com"); // Unchanged

    // Explicit null clears the nullable field
    let patch = UserPatch {
        full_name: Some(None),
        ..Default::default()
    };
    let cleared = service.update_user(&updated, patch).await?;
    assert_eq!(cleared.full_name, None);

    assert!(service.delete_user(created.id).await?);
    assert!(service.get_user(created.id).await?.is_none());
    assert!(!service.delete_user(created.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_domain_service_validation() -> Result<()> {
    let service = create_test_service().await;

    let result = service
        .create_user(new_user("invalid-email", "secret123"))
        .await;
    assert!(result.is_err());

    let result = service.create_user(new_user("a@example.com", "short")).await;
    assert!(result.is_err());

    let result = service
        .create_user(new_user("a@example.com", &"p".repeat(129)))
        .await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_domain_service_email_uniqueness() -> Result<()> {
    let service = create_test_service().await;

    service
        .create_user(new_user("unique@example.com", "secret123"))
        .await?;

    let result = service
        .create_user(new_user("unique@example.com", "other-secret"))
        .await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_password_never_stored_in_plaintext() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_user(new_user("hash@example.com", "secret123"))
        .await?;
    assert_ne!(created.hashed_password, "secret123");
    assert!(service.verify_password("secret123", &created));

    // Changing the password re-hashes and invalidates the old one
    let patch = UserPatch {
        password: Some("new-secret-456".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(&created, patch).await?;
    assert_ne!(updated.hashed_password, created.hashed_password);
    assert!(service.verify_password("new-secret-456", &updated));
    assert!(!service.verify_password("secret123", &updated));

    Ok(())
}

#[tokio::test]
async fn test_authenticate_is_indistinguishable() -> Result<()> {
    let service = create_test_service().await;

    service
        .create_user(new_user("login@example.com", "secret123"))
        .await?;

    let ok = service.authenticate("login@example.com", "secret123").await?;
    assert!(ok.is_some());

    // Wrong password and unknown email both come back as plain None
    let wrong = service.authenticate("login@example.com", "bad-password").await?;
    assert!(wrong.is_none());
    let unknown = service.authenticate("nobody@example.com", "secret123").await?;
    assert!(unknown.is_none());

    Ok(())
}

#[tokio::test]
async fn test_empty_patch_changes_nothing() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_user(new_user("noop@example.com", "secret123"))
        .await?;
    let updated = service.update_user(&created, UserPatch::default()).await?;

    assert_eq!(updated.email, created.email);
    assert_eq!(updated.hashed_password, created.hashed_password);
    assert_eq!(updated.full_name, created.full_name);

    Ok(())
}

#[tokio::test]
async fn test_local_client() -> Result<()> {
    let service = create_test_service().await;
    let client: Arc<dyn UsersApi> = Arc::new(UsersLocalClient::new(service));

    let created = client
        .create_user(new_user("client@example.com", "secret123"))
        .await?;
    assert_eq!(created.email, "client@example.com");

    let retrieved = client.get_user(created.id).await?.unwrap();
    assert_eq!(retrieved.id, created.id);

    let patch = UserPatch {
        full_name: Some(Some("Client User".to_string())),
        ..Default::default()
    };
    let updated = client.update_user(created.id, patch).await?;
    assert_eq!(updated.full_name.as_deref(), Some("Client User"));

    assert!(client.delete_user(created.id).await?);
    assert!(client.get_user(created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_rest_login_and_test_token() -> Result<()> {
    let service = create_test_service().await;
    service
        .create_user(new_user("rest@example.com", "secret123"))
        .await?;
    let router = create_test_router(service);

    let token = login(&router, "rest@example.com", "secret123").await;
    assert_eq!(token.token_type, "bearer");

    let request = Request::builder()
        .method("POST")
        .uri("/login/test-token")
        .header("authorization", format!("Bearer {}", token.access_token))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let user: UserDto = serde_json::from_slice(&body)?;
    assert_eq!(user.email, "rest@example.com");

    Ok(())
}

#[tokio::test]
async fn test_rest_login_rejects_bad_credentials() -> Result<()> {
    let service = create_test_service().await;
    service
        .create_user(new_user("rest@example.com", "secret123"))
        .await?;
    let router = create_test_router(service);

    for (email, password) in [
        ("rest@example.com", "wrong-password"),
        ("nobody@example.com", "secret123"),
    ] {
        let body = serde_json::to_string(&LoginReq {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let request = Request::builder()
            .method("POST")
            .uri("/login/access-token")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    Ok(())
}

#[tokio::test]
async fn test_rest_requires_authentication() -> Result<()> {
    let service = create_test_service().await;
    let router = create_test_router(service);

    // No token at all
    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A present but invalid token fails in the middleware
    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .header("authorization", "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_rest_user_admin_is_superuser_only() -> Result<()> {
    let service = create_test_service().await;
    service
        .create_user(new_user("plain@example.com", "secret123"))
        .await?;
    service
        .create_user(new_superuser("admin@example.com", "admin-secret"))
        .await?;
    let router = create_test_router(service);

    let plain = login(&router, "plain@example.com", "secret123").await;
    let admin = login(&router, "admin@example.com", "admin-secret").await;

    // Plain user cannot list
    let request = Request::builder()
        .method("GET")
        .uri("/users")
        .header("authorization", format!("Bearer {}", plain.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Superuser can
    let request = Request::builder()
        .method("GET")
        .uri("/users")
        .header("authorization", format!("Bearer {}", admin.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let list: UserListDto = serde_json::from_slice(&body)?;
    assert_eq!(list.count, 2);

    // Superuser creates a user with explicit flags
    let create = CreateUserReq {
        email: "created@example.com".to_string(),
        password: "secret123".to_string(),
        is_active: true,
        is_superuser: false,
        full_name: Some("Created".to_string()),
    };
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", admin.access_token))
        .body(Body::from(serde_json::to_string(&create)?))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let user: UserDto = serde_json::from_slice(&body)?;
    assert_eq!(user.email, "created@example.com");

    Ok(())
}

#[tokio::test]
async fn test_rest_signup_and_duplicate_email() -> Result<()> {
    let service = create_test_service().await;
    let router = create_test_router(service);

    let body = serde_json::json!({
        "email": "signup@example.com",
        "password": "secret123",
        "full_name": "Sign Up",
    })
    .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/users/signup")
        .header("content-type", "application/json")
        .body(Body::from(body.clone()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let user: UserDto = serde_json::from_slice(&bytes)?;
    assert!(!user.is_superuser); // Signup never grants roles

    // Same email again conflicts
    let request = Request::builder()
        .method("POST")
        .uri("/users/signup")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_rest_password_change_flow() -> Result<()> {
    let service = create_test_service().await;
    service
        .create_user(new_user("pw@example.com", "secret123"))
        .await?;
    let router = create_test_router(service);
    let token = login(&router, "pw@example.com", "secret123").await;

    let patch_password = |body: serde_json::Value| {
        Request::builder()
            .method("PATCH")
            .uri("/users/me/password")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token.access_token))
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    // Wrong current password
    let response = router
        .clone()
        .oneshot(patch_password(serde_json::json!({
            "current_password": "wrong",
            "new_password": "brand-new-pw",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // New password equal to the current one
    let response = router
        .clone()
        .oneshot(patch_password(serde_json::json!({
            "current_password": "secret123",
            "new_password": "secret123",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid change, then old credentials stop working
    let response = router
        .clone()
        .oneshot(patch_password(serde_json::json!({
            "current_password": "secret123",
            "new_password": "brand-new-pw",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login(&router, "pw@example.com", "brand-new-pw").await;

    Ok(())
}

#[tokio::test]
async fn test_rest_get_user_by_id_access() -> Result<()> {
    let service = create_test_service().await;
    let alice = service
        .create_user(new_user("alice@example.com", "secret123"))
        .await?;
    let bob = service
        .create_user(new_user("bob@example.com", "secret123"))
        .await?;
    service
        .create_user(new_superuser("admin@example.com", "admin-secret"))
        .await?;
    let router = create_test_router(service);

    let alice_token = login(&router, "alice@example.com", "secret123").await;
    let admin_token = login(&router, "admin@example.com", "admin-secret").await;

    let get_user = |id: Uuid, token: &TokenDto| {
        Request::builder()
            .method("GET")
            .uri(format!("/users/{id}"))
            .header("authorization", format!("Bearer {}", token.access_token))
            .body(Body::empty())
            .unwrap()
    };

    // Self is always visible
    let response = router
        .clone()
        .oneshot(get_user(alice.id, &alice_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another user requires superuser
    let response = router
        .clone()
        .oneshot(get_user(bob.id, &alice_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .clone()
        .oneshot(get_user(bob.id, &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get_user(Uuid::new_v4(), &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_rest_delete_rules() -> Result<()> {
    let service = create_test_service().await;
    let plain = service
        .create_user(new_user("plain@example.com", "secret123"))
        .await?;
    let admin = service
        .create_user(new_superuser("admin@example.com", "admin-secret"))
        .await?;
    let router = create_test_router(service);

    let plain_token = login(&router, "plain@example.com", "secret123").await;
    let admin_token = login(&router, "admin@example.com", "admin-secret").await;

    // Superuser cannot delete itself, neither via /me nor by id
    let request = Request::builder()
        .method("DELETE")
        .uri("/users/me")
        .header("authorization", format!("Bearer {}", admin_token.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/users/{}", admin.id))
        .header("authorization", format!("Bearer {}", admin_token.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Superuser deletes another user
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/users/{}", plain.id))
        .header("authorization", format!("Bearer {}", admin_token.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The deleted user's token no longer resolves
    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .header("authorization", format!("Bearer {}", plain_token.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_rest_inactive_user_is_rejected() -> Result<()> {
    let service = create_test_service().await;
    let user = service
        .create_user(new_user("sleepy@example.com", "secret123"))
        .await?;
    let router = create_test_router(service.clone());

    let token = login(&router, "sleepy@example.com", "secret123").await;

    // Deactivate after the token was issued
    let patch = UserPatch {
        is_active: Some(false),
        ..Default::default()
    };
    service.update_user(&user, patch).await?;

    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .header("authorization", format!("Bearer {}", token.access_token))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
