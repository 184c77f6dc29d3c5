//! E2E tests for the GitHub info pages

mod common;

use common::TestServer;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_home_page_has_lookup_form() {
    let server = TestServer::new().await;

    let response = server.client.get(server.url("/")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("GitHub User Info App"));
    assert!(body.contains(r#"action="/github/users""#));
}

#[tokio::test]
async fn test_users_page_renders_summaries() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/users?usernames=ada,grace"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Ada"));
    assert!(body.contains("Followers: 5"));
    assert!(body.contains("Following: 2"));
}

#[tokio::test]
async fn test_users_page_trims_whitespace_in_list() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/users?usernames=ada,%20grace"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_users_page_missing_input_is_400() {
    let server = TestServer::new().await;

    for path in ["/github/users", "/github/users?usernames=", "/github/users?usernames=%20"] {
        let response = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 400, "path: {path}");
    }
}

#[tokio::test]
async fn test_users_page_invalid_name_fails_whole_batch() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/users?usernames=ada,-bad-"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("Error"));
    // No partial rendering of the valid half.
    assert!(!body.contains("Followers"));
}

#[tokio::test]
async fn test_users_page_unknown_user_is_404() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/users?usernames=ghost"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body = response.text().await.unwrap();
    assert!(body.contains("User ghost not found"));
}

#[tokio::test]
async fn test_users_page_upstream_failure_is_500() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/users?usernames=ada,flaky"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_repos_page_renders_list() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/repos/ada"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("GitHub Repositories for ada"));
    assert!(body.contains("engine"));
    assert!(body.contains("Stars: 42"));
    assert!(body.contains("No description available."));
}

#[tokio::test]
async fn test_repos_page_unknown_user_is_404() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/repos/ghost"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body = response.text().await.unwrap();
    assert!(body.contains("not found"));
}

#[tokio::test]
async fn test_repos_page_invalid_name_is_400() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/repos/--nope"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_contributors_page_renders_list() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/repos/ada/engine/contributors"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Contributors"));
    assert!(body.contains("ada"));
    assert!(body.contains("Contributions: 120"));
}

#[tokio::test]
async fn test_contributors_page_unknown_repo_is_404() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/repos/ada/missing/contributors"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_contributors_page_upstream_failure_is_500() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/github/repos/ada/flaky/contributors"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_404_for_unknown_routes() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/unknown/route"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}
