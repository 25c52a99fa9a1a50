// GitHub REST client against a local mock server
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockito::Server;
use storefill::error::FetchError;
use storefill::github::{GitHubClient, RepositoryHost, RepositoryReference};
use storefill::util::SecretString;

fn repo() -> RepositoryReference {
    RepositoryReference::parse("https://github.com/owner/repo").unwrap()
}

fn contents_body(text: &str) -> String {
    serde_json::json!({
        "name": "file",
        "encoding": "base64",
        "content": STANDARD.encode(text),
    })
    .to_string()
}

#[tokio::test]
async fn test_repository_stats() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/owner/repo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"full_name": "owner/repo", "stargazers_count": 100, "open_issues_count": 5,
                "updated_at": "2024-05-13T00:00:00Z"}"#,
        )
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    let stats = client.repository_stats(&repo()).await.unwrap();

    assert_eq!(stats.stars, 100);
    assert_eq!(stats.open_issues, 5);
    assert_eq!(stats.last_updated, "2024-05-13T00:00:00Z");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_repository_stats_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/owner/repo")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    let err = client.repository_stats(&repo()).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_file_contents_decoded() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/owner/repo/contents/README.md")
        .with_status(200)
        .with_body(contents_body("# Test Extension\nThis is a test."))
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    let text = client.file_contents(&repo(), "README.md").await.unwrap();
    assert_eq!(text, "# Test Extension\nThis is a test.");
}

#[tokio::test]
async fn test_file_contents_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/owner/repo/contents/LICENSE")
        .with_status(404)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    let err = client.file_contents(&repo(), "LICENSE").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)));
    assert!(err.is_expected());
}

#[tokio::test]
async fn test_file_contents_server_error_is_transport() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/owner/repo/contents/README.md")
        .with_status(502)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    let err = client.file_contents(&repo(), "README.md").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert!(!err.is_expected());
}

#[tokio::test]
async fn test_directory_listing_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/owner/repo/contents/LICENSE")
        .with_status(200)
        .with_body(r#"[{"name": "MIT.txt", "type": "file"}]"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    let err = client.file_contents(&repo(), "LICENSE").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/owner/repo/contents/manifest.json")
        .match_header("authorization", "Bearer ghp_test")
        .match_header("accept", "application/vnd.github+json")
        .with_status(200)
        .with_body(contents_body("{}"))
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(
        server.url(),
        Some(SecretString::new("ghp_test".to_string())),
    )
    .unwrap();
    client.file_contents(&repo(), "manifest.json").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anonymous_requests_carry_user_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/owner/repo/contents/manifest.json")
        .match_header("user-agent", mockito::Matcher::Regex("^storefill/".to_string()))
        .match_header("authorization", mockito::Matcher::Missing)
        .with_status(200)
        .with_body(contents_body("{}"))
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(server.url(), None).unwrap();
    client.file_contents(&repo(), "manifest.json").await.unwrap();
    mock.assert_async().await;
}
