use onebox::api::models::{BulkAction, EmailQuery, Filters, Folder, StatusAction};
use onebox::api::{MailApi, OneBoxClient};
use onebox::error::AppError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and hands back the raw request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/api"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let read = socket.read(&mut chunk).await.expect("read");
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&raw).into_owned()
}

fn query() -> EmailQuery {
    EmailQuery {
        account_id: "acc-1".to_string(),
        page: 2,
        page_size: 20,
        folder: Folder::Inbox,
        search: Some("invoice".to_string()),
        filters: Filters::new(),
    }
}

#[tokio::test]
async fn list_emails_sends_paging_and_token() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"emails":[{"_id":"e1","subject":"Invoice","read":false}],"totalPages":4}"#,
    )
    .await;
    let client = OneBoxClient::new(&base_url)
        .expect("client")
        .with_token("tok-1");

    let page = client.list_emails(&query()).await.expect("list");
    let request = server.await.expect("server");

    assert_eq!(page.total_pages, 4);
    assert_eq!(page.emails.len(), 1);
    assert_eq!(page.emails[0].id, "e1");
    assert!(request.starts_with("GET /api/email/acc-1?n=20&p=2&folder=inbox&search=invoice "));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-1"));
}

#[tokio::test]
async fn missing_credentials_mean_no_accounts() {
    let (base_url, server) = serve_once("200 OK", r#"{"cred":null}"#).await;
    let client = OneBoxClient::new(&base_url).expect("client");

    let accounts = client.list_accounts().await.expect("accounts");
    server.await.expect("server");

    assert!(accounts.is_empty());
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let (base_url, server) =
        serve_once("401 Unauthorized", r#"{"message":"Not authorized"}"#).await;
    let client = OneBoxClient::new(&base_url).expect("client");

    let err = client
        .update_status("e1", StatusAction::Starred)
        .await
        .expect_err("should fail");
    let request = server.await.expect("server");

    assert!(request.starts_with("PATCH /api/email/status/e1 "));
    assert!(request.ends_with(r#"{"status":"starred"}"#));
    match err {
        AppError::Auth(message) => assert!(message.contains("Not authorized")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn bulk_update_posts_ids_and_action() {
    let (base_url, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
    let client = OneBoxClient::new(&base_url).expect("client");

    client
        .bulk_update(&["a".to_string(), "b".to_string()], BulkAction::Trash)
        .await
        .expect("bulk");
    let request = server.await.expect("server");

    assert!(request.starts_with("PATCH /api/email/bulk-status "));
    assert!(request.ends_with(r#"{"ids":["a","b"],"action":"trash"}"#));
}

#[tokio::test]
async fn server_error_keeps_backend_message() {
    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"message":"Error fetching emails"}"#,
    )
    .await;
    let client = OneBoxClient::new(&base_url).expect("client");

    let err = client.fetch_recent("acc-1").await.expect_err("should fail");
    let request = server.await.expect("server");

    assert!(request.starts_with("POST /api/email/fetch/acc-1 "));
    assert!(matches!(err, AppError::Api(_)));
    assert!(err.to_string().contains("Error fetching emails"));
}
