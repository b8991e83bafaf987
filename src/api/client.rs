use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, AppResult};

use super::MailApi;
use super::endpoints;
use super::models::{
    Account, BulkAction, Counts, EmailPage, EmailQuery, Folder, StatusAction, UserProfile,
};

#[derive(Debug, Clone)]
pub struct OneBoxClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl OneBoxClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http: Client::new(),
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn check_auth(&self) -> AppResult<()> {
        let request = self.request(Method::GET, endpoints::auth_check_endpoint());
        self.expect_success(request).await
    }

    pub async fn profile(&self) -> AppResult<UserProfile> {
        self.get_json(endpoints::profile_endpoint(), None).await
    }

    /// Fetches an attachment by URL. Relative URLs resolve against the API and
    /// carry the session token; absolute ones are fetched as-is.
    pub async fn download(&self, raw_url: &str) -> AppResult<Vec<u8>> {
        let request = match Url::parse(raw_url) {
            Ok(url) => self.http.get(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.request(Method::GET, raw_url),
            Err(err) => return Err(err.into()),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_api_error(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&[(String, String)]>,
    ) -> AppResult<T> {
        let mut request = self.request(Method::GET, endpoint);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        self.parse_json_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.request(method, endpoint).json(body).send().await?;
        self.parse_json_response(response).await
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let request = self.http.request(method, self.endpoint_url(endpoint));
        match self.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        url.set_path(&path);
        url
    }

    async fn expect_success(&self, request: RequestBuilder) -> AppResult<()> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }

    async fn parse_json_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }
}

impl MailApi for OneBoxClient {
    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let response: CredentialListResponse = self
            .get_json(endpoints::credentials_endpoint(), None)
            .await?;
        Ok(response.cred.unwrap_or_default())
    }

    async fn add_account(&self, email: &str, app_password: &str) -> AppResult<Account> {
        let body = CredentialRequest {
            email,
            password: app_password,
        };
        let response: CredentialResponse = self
            .send_json(Method::POST, endpoints::credentials_endpoint(), &body)
            .await?;
        response.cred.ok_or_else(|| {
            AppError::Api("backend accepted the credentials but returned no account".to_string())
        })
    }

    async fn list_emails(&self, query: &EmailQuery) -> AppResult<EmailPage> {
        let endpoint = endpoints::email_list_endpoint(&query.account_id);
        let params = endpoints::list_query(query);
        self.get_json(&endpoint, Some(&params)).await
    }

    async fn counts(&self, account_id: &str, folder: Folder) -> AppResult<Counts> {
        let endpoint = endpoints::counts_endpoint(account_id);
        let params = endpoints::counts_query(folder);
        self.get_json(&endpoint, Some(&params)).await
    }

    async fn update_status(&self, id: &str, action: StatusAction) -> AppResult<()> {
        let body = StatusRequest { status: action };
        let request = self
            .request(Method::PATCH, &endpoints::status_endpoint(id))
            .json(&body);
        self.expect_success(request).await
    }

    async fn bulk_update(&self, ids: &[String], action: BulkAction) -> AppResult<()> {
        let body = BulkStatusRequest { ids, action };
        let request = self
            .request(Method::PATCH, endpoints::bulk_status_endpoint())
            .json(&body);
        self.expect_success(request).await
    }

    async fn fetch_recent(&self, account_id: &str) -> AppResult<()> {
        let request = self.request(Method::POST, &endpoints::fetch_recent_endpoint(account_id));
        self.expect_success(request).await
    }
}

#[derive(Debug, Deserialize)]
struct CredentialListResponse {
    cred: Option<Vec<Account>>,
}

#[derive(Debug, Deserialize)]
struct CredentialResponse {
    cred: Option<Account>,
}

#[derive(Debug, Serialize)]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct StatusRequest {
    status: StatusAction,
}

#[derive(Debug, Serialize)]
struct BulkStatusRequest<'a> {
    ids: &'a [String],
    action: BulkAction,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AppError::Auth(format!(
            "onebox api authorization failed ({status}): {message}. run `onebox auth login`"
        ));
    }

    AppError::Api(format!("onebox api request failed ({status}): {message}"))
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok()?;
    let parts = [parsed.message, parsed.error]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();

    if parts.is_empty() {
        return None;
    }

    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_forbidden_as_auth_error() {
        let error = map_api_error(StatusCode::FORBIDDEN, r#"{"message":"Invalid token"}"#);

        match error {
            AppError::Auth(message) => {
                assert!(message.contains("Invalid token"));
                assert!(message.contains("onebox auth login"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn maps_server_error_as_api_error() {
        let error = map_api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"imap unavailable","error":"ETIMEDOUT"}"#,
        );

        match error {
            AppError::Api(message) => {
                assert!(message.contains("imap unavailable, ETIMEDOUT"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_raw_body() {
        let error = map_api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(error.to_string().contains("upstream down"));

        let error = map_api_error(StatusCode::BAD_GATEWAY, "  ");
        assert!(error.to_string().contains("no error details"));
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let client = OneBoxClient::new("http://127.0.0.1:8000/api/").expect("valid url");
        let url = client.endpoint_url("/email/acc-1");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/email/acc-1");
    }

    #[test]
    fn status_request_uses_wire_names() {
        let body = serde_json::to_string(&StatusRequest {
            status: StatusAction::RemoveArchive,
        })
        .expect("serialize");
        assert_eq!(body, r#"{"status":"removearchive"}"#);
    }
}
