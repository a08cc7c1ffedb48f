//! Jira REST API client.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{TaskDetails, TaskInfoProvider, TrackerError};

/// HTTP request timeout for Jira API calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the REST API below the Jira host.
const API_PATH: &str = "rest/api/latest/";

/// Connection settings for a Jira instance.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Host name such as `example.atlassian.net`, or a full base URL.
    pub host: String,
    /// User name or account email.
    pub user: String,
    /// Password or API token.
    pub password: String,
}

/// Jira project as returned by `GET /project`.
#[derive(Deserialize)]
struct Project {
    key: String,
}

/// Jira issue as returned by `GET /issue/{id}`.
#[derive(Deserialize)]
struct Issue {
    #[serde(default)]
    fields: Option<IssueFields>,
}

#[derive(Deserialize, Default)]
struct IssueFields {
    creator: Option<User>,
    assignee: Option<User>,
    status: Option<Named>,
    #[serde(rename = "issuetype")]
    issue_type: Option<Named>,
    project: Option<Named>,
    summary: Option<String>,
}

#[derive(Deserialize)]
struct User {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct Named {
    name: Option<String>,
}

impl From<IssueFields> for TaskDetails {
    fn from(fields: IssueFields) -> Self {
        Self {
            creator: fields.creator.and_then(|u| u.display_name),
            assignee: fields.assignee.and_then(|u| u.display_name),
            status: fields.status.and_then(|n| n.name),
            issue_type: fields.issue_type.and_then(|n| n.name),
            project: fields.project.and_then(|n| n.name),
            summary: fields.summary,
        }
    }
}

/// Jira API client.
pub struct JiraClient {
    /// HTTP client for API requests.
    client: Client,
    /// REST API root, always ending in `/`.
    base_url: Url,
    user: String,
    password: String,
}

impl JiraClient {
    /// Creates a new Jira client.
    ///
    /// A bare host is reached over HTTPS; a host that already carries an
    /// `http://` or `https://` scheme is used as given.
    pub fn new(config: JiraConfig) -> Result<Self, TrackerError> {
        let base_url = api_base_url(&config.host)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::NetworkError(e.to_string()))?;

        debug!(base_url = %base_url, user = %config.user, "Created Jira client");

        Ok(Self {
            client,
            base_url,
            user: config.user,
            password: config.password,
        })
    }

    async fn get(&self, endpoint: &str) -> Result<Response, TrackerError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| TrackerError::ApiRequestFailed(format!("{endpoint}: {e}")))?;

        debug!(url = %url, "Sending Jira API request");

        self.client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TrackerError::NetworkError(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TrackerError> {
        response
            .json()
            .await
            .map_err(|e| TrackerError::InvalidResponseFormat(e.to_string()))
    }

    async fn projects(&self) -> Result<Vec<String>, TrackerError> {
        let response = self.get("project").await?;
        let response = check_status(response, None).await?;
        let projects: Vec<Project> = Self::decode(response).await?;

        debug!(project_count = projects.len(), "Fetched Jira projects");

        Ok(projects.into_iter().map(|p| p.key).collect())
    }

    async fn issue(&self, task_id: &str) -> Result<TaskDetails, TrackerError> {
        let response = self.get(&format!("issue/{task_id}")).await?;
        let response = check_status(response, Some(task_id)).await?;
        let issue: Issue = Self::decode(response).await?;

        debug!(task_id = %task_id, "Fetched Jira issue");

        Ok(issue.fields.unwrap_or_default().into())
    }
}

impl TaskInfoProvider for JiraClient {
    fn list_project_keys(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, TrackerError>> + Send + '_>> {
        Box::pin(self.projects())
    }

    fn fetch_task_details<'a>(
        &'a self,
        task_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TaskDetails, TrackerError>> + Send + 'a>> {
        Box::pin(self.issue(task_id))
    }
}

fn api_base_url(host: &str) -> Result<Url, TrackerError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(TrackerError::InvalidHost(host.to_string()));
    }

    let root = if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}/")
    } else {
        format!("https://{host}/")
    };

    Url::parse(&root)
        .and_then(|url| url.join(API_PATH))
        .map_err(|_| TrackerError::InvalidHost(host.to_string()))
}

/// Maps non-success statuses to tracker errors.
///
/// `task_id` names the task for a 404; without it a 404 is a plain failure.
async fn check_status(
    response: Response,
    task_id: Option<&str>,
) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = task_id {
            return Err(TrackerError::NotFound(id.to_string()));
        }
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(TrackerError::Unauthorized(status.as_u16()));
    }

    let error_text = response.text().await.unwrap_or_else(|e| {
        debug!("Failed to read error response body: {e}");
        String::new()
    });
    Err(TrackerError::ApiRequestFailed(format!(
        "HTTP {status}: {error_text}"
    )))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{basic_auth, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> JiraClient {
        JiraClient::new(JiraConfig {
            host: server.uri(),
            user: "bot".to_string(),
            password: "secret".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn bare_host_uses_https() {
        let url = api_base_url("jira.example.com").unwrap();
        assert_eq!(url.as_str(), "https://jira.example.com/rest/api/latest/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let url = api_base_url("http://localhost:8080/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/rest/api/latest/");
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(
            api_base_url("  "),
            Err(TrackerError::InvalidHost(_))
        ));
    }

    #[tokio::test]
    async fn lists_project_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/project"))
            .and(basic_auth("bot", "secret"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "10000", "key": "ABC", "name": "Alpha"},
                {"id": "10001", "key": "OPS", "name": "Operations"}
            ])))
            .mount(&server)
            .await;

        let keys = client_for(&server).list_project_keys().await.unwrap();
        assert_eq!(keys, vec!["ABC", "OPS"]);
    }

    #[tokio::test]
    async fn fetches_task_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/issue/ABC-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key": "ABC-1",
                "fields": {
                    "creator": {"displayName": "Ada Lovelace"},
                    "assignee": null,
                    "status": {"name": "Done"},
                    "issuetype": {"name": "Bug"},
                    "project": {"name": "Alpha", "key": "ABC"},
                    "summary": "Login fails on Sundays"
                }
            })))
            .mount(&server)
            .await;

        let details = client_for(&server)
            .fetch_task_details("ABC-1")
            .await
            .unwrap();
        assert_eq!(
            details,
            TaskDetails {
                creator: Some("Ada Lovelace".to_string()),
                assignee: None,
                status: Some("Done".to_string()),
                issue_type: Some("Bug".to_string()),
                project: Some("Alpha".to_string()),
                summary: Some("Login fails on Sundays".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn null_fields_yield_empty_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/issue/ABC-5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"key": "ABC-5", "fields": null})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/issue/ABC-6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "ABC-6"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        for id in ["ABC-5", "ABC-6"] {
            let details = client.fetch_task_details(id).await.unwrap();
            assert_eq!(details, TaskDetails::default());
        }
    }

    #[tokio::test]
    async fn missing_issue_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/issue/ABC-404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_task_details("ABC-404")
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(id) if id == "ABC-404"));
    }

    #[tokio::test]
    async fn rejected_credentials_are_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/project"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).list_project_keys().await.unwrap_err();
        assert!(matches!(err, TrackerError::Unauthorized(401)));
    }

    #[tokio::test]
    async fn server_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/issue/ABC-2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_task_details("ABC-2")
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::ApiRequestFailed(msg) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/latest/project"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_project_keys().await.unwrap_err();
        assert!(matches!(err, TrackerError::InvalidResponseFormat(_)));
    }
}
