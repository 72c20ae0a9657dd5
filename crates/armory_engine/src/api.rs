use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::news::{NewsArticle, NewsError};
use crate::{
    Accepted, CategoryProgress, CategoryStatus, JobPhase, ScrapeRequest, StatusError,
    StatusSnapshot, SubmitError, TaskId, SUBMISSION_FAILED_MESSAGE,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Client seam for the remote acquisition service.
#[async_trait::async_trait]
pub trait ArmoryApi: Send + Sync {
    async fn submit(&self, request: &ScrapeRequest) -> Result<Accepted, SubmitError>;

    async fn status(&self, task_id: &TaskId) -> Result<StatusSnapshot, StatusError>;

    async fn latest_news(&self) -> Result<Vec<NewsArticle>, NewsError>;
}

#[derive(Debug, Error)]
#[error("failed to set up http client: {0}")]
pub struct HttpClientError(String);

#[derive(Debug, Clone)]
pub struct HttpArmoryApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpArmoryApi {
    pub fn new(settings: ApiSettings) -> Result<Self, HttpClientError> {
        let mut base =
            Url::parse(&settings.base_url).map_err(|err| HttpClientError(err.to_string()))?;
        // Url::join treats the last path segment as a file unless the base
        // ends with a slash.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| HttpClientError(err.to_string()))?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &'static str) -> Url {
        self.base
            .join(path)
            .expect("static endpoint path is a valid url fragment")
    }

    fn status_endpoint(&self, task_id: &TaskId) -> Result<Url, StatusError> {
        self.base
            .join(&format!("api/status/{task_id}"))
            .map_err(|err| StatusError::Malformed(format!("invalid status url: {err}")))
    }
}

#[derive(Serialize)]
struct ScrapeBody<'a> {
    country_name: &'a str,
    power: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponseBody {
    success: Option<bool>,
    task_id: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponseBody {
    success: Option<bool>,
    status: Option<String>,
    progress: Option<f64>,
    message: Option<String>,
    current_power_type: Option<String>,
    data: Option<BTreeMap<String, CategoryEntryBody>>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntryBody {
    status: Option<String>,
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct NewsResponseBody {
    news: Option<Vec<NewsArticle>>,
}

#[async_trait::async_trait]
impl ArmoryApi for HttpArmoryApi {
    async fn submit(&self, request: &ScrapeRequest) -> Result<Accepted, SubmitError> {
        let body = ScrapeBody {
            country_name: request.country_name(),
            power: request.power().wire_name(),
        };

        // The server reports rejections inside the json body, so the http
        // status code is not inspected here.
        let response = self
            .client
            .post(self.endpoint("api/scrape"))
            .json(&body)
            .send()
            .await
            .map_err(|err| SubmitError::Unreachable(err.to_string()))?;

        let body: ScrapeResponseBody = response
            .json()
            .await
            .map_err(|err| SubmitError::Malformed(err.to_string()))?;

        if body.success == Some(true) {
            match body.task_id.and_then(TaskId::new) {
                Some(task_id) => Ok(Accepted {
                    task_id,
                    message: body.message,
                }),
                None => Err(SubmitError::Malformed(
                    "submission accepted without a task id".to_string(),
                )),
            }
        } else {
            Err(SubmitError::Rejected {
                message: body
                    .message
                    .unwrap_or_else(|| SUBMISSION_FAILED_MESSAGE.to_string()),
            })
        }
    }

    async fn status(&self, task_id: &TaskId) -> Result<StatusSnapshot, StatusError> {
        let response = self
            .client
            .get(self.status_endpoint(task_id)?)
            .send()
            .await
            .map_err(|err| StatusError::Transport(err.to_string()))?;

        let code = response.status();
        if !code.is_success() {
            return Err(StatusError::Http(code.as_u16()));
        }

        let body: StatusResponseBody = response
            .json()
            .await
            .map_err(|err| StatusError::Malformed(err.to_string()))?;

        snapshot_from_body(body)
    }

    async fn latest_news(&self) -> Result<Vec<NewsArticle>, NewsError> {
        let response = self
            .client
            .get(self.endpoint("api/get-latest-news"))
            .send()
            .await
            .map_err(|err| NewsError::Transport(err.to_string()))?;

        let code = response.status();
        if !code.is_success() {
            return Err(NewsError::Http(code.as_u16()));
        }

        let body: NewsResponseBody = response
            .json()
            .await
            .map_err(|err| NewsError::Malformed(err.to_string()))?;

        Ok(body.news.unwrap_or_default())
    }
}

/// Converts a raw status payload into a snapshot.
///
/// `status` and `progress` are mandatory; a tick missing either (or carrying
/// an unknown phase, or `success != true`) is malformed as a whole and gets
/// skipped by the poll loop. The optional descriptive fields pass through as
/// reported. Category entries are lenient: a missing status reads as pending.
fn snapshot_from_body(body: StatusResponseBody) -> Result<StatusSnapshot, StatusError> {
    if body.success != Some(true) {
        return Err(StatusError::Malformed(
            "success flag missing or false".to_string(),
        ));
    }
    let phase = body
        .status
        .as_deref()
        .and_then(JobPhase::from_wire)
        .ok_or_else(|| StatusError::Malformed("missing or unknown status".to_string()))?;
    let progress = body
        .progress
        .ok_or_else(|| StatusError::Malformed("missing progress".to_string()))?
        .clamp(0.0, 100.0);

    let data = body
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(category, entry)| {
            let status = entry
                .status
                .as_deref()
                .and_then(CategoryStatus::from_wire)
                .unwrap_or(CategoryStatus::Pending);
            (
                category,
                CategoryProgress {
                    status,
                    count: entry.count,
                },
            )
        })
        .collect();

    Ok(StatusSnapshot {
        phase,
        progress,
        message: body.message,
        current_power: body.current_power_type,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_status(json: &str) -> Result<StatusSnapshot, StatusError> {
        let body: StatusResponseBody = serde_json::from_str(json).unwrap();
        snapshot_from_body(body)
    }

    #[test]
    fn snapshot_requires_status_and_progress() {
        assert!(matches!(
            raw_status(r#"{"success":true,"progress":10}"#),
            Err(StatusError::Malformed(_))
        ));
        assert!(matches!(
            raw_status(r#"{"success":true,"status":"running"}"#),
            Err(StatusError::Malformed(_))
        ));
        assert!(matches!(
            raw_status(r#"{"status":"running","progress":10}"#),
            Err(StatusError::Malformed(_))
        ));
    }

    #[test]
    fn snapshot_clamps_progress() {
        let snap = raw_status(r#"{"success":true,"status":"running","progress":130.5}"#).unwrap();
        assert_eq!(snap.progress, 100.0);
        let snap = raw_status(r#"{"success":true,"status":"running","progress":-3}"#).unwrap();
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn snapshot_parses_category_map() {
        let snap = raw_status(
            r#"{
                "success": true,
                "status": "running",
                "progress": 55,
                "current_power_type": "navalpower",
                "data": {
                    "airpower": {"status": "success", "count": 42},
                    "navalpower": {"status": "pending", "count": 0},
                    "landpower": {}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(snap.phase, JobPhase::Running);
        assert_eq!(snap.current_power.as_deref(), Some("navalpower"));
        assert_eq!(
            snap.data["airpower"],
            CategoryProgress {
                status: CategoryStatus::Success,
                count: 42
            }
        );
        assert_eq!(snap.data["landpower"].status, CategoryStatus::Pending);
    }

    #[test]
    fn unknown_phase_is_malformed() {
        assert!(matches!(
            raw_status(r#"{"success":true,"status":"paused","progress":10}"#),
            Err(StatusError::Malformed(_))
        ));
    }
}
