//! HTTP client for the consultation analysis backend.
//!
//! Both endpoints answer with an `{ok, data}` envelope. The fallible fetch
//! methods surface every failure as a [`SourceError`]; [`SourceClient::load_consultation`]
//! absorbs them so callers always receive a well-formed bundle.

use std::time::Duration;

use consultlens_core::{ConsultationMeta, LoadedConsultation, Provenance, normalize_rows};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{endpoint} responded with ok=false")]
    NotOk { endpoint: String },
    #[error("consultation {id} not found")]
    NotFound { id: u64 },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// Client for the `/api/consultations` and `/api/comments/{bill}` endpoints.
pub struct SourceClient {
    client: reqwest::Client,
    base_url: String,
}

impl SourceClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:5000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Like [`new`](Self::new), with a per-request timeout.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the consultation list. Entries without a usable id are skipped.
    pub async fn fetch_consultations(&self) -> Result<Vec<ConsultationMeta>, SourceError> {
        let url = format!("{}/api/consultations", self.base_url);
        let rows = self.get_envelope(&url, "consultations").await?;

        let total = rows.len();
        let metas: Vec<ConsultationMeta> =
            rows.iter().filter_map(ConsultationMeta::from_value).collect();
        if metas.len() < total {
            warn!(
                skipped = total - metas.len(),
                "consultation entries without a usable id"
            );
        }
        info!(count = metas.len(), "fetched consultations");
        Ok(metas)
    }

    /// Look up one consultation in the list.
    pub async fn find_consultation(&self, id: u64) -> Result<ConsultationMeta, SourceError> {
        self.fetch_consultations()
            .await?
            .into_iter()
            .find(|meta| meta.id == id)
            .ok_or(SourceError::NotFound { id })
    }

    /// Fetch raw comment rows for a bill key, untouched.
    pub async fn fetch_comment_rows(&self, bill_key: &str) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/api/comments/{}", self.base_url, bill_key);
        let rows = self.get_envelope(&url, "comments").await?;
        info!(bill_key, count = rows.len(), "fetched comment rows");
        Ok(rows)
    }

    /// Load metadata and normalised comments for consultation `id`.
    ///
    /// Never fails. A missing consultation or any failure fetching the list
    /// yields the placeholder bundle; so does a transport or parse failure on
    /// the comments call. A comments envelope with `ok: false` keeps the live
    /// metadata with no comments.
    pub async fn load_consultation(&self, id: u64) -> LoadedConsultation {
        let meta = match self.find_consultation(id).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(id, error = %e, "consultation metadata unavailable, using placeholder");
                return LoadedConsultation::degraded(id, e.to_string());
            }
        };

        let bill_key = meta.bill_key();
        let rows = match self.fetch_comment_rows(&bill_key).await {
            Ok(rows) => rows,
            Err(e @ SourceError::NotOk { .. }) => {
                warn!(id, bill_key = %bill_key, error = %e, "no comment data");
                Vec::new()
            }
            Err(e) => {
                warn!(id, bill_key = %bill_key, error = %e, "loading comments failed, using placeholder");
                return LoadedConsultation::degraded(id, e.to_string());
            }
        };

        let comments = normalize_rows(&rows, meta.id);
        info!(id, comments = comments.len(), "consultation loaded");
        LoadedConsultation {
            meta,
            comments,
            provenance: Provenance::Live,
        }
    }

    async fn get_envelope(&self, url: &str, endpoint: &str) -> Result<Vec<Value>, SourceError> {
        info!(url = %url, "requesting {endpoint}");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        if !envelope.ok {
            return Err(SourceError::NotOk {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(envelope.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consultlens_core::{ConsultationStatus, Stance};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn consultations_body() -> Value {
        json!({
            "ok": true,
            "data": [
                {
                    "id": 1,
                    "title": "Draft Companies (Amendment) Bill, 2025",
                    "description": "Amendments to CSR and audit provisions",
                    "status": "In Progress",
                    "submissions": 2,
                    "endDate": "2025-09-30"
                },
                {
                    "id": "2",
                    "title": "Insolvency & Bankruptcy Code (Second Amendment)",
                    "status": "Analysis Complete",
                    "bill": "ibc_second_amendment"
                },
                { "title": "entry without id" }
            ]
        })
    }

    async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn source_client_trims_trailing_slash() {
        let client = SourceClient::new("http://localhost:5000/".into());
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn envelope_defaults() {
        let env: Envelope = serde_json::from_str("{}").unwrap();
        assert!(!env.ok);
        assert!(env.data.is_none());
        let env: Envelope = serde_json::from_str(r#"{"ok": true, "data": null}"#).unwrap();
        assert!(env.ok);
        assert!(env.data.is_none());
    }

    #[tokio::test]
    async fn fetch_consultations_skips_entries_without_id() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, consultations_body()).await;

        let client = SourceClient::new(server.uri());
        let metas = client.fetch_consultations().await.unwrap();
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].status, ConsultationStatus::InProgress);
        assert_eq!(metas[1].id, 2);
        assert_eq!(metas[1].bill_key(), "ibc_second_amendment");
    }

    #[tokio::test]
    async fn load_consultation_happy_path() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, consultations_body()).await;
        mount_json(
            &server,
            "/api/comments/bill_1",
            200,
            json!({
                "ok": true,
                "data": [
                    {"comments_id": 11, "sentiment": "Negative", "confidence_score": 4.2,
                     "commenter_name": "ACME Corp", "created_at": "2025-08-14T10:30:00Z"},
                    {"id": 12, "stance": "Positive", "submitter": "Jane Doe"}
                ]
            }),
        )
        .await;

        let client = SourceClient::new(server.uri());
        let loaded = client.load_consultation(1).await;
        assert_eq!(loaded.provenance, Provenance::Live);
        assert_eq!(loaded.meta.title, "Draft Companies (Amendment) Bill, 2025");
        assert_eq!(loaded.comments.len(), 2);
        assert_eq!(loaded.comments[0].id, "11");
        assert_eq!(loaded.comments[0].date, "2025-08-14");
        assert_eq!(loaded.comments[1].stance, Stance::Positive);
        assert!(loaded.comments.iter().all(|c| c.consultation_id == 1));
    }

    #[tokio::test]
    async fn load_consultation_uses_bill_field() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, consultations_body()).await;
        mount_json(
            &server,
            "/api/comments/ibc_second_amendment",
            200,
            json!({"ok": true, "data": [{"stance": "Neutral"}]}),
        )
        .await;

        let client = SourceClient::new(server.uri());
        let loaded = client.load_consultation(2).await;
        assert_eq!(loaded.provenance, Provenance::Live);
        assert_eq!(loaded.comments.len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_yields_placeholder() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, consultations_body()).await;

        let client = SourceClient::new(server.uri());
        let loaded = client.load_consultation(42).await;
        assert!(loaded.is_placeholder());
        assert_eq!(loaded.meta.id, 42);
        assert_eq!(loaded.meta.status, ConsultationStatus::Draft);
        assert_eq!(loaded.meta.submissions, 0);
        assert!(loaded.comments.is_empty());
    }

    #[tokio::test]
    async fn not_ok_list_yields_placeholder() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, json!({"ok": false})).await;

        let client = SourceClient::new(server.uri());
        assert!(matches!(
            client.fetch_consultations().await,
            Err(SourceError::NotOk { .. })
        ));
        let loaded = client.load_consultation(1).await;
        assert!(loaded.is_placeholder());
        assert!(loaded.comments.is_empty());
    }

    #[tokio::test]
    async fn server_error_yields_placeholder() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 500, json!({"error": "boom"})).await;

        let client = SourceClient::new(server.uri());
        assert!(matches!(
            client.fetch_consultations().await,
            Err(SourceError::Server { status: 500, .. })
        ));
        assert!(client.load_consultation(1).await.is_placeholder());
    }

    #[tokio::test]
    async fn malformed_json_yields_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/consultations"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = SourceClient::new(server.uri());
        assert!(matches!(
            client.fetch_consultations().await,
            Err(SourceError::Json(_))
        ));
        assert!(client.load_consultation(1).await.is_placeholder());
    }

    #[tokio::test]
    async fn not_ok_comments_keep_live_meta() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, consultations_body()).await;
        mount_json(&server, "/api/comments/bill_1", 200, json!({"ok": false})).await;

        let client = SourceClient::new(server.uri());
        let loaded = client.load_consultation(1).await;
        assert_eq!(loaded.provenance, Provenance::Live);
        assert_eq!(loaded.meta.submissions, 2);
        assert!(loaded.comments.is_empty());
    }

    #[tokio::test]
    async fn comments_server_error_yields_placeholder() {
        let server = MockServer::start().await;
        mount_json(&server, "/api/consultations", 200, consultations_body()).await;
        // No mock for the comments route: wiremock answers 404.

        let client = SourceClient::new(server.uri());
        let loaded = client.load_consultation(1).await;
        assert!(loaded.is_placeholder());
        assert_eq!(loaded.meta.title, "Consultation");
    }

    #[tokio::test]
    async fn unreachable_backend_yields_placeholder() {
        let client =
            SourceClient::with_timeout("http://127.0.0.1:1".into(), Duration::from_secs(2))
                .unwrap();
        assert!(matches!(
            client.fetch_consultations().await,
            Err(SourceError::Http(_))
        ));
        let loaded = client.load_consultation(5).await;
        assert!(loaded.is_placeholder());
        assert_eq!(loaded.meta.id, 5);
    }
}
