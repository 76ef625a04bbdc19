//! # labeldeck-adapter-http-reqwest
//!
//! Driven adapter implementing [`PrinterApi`] over HTTP with
//! [reqwest](https://docs.rs/reqwest).
//!
//! ## Wire contract
//! - Reads are `GET` requests answered with JSON.
//! - Commands are `POST` requests with `application/x-www-form-urlencoded`
//!   bodies, also answered with JSON.
//! - The body is decoded whatever the status code: the service reports
//!   application failures as `{"success": false, "error": ...}` with a 4xx/5xx
//!   status. Only a non-JSON body turns into an error.
//!
//! No timeout is configured on top of reqwest's defaults and nothing is
//! retried.
//!
//! ## Dependency rule
//! Depends on `labeldeck-app` (for the port trait) and `labeldeck-domain`
//! (for the wire types). reqwest types never leave this crate.

mod config;
mod error;

use std::future::Future;

use serde::de::DeserializeOwned;

use labeldeck_app::ports::PrinterApi;
use labeldeck_domain::calibration::{CalibrationInfo, CalibrationOutcome, CalibrationRequest};
use labeldeck_domain::command::{
    CommandOutcome, ConnectionTestOutcome, HeartbeatOutcome, InitOutcome, ManualConnectOutcome,
    PrintOutcome,
};
use labeldeck_domain::connection::StatusReport;
use labeldeck_domain::error::DashboardError;
use labeldeck_domain::print::PrintRequest;
use labeldeck_domain::queue::QueueSnapshot;

pub use config::HttpConfig;
pub use error::HttpError;

const NO_FIELDS: &[(&str, String)] = &[];

/// [`PrinterApi`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpPrinterApi {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpPrinterApi {
    /// Build a client for the service at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Request`] if the TLS backend cannot be initialised.
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("labeldeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.config.url(path)).send().await?;
        decode(response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, String)],
    ) -> Result<T, HttpError> {
        tracing::debug!(path, "POST");
        let response = self
            .client
            .post(self.config.url(path))
            .form(fields)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
    let status = response.status();
    let body = response.bytes().await?;
    tracing::debug!(status = status.as_u16(), bytes = body.len(), "response");
    match serde_json::from_slice(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(HttpError::Status(status.as_u16())),
        Err(err) => Err(HttpError::Decode(err)),
    }
}

impl PrinterApi for HttpPrinterApi {
    fn status(&self) -> impl Future<Output = Result<StatusReport, DashboardError>> + Send {
        async move { Ok(self.get_json("/api/status").await?) }
    }

    fn queue_status(&self) -> impl Future<Output = Result<QueueSnapshot, DashboardError>> + Send {
        async move { Ok(self.get_json("/api/queue-status").await?) }
    }

    fn calibration_info(
        &self,
    ) -> impl Future<Output = Result<CalibrationInfo, DashboardError>> + Send {
        async move { Ok(self.get_json("/api/calibration/info").await?) }
    }

    fn force_reconnect(
        &self,
    ) -> impl Future<Output = Result<CommandOutcome, DashboardError>> + Send {
        async move { Ok(self.post_form("/api/force-reconnect", NO_FIELDS).await?) }
    }

    fn clear_queue(&self) -> impl Future<Output = Result<CommandOutcome, DashboardError>> + Send {
        async move { Ok(self.post_form("/api/clear-queue", NO_FIELDS).await?) }
    }

    fn manual_connect(
        &self,
    ) -> impl Future<Output = Result<ManualConnectOutcome, DashboardError>> + Send {
        async move { Ok(self.post_form("/api/manual-connect", NO_FIELDS).await?) }
    }

    fn print_text(
        &self,
        request: &PrintRequest,
    ) -> impl Future<Output = Result<PrintOutcome, DashboardError>> + Send {
        let fields = request.form_fields();
        async move { Ok(self.post_form("/api/print-text", &fields).await?) }
    }

    fn test_connection(
        &self,
    ) -> impl Future<Output = Result<ConnectionTestOutcome, DashboardError>> + Send {
        async move { Ok(self.post_form("/api/test-connection", NO_FIELDS).await?) }
    }

    fn init_printer(&self) -> impl Future<Output = Result<InitOutcome, DashboardError>> + Send {
        async move { Ok(self.post_form("/api/init-printer", NO_FIELDS).await?) }
    }

    fn heartbeat(&self) -> impl Future<Output = Result<HeartbeatOutcome, DashboardError>> + Send {
        async move { Ok(self.post_form("/api/heartbeat", NO_FIELDS).await?) }
    }

    fn calibrate(
        &self,
        request: &CalibrationRequest,
    ) -> impl Future<Output = Result<CalibrationOutcome, DashboardError>> + Send {
        let path = request.path();
        let fields = request.form_fields();
        async move { Ok(self.post_form(&path, &fields).await?) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Form, Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use labeldeck_domain::calibration::{CalibrationMode, CalibrationSettings};
    use labeldeck_domain::connection::ConnectionStatus;
    use labeldeck_domain::print::{FontSize, PrintMode};
    use labeldeck_domain::time;

    type Captured = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

    async fn serve(router: Router) -> HttpPrinterApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        HttpPrinterApi::new(HttpConfig {
            base_url: format!("http://{addr}"),
        })
        .unwrap()
    }

    async fn capture_print(
        State(captured): State<Captured>,
        Form(fields): Form<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        captured
            .lock()
            .unwrap()
            .push(("print-text".to_string(), fields));
        Json(json!({"success": true, "job_id": "42"}))
    }

    async fn capture_calibration(
        State(captured): State<Captured>,
        Path(mode): Path<String>,
        Form(fields): Form<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        captured.lock().unwrap().push((mode, fields));
        Json(json!({"success": true, "message": "Gitter-Test", "image_size": "320x240px"}))
    }

    #[tokio::test]
    async fn should_decode_status_report() {
        let api = serve(Router::new().route(
            "/api/status",
            get(|| async {
                Json(json!({
                    "status": "connected",
                    "connected": true,
                    "mac": "AA:BB",
                    "connection_attempts": 3,
                    "last_successful": 1_700_000_000_000_i64,
                    "queue_size": 2,
                    "stats": {"total_jobs": 10, "successful_jobs": 9, "failed_jobs": 1}
                }))
            }),
        ))
        .await;

        let report = api.status().await.unwrap();
        assert_eq!(report.status, ConnectionStatus::Connected);
        assert_eq!(report.mac.as_deref(), Some("AA:BB"));
        assert_eq!(report.stats.unwrap().failed_jobs, 1);
        assert!(report.last_successful.is_some());
        assert!(report.last_heartbeat.is_none());
    }

    #[tokio::test]
    async fn should_post_print_request_as_form_fields() {
        let captured = Captured::default();
        let api = serve(
            Router::new()
                .route("/api/print-text", post(capture_print))
                .with_state(Arc::clone(&captured)),
        )
        .await;
        let request = PrintRequest::new(
            "Hallo\nWelt",
            FontSize::try_from(18).unwrap(),
            PrintMode::Queued,
            &time::now(),
        )
        .unwrap();

        let outcome = api.print_text(&request).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.job_id.unwrap().as_str(), "42");
        let calls = captured.lock().unwrap();
        let fields = &calls[0].1;
        assert_eq!(fields["text"], "Hallo\nWelt");
        assert_eq!(fields["font_size"], "18");
        assert_eq!(fields["use_queue"], "true");
    }

    #[tokio::test]
    async fn should_post_calibration_to_mode_path() {
        let captured = Captured::default();
        let api = serve(
            Router::new()
                .route("/api/calibration/{mode}", post(capture_calibration))
                .with_state(Arc::clone(&captured)),
        )
        .await;
        let request = CalibrationRequest::new(
            CalibrationMode::Grid,
            CalibrationSettings::new(-2, 4, 2).unwrap(),
        );

        let outcome = api.calibrate(&request).await.unwrap();

        assert_eq!(outcome.image_size.as_deref(), Some("320x240px"));
        let calls = captured.lock().unwrap();
        let (mode, fields) = &calls[0];
        assert_eq!(mode, "grid");
        assert_eq!(fields["offset_x"], "-2");
        assert_eq!(fields["offset_y"], "4");
        assert_eq!(fields["spacing"], "5");
        assert!(!fields.contains_key("thickness"));
    }

    #[tokio::test]
    async fn should_decode_json_error_body_of_failed_status() {
        let api = serve(Router::new().route(
            "/api/force-reconnect",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "error": "device busy"})),
                )
                    .into_response()
            }),
        ))
        .await;

        let outcome = api.force_reconnect().await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("device busy"));
    }

    #[tokio::test]
    async fn should_report_transport_error_for_non_json_error_page() {
        let api = serve(Router::new().route(
            "/api/heartbeat",
            post(|| async { (StatusCode::BAD_GATEWAY, "<h1>Bad Gateway</h1>").into_response() }),
        ))
        .await;

        let err = api.heartbeat().await.unwrap_err();
        assert!(matches!(err, DashboardError::Transport(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn should_report_decode_error_for_garbage_body() {
        let api = serve(Router::new().route("/api/queue-status", get(|| async { "not json" }))).await;

        let err = api.queue_status().await.unwrap_err();
        assert!(matches!(err, DashboardError::Decode(_)));
    }

    #[tokio::test]
    async fn should_report_transport_error_when_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = HttpPrinterApi::new(HttpConfig {
            base_url: format!("http://{addr}"),
        })
        .unwrap();

        let err = api.init_printer().await.unwrap_err();
        assert!(matches!(err, DashboardError::Transport(_)));
    }
}
