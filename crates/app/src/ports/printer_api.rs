//! Printer API port: every read and command exposed by the printer service.
//!
//! Reads map to `GET` endpoints, commands to `POST` endpoints with
//! form-encoded bodies. Implementations report transport and decode failures
//! as [`DashboardError::Transport`] / [`DashboardError::Decode`]; an
//! application-level failure is a successfully decoded outcome whose
//! `success` flag is `false`.

use std::future::Future;

use labeldeck_domain::calibration::{CalibrationInfo, CalibrationOutcome, CalibrationRequest};
use labeldeck_domain::command::{
    CommandOutcome, ConnectionTestOutcome, HeartbeatOutcome, InitOutcome, ManualConnectOutcome,
    PrintOutcome,
};
use labeldeck_domain::connection::StatusReport;
use labeldeck_domain::error::DashboardError;
use labeldeck_domain::print::PrintRequest;
use labeldeck_domain::queue::QueueSnapshot;

/// Client for the printer service API.
pub trait PrinterApi: Send + Sync {
    /// `GET /api/status`.
    fn status(&self) -> impl Future<Output = Result<StatusReport, DashboardError>> + Send;

    /// `GET /api/queue-status`.
    fn queue_status(&self) -> impl Future<Output = Result<QueueSnapshot, DashboardError>> + Send;

    /// `GET /api/calibration/info`.
    fn calibration_info(
        &self,
    ) -> impl Future<Output = Result<CalibrationInfo, DashboardError>> + Send;

    /// `POST /api/force-reconnect`.
    fn force_reconnect(
        &self,
    ) -> impl Future<Output = Result<CommandOutcome, DashboardError>> + Send;

    /// `POST /api/clear-queue`.
    fn clear_queue(&self) -> impl Future<Output = Result<CommandOutcome, DashboardError>> + Send;

    /// `POST /api/manual-connect`.
    fn manual_connect(
        &self,
    ) -> impl Future<Output = Result<ManualConnectOutcome, DashboardError>> + Send;

    /// `POST /api/print-text`.
    fn print_text(
        &self,
        request: &PrintRequest,
    ) -> impl Future<Output = Result<PrintOutcome, DashboardError>> + Send;

    /// `POST /api/test-connection`.
    fn test_connection(
        &self,
    ) -> impl Future<Output = Result<ConnectionTestOutcome, DashboardError>> + Send;

    /// `POST /api/init-printer`.
    fn init_printer(&self) -> impl Future<Output = Result<InitOutcome, DashboardError>> + Send;

    /// `POST /api/heartbeat`.
    fn heartbeat(&self) -> impl Future<Output = Result<HeartbeatOutcome, DashboardError>> + Send;

    /// `POST /api/calibration/{mode}`.
    fn calibrate(
        &self,
        request: &CalibrationRequest,
    ) -> impl Future<Output = Result<CalibrationOutcome, DashboardError>> + Send;
}
