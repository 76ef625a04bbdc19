//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{Local, TimeZone};

use labeldeck_domain::calibration::{CalibrationInfo, CalibrationOutcome, CalibrationRequest};
use labeldeck_domain::command::{
    CommandOutcome, ConnectionTestOutcome, HeartbeatOutcome, InitOutcome, ManualConnectOutcome,
    PrintOutcome,
};
use labeldeck_domain::connection::StatusReport;
use labeldeck_domain::error::DashboardError;
use labeldeck_domain::print::PrintRequest;
use labeldeck_domain::queue::QueueSnapshot;
use labeldeck_domain::time::Timestamp;

use crate::ports::{Clock, Confirm, PrinterApi};

/// Canned reply of a fake endpoint.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Transport(&'static str),
    Decode(&'static str),
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, DashboardError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Transport(msg) => Err(DashboardError::Transport((*msg).into())),
            Self::Decode(msg) => Err(DashboardError::Decode((*msg).into())),
        }
    }
}

impl<T: Default> Default for Reply<T> {
    fn default() -> Self {
        Self::Ok(T::default())
    }
}

/// Request recorded by [`FakePrinterApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status,
    QueueStatus,
    CalibrationInfo,
    ForceReconnect,
    ClearQueue,
    ManualConnect,
    PrintText(PrintRequest),
    TestConnection,
    InitPrinter,
    Heartbeat,
    Calibrate(CalibrationRequest),
}

/// Scriptable [`PrinterApi`] that records every call at invocation time.
pub struct FakePrinterApi {
    pub calls: Mutex<Vec<Call>>,
    pub status: Mutex<Reply<StatusReport>>,
    /// Consumed first, one entry per status call: delay then reply.
    pub status_script: Mutex<VecDeque<(Duration, Reply<StatusReport>)>>,
    pub queue: Mutex<Reply<QueueSnapshot>>,
    pub info: Mutex<Reply<CalibrationInfo>>,
    pub reconnect: Mutex<Reply<CommandOutcome>>,
    pub clear: Mutex<Reply<CommandOutcome>>,
    pub manual: Mutex<Reply<ManualConnectOutcome>>,
    pub print: Mutex<Reply<PrintOutcome>>,
    pub test: Mutex<Reply<ConnectionTestOutcome>>,
    pub init: Mutex<Reply<InitOutcome>>,
    pub heartbeat: Mutex<Reply<HeartbeatOutcome>>,
    pub calibration: Mutex<Reply<CalibrationOutcome>>,
}

impl Default for FakePrinterApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: Mutex::new(Reply::default()),
            status_script: Mutex::new(VecDeque::new()),
            queue: Mutex::new(Reply::Ok(QueueSnapshot {
                size: 0,
                running: true,
                recent_jobs: Vec::new(),
            })),
            info: Mutex::new(Reply::Ok(sample_info())),
            reconnect: Mutex::new(Reply::default()),
            clear: Mutex::new(Reply::default()),
            manual: Mutex::new(Reply::default()),
            print: Mutex::new(Reply::default()),
            test: Mutex::new(Reply::default()),
            init: Mutex::new(Reply::default()),
            heartbeat: Mutex::new(Reply::default()),
            calibration: Mutex::new(Reply::default()),
        }
    }
}

impl FakePrinterApi {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn status_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Status))
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded print requests, oldest first.
    pub fn print_requests(&self) -> Vec<PrintRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::PrintText(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }
}

pub fn sample_info() -> CalibrationInfo {
    CalibrationInfo {
        printer_width_pixels: 384,
        printer_width_mm: 48.0,
        label_width_px: 320,
        label_height_px: 240,
        label_width_mm: 40.0,
        label_height_mm: 30.0,
        pixels_per_mm: 8.0,
        available_modes: vec![
            "border".to_string(),
            "grid".to_string(),
            "rulers".to_string(),
            "corners".to_string(),
            "series".to_string(),
        ],
    }
}

fn reply<T: Clone + Send + 'static>(
    slot: &Mutex<Reply<T>>,
) -> impl Future<Output = Result<T, DashboardError>> + Send + use<T> {
    let result = slot.lock().unwrap().to_result();
    async move { result }
}

impl PrinterApi for FakePrinterApi {
    fn status(&self) -> impl Future<Output = Result<StatusReport, DashboardError>> + Send {
        self.record(Call::Status);
        let scripted = self.status_script.lock().unwrap().pop_front();
        let (delay, result) = match scripted {
            Some((delay, reply)) => (delay, reply.to_result()),
            None => (Duration::ZERO, self.status.lock().unwrap().to_result()),
        };
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }

    fn queue_status(&self) -> impl Future<Output = Result<QueueSnapshot, DashboardError>> + Send {
        self.record(Call::QueueStatus);
        reply(&self.queue)
    }

    fn calibration_info(
        &self,
    ) -> impl Future<Output = Result<CalibrationInfo, DashboardError>> + Send {
        self.record(Call::CalibrationInfo);
        reply(&self.info)
    }

    fn force_reconnect(
        &self,
    ) -> impl Future<Output = Result<CommandOutcome, DashboardError>> + Send {
        self.record(Call::ForceReconnect);
        reply(&self.reconnect)
    }

    fn clear_queue(&self) -> impl Future<Output = Result<CommandOutcome, DashboardError>> + Send {
        self.record(Call::ClearQueue);
        reply(&self.clear)
    }

    fn manual_connect(
        &self,
    ) -> impl Future<Output = Result<ManualConnectOutcome, DashboardError>> + Send {
        self.record(Call::ManualConnect);
        reply(&self.manual)
    }

    fn print_text(
        &self,
        request: &PrintRequest,
    ) -> impl Future<Output = Result<PrintOutcome, DashboardError>> + Send {
        self.record(Call::PrintText(request.clone()));
        reply(&self.print)
    }

    fn test_connection(
        &self,
    ) -> impl Future<Output = Result<ConnectionTestOutcome, DashboardError>> + Send {
        self.record(Call::TestConnection);
        reply(&self.test)
    }

    fn init_printer(&self) -> impl Future<Output = Result<InitOutcome, DashboardError>> + Send {
        self.record(Call::InitPrinter);
        reply(&self.init)
    }

    fn heartbeat(&self) -> impl Future<Output = Result<HeartbeatOutcome, DashboardError>> + Send {
        self.record(Call::Heartbeat);
        reply(&self.heartbeat)
    }

    fn calibrate(
        &self,
        request: &CalibrationRequest,
    ) -> impl Future<Output = Result<CalibrationOutcome, DashboardError>> + Send {
        self.record(Call::Calibrate(*request));
        reply(&self.calibration)
    }
}

/// [`Clock`] frozen at a fixed local time.
pub struct FixedClock(pub Timestamp);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Local.with_ymd_and_hms(2024, 5, 17, 12, 34, 56).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// [`Confirm`] that always answers the same and remembers the prompts.
pub struct ScriptedConfirm {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let answer = self.answer;
        async move { answer }
    }
}

/// Let spawned tasks that are ready run to completion.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
