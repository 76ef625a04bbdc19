//! Console session: maps operator commands onto the poller and dispatcher.
//!
//! Commands that talk to the service run as independent tasks so a slow
//! request never blocks the prompt. Only the confirmation before clearing
//! the queue runs inline, since it reads from the same input.

use std::future::Future;
use std::sync::Arc;

use labeldeck_adapter_terminal::{Command, ConsoleInput, HELP, ParseError};
use labeldeck_app::dashboard::Dashboard;
use labeldeck_app::dispatcher::CommandDispatcher;
use labeldeck_app::poller::Poller;
use labeldeck_app::ports::{Clock, PrinterApi};
use labeldeck_domain::print::PrintMode;

/// Whether the session goes on after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything a command may touch.
pub struct Session<A, C> {
    pub dispatcher: Arc<CommandDispatcher<A, C>>,
    pub poller: Poller<A>,
    pub input: ConsoleInput,
}

impl<A, C> Session<A, C>
where
    A: PrinterApi + 'static,
    C: Clock + 'static,
{
    fn dashboard(&self) -> &Dashboard {
        self.dispatcher.refresher().dashboard()
    }

    fn spawn<F, Fut>(&self, command: F)
    where
        F: FnOnce(Arc<CommandDispatcher<A, C>>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(command(Arc::clone(&self.dispatcher)));
    }

    fn invalid(&self, err: &impl std::fmt::Display) {
        self.dashboard().error(format!("\u{274C} {err}"));
    }

    /// Read and execute lines until `quit`, end of input, or Ctrl-C.
    pub async fn run(&mut self) {
        loop {
            let line = tokio::select! {
                line = self.input.next_line() => line,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted");
                    break;
                }
            };
            let Some(line) = line else {
                tracing::info!("input closed");
                break;
            };
            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command).await == Flow::Quit {
                        break;
                    }
                }
                Err(ParseError::Empty) => {}
                Err(err) => self.invalid(&err),
            }
        }
        self.poller.stop();
    }

    /// Execute one command.
    pub async fn execute(&mut self, command: Command) -> Flow {
        tracing::debug!(?command, "execute");
        match command {
            Command::Status => self.spawn(|d| async move { d.refresher().refresh_status().await }),
            Command::Queue => self.spawn(|d| async move { d.refresher().refresh_queue().await }),
            Command::Info => self.spawn(|d| async move {
                d.refresher().refresh_calibration_info().await;
            }),
            Command::Reconnect => self.spawn(|d| async move { d.force_reconnect().await }),
            Command::Connect => self.spawn(|d| async move { d.manual_connect().await }),
            Command::Clear => {
                if self.dispatcher.confirm_clear_queue(&self.input).await {
                    self.spawn(|d| async move { d.clear_queue_confirmed().await });
                }
            }
            Command::Print(text) => self.print(text, PrintMode::Immediate),
            Command::Enqueue(text) => self.print(text, PrintMode::Queued),
            Command::Text(text) => self.dashboard().set_text(text),
            Command::Font(pixels) => {
                if let Err(err) = self.dashboard().set_font_size(pixels) {
                    self.invalid(&err);
                }
            }
            Command::Offset(x, y) => {
                if let Err(err) = self.dashboard().set_offsets(x, y) {
                    self.invalid(&err);
                }
            }
            Command::Thickness(thickness) => {
                if let Err(err) = self.dashboard().set_border_thickness(thickness) {
                    self.invalid(&err);
                }
            }
            Command::TestLabel => self.spawn(|d| async move { d.test_label().await }),
            Command::TestConnection => self.spawn(|d| async move { d.test_connection().await }),
            Command::Init => self.spawn(|d| async move { d.init_printer().await }),
            Command::Heartbeat => self.spawn(|d| async move { d.heartbeat().await }),
            Command::Calibrate(mode) => self.spawn(move |d| async move { d.calibrate(mode).await }),
            Command::Hide => self.poller.set_visible(false),
            Command::Show => self.poller.set_visible(true),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn print(&self, text: Option<String>, mode: PrintMode) {
        if let Some(text) = text {
            self.dashboard().set_text(text);
        }
        self.spawn(move |d| async move { d.print_text(mode).await });
    }
}
