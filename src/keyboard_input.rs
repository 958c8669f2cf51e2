use crate::error::Result;
use crate::events::{ControlEvent, ControlSender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::time::Duration;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Map a key to the control event it triggers
pub fn control_for_key(code: KeyCode) -> Option<ControlEvent> {
    match code {
        KeyCode::Char(' ') => Some(ControlEvent::toggle()),
        KeyCode::Char('q') | KeyCode::Esc => Some(ControlEvent::shutdown("User requested via keyboard")),
        _ => None,
    }
}

/// Terminal keyboard listener: SPACE toggles recording, q or ESC quits
pub struct KeyboardInputHandler {
    sender: ControlSender,
    cancellation_token: CancellationToken,
}

impl KeyboardInputHandler {
    pub fn new(sender: ControlSender) -> Self {
        Self {
            sender,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Start listening for keyboard input
    pub async fn start(&self) -> Result<()> {
        info!("Starting keyboard input handler - press SPACE to toggle recording, q to quit");

        let sender = self.sender.clone();
        let cancellation_token = self.cancellation_token.clone();

        task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            debug!("Raw mode enabled - keyboard handler active");

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        let Ok(Event::Key(key_event)) = event::read() else {
                            continue;
                        };
                        if key_event.kind != KeyEventKind::Press {
                            continue;
                        }

                        let Some(control) = control_for_key(key_event.code) else {
                            debug!("Key pressed: {:?}", key_event.code);
                            continue;
                        };
                        let is_shutdown = matches!(control, ControlEvent::Shutdown { .. });

                        if let Err(e) = sender.blocking_send(control) {
                            warn!("Failed to deliver keyboard event: {}", e);
                            break;
                        }
                        if is_shutdown {
                            break;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            } else {
                debug!("Raw mode disabled");
            }
        });

        Ok(())
    }

    /// Stop the keyboard input handler
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        // Give the task a moment to clean up and disable raw mode
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = disable_raw_mode();

        Ok(())
    }
}
