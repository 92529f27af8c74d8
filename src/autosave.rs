// src/autosave.rs - Auto-save debounce scheduler
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};

use crate::{QnError, Result};

#[derive(Debug, Clone)]
pub enum AutosaveCommand {
    /// A qualifying edit happened; arm the timer, or re-arm it if pending
    Edit,
    /// Discard any pending auto-save without firing it
    Cancel,
    /// Stop the scheduler task
    Stop,
}

/// Debounce scheduler for editor auto-saves.
///
/// Each `Edit` command cancels-and-reschedules a single fixed-delay timer;
/// timers never stack, so at most one save notification fires per quiet
/// period, timed from the last edit. The notification is delivered on a
/// channel and the owning task performs the actual save, keeping all store
/// access on the app task.
pub struct AutosaveScheduler {
    /// Channel to send commands to the scheduler task
    command_tx: mpsc::Sender<AutosaveCommand>,

    /// Handle to the scheduler task
    scheduler_task: Option<JoinHandle<()>>,
}

impl AutosaveScheduler {
    /// Spawns the scheduler task with the given debounce delay and returns
    /// the scheduler handle plus the save-notification receiver.
    pub fn start(delay: Duration) -> (Self, mpsc::Receiver<()>) {
        info!("Starting auto-save scheduler with delay {:?}", delay);
        let (command_tx, mut command_rx) = mpsc::channel(16);
        let (save_tx, save_rx) = mpsc::channel(8);

        let task = tokio::spawn(async move {
            let sleeper = time::sleep(delay);
            tokio::pin!(sleeper);
            let mut armed = false;

            loop {
                tokio::select! {
                    () = &mut sleeper, if armed => {
                        armed = false;
                        debug!("Auto-save window elapsed");
                        if save_tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    cmd = command_rx.recv() => match cmd {
                        Some(AutosaveCommand::Edit) => {
                            sleeper.as_mut().reset(Instant::now() + delay);
                            armed = true;
                        }
                        Some(AutosaveCommand::Cancel) => {
                            armed = false;
                        }
                        Some(AutosaveCommand::Stop) | None => {
                            debug!("Auto-save scheduler stopping");
                            break;
                        }
                    }
                }
            }
        });

        let scheduler = Self {
            command_tx,
            scheduler_task: Some(task),
        };

        (scheduler, save_rx)
    }

    /// Reports a qualifying edit, arming or re-arming the debounce timer.
    pub async fn note_edited(&self) -> Result<()> {
        self.send(AutosaveCommand::Edit).await
    }

    /// Discards the pending auto-save, if any.
    pub async fn cancel_pending(&self) -> Result<()> {
        self.send(AutosaveCommand::Cancel).await
    }

    /// Stops the scheduler task and waits for it to finish.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.scheduler_task.take() {
            if let Err(e) = self.command_tx.send(AutosaveCommand::Stop).await {
                error!("Failed to send stop command to auto-save scheduler: {}", e);
            }

            task.await.map_err(|e| QnError::ApplicationError {
                message: format!("Failed to stop auto-save scheduler: {}", e),
            })?;
        }
        Ok(())
    }

    async fn send(&self, command: AutosaveCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| QnError::ApplicationError {
                message: format!("Auto-save scheduler is gone: {}", e),
            })
    }
}
