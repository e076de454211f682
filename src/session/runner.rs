use super::session::RecorderSession;
use super::state::SessionStatus;
use crate::encoder::EncoderEvent;
use crate::error::RecorderError;
use std::future::pending;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep_until;
use tracing::{debug, info};

/// Commands accepted by the session runner
#[derive(Debug)]
pub enum SessionCommand {
    Start {
        reply: oneshot::Sender<Result<SessionStatus, RecorderError>>,
    },
    Stop {
        reply: oneshot::Sender<SessionStatus>,
    },
    Teardown {
        reply: oneshot::Sender<SessionStatus>,
    },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
}

/// Cloneable front end to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    status: watch::Receiver<SessionStatus>,
}

impl SessionHandle {
    pub async fn start(&self) -> Result<SessionStatus, RecorderError> {
        self.request(|reply| SessionCommand::Start { reply }).await?
    }

    pub async fn stop(&self) -> Result<SessionStatus, RecorderError> {
        self.request(|reply| SessionCommand::Stop { reply }).await
    }

    pub async fn teardown(&self) -> Result<SessionStatus, RecorderError> {
        self.request(|reply| SessionCommand::Teardown { reply }).await
    }

    pub async fn status(&self) -> Result<SessionStatus, RecorderError> {
        self.request(|reply| SessionCommand::Status { reply }).await
    }

    /// Latest published status without a round trip
    pub fn current(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified after every transition; no-op commands stay silent
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, RecorderError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| RecorderError::SessionClosed)?;
        rx.await.map_err(|_| RecorderError::SessionClosed)
    }
}

/// Spawn the task that owns `session` and serializes commands and encoder
/// events through it.
///
/// The task ends, tearing the session down, once every [`SessionHandle`] is dropped.
pub fn spawn(
    session: RecorderSession,
    events: mpsc::UnboundedReceiver<EncoderEvent>,
) -> (SessionHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::channel(32);
    let (status_tx, status_rx) = watch::channel(session.status());

    let task = tokio::spawn(run(session, events, commands_rx, status_tx));

    let handle = SessionHandle {
        commands: commands_tx,
        status: status_rx,
    };

    (handle, task)
}

async fn run(
    mut session: RecorderSession,
    mut events: mpsc::UnboundedReceiver<EncoderEvent>,
    mut commands: mpsc::Receiver<SessionCommand>,
    status: watch::Sender<SessionStatus>,
) {
    info!("Session runner started");

    loop {
        let deadline = session.finalize_deadline();

        tokio::select! {
            // Drain encoder events before looking at new commands
            biased;

            Some(event) = events.recv() => {
                session.handle_event(event);
                publish(&session, &status);
            }

            _ = async {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => pending::<()>().await,
                }
            } => {
                session.expire_finalize();
                publish(&session, &status);
            }

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("All session handles dropped");
                    break;
                };
                handle_command(&mut session, &status, command).await;
            }
        }
    }

    session.teardown();
    publish(&session, &status);

    info!("Session runner stopped");
}

/// Apply a command, publishing the resulting status before replying
async fn handle_command(
    session: &mut RecorderSession,
    status: &watch::Sender<SessionStatus>,
    command: SessionCommand,
) {
    match command {
        SessionCommand::Start { reply } => {
            let result = session.start().await;
            let current = publish(session, status);
            let _ = reply.send(result.map(|_| current));
        }
        SessionCommand::Stop { reply } => {
            let current = if session.stop() {
                publish(session, status)
            } else {
                session.status()
            };
            let _ = reply.send(current);
        }
        SessionCommand::Teardown { reply } => {
            session.teardown();
            let _ = reply.send(publish(session, status));
        }
        SessionCommand::Status { reply } => {
            let _ = reply.send(session.status());
        }
    }
}

/// Notify subscribers only when the status actually changed
fn publish(session: &RecorderSession, status: &watch::Sender<SessionStatus>) -> SessionStatus {
    let current = session.status();
    status.send_if_modified(|published| {
        if *published == current {
            return false;
        }
        *published = current.clone();
        true
    });
    current
}
