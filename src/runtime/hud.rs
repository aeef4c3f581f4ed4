use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use super::events::HudEvent;

/// Platform side of the HUD: one overlay window above the app.
pub trait HudPresenter: Send + 'static {
    /// Creates the overlay window.
    fn create_window(&mut self);
    /// Shows the blocking spinner.
    fn show_wait(&mut self);
    /// Shows `message`.
    fn show_message(&mut self, message: &str);
    /// Hides whatever is showing.
    fn hide(&mut self);
    /// Destroys the overlay window.
    fn destroy_window(&mut self);
}

/// What the HUD currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudMode {
    /// Blocking spinner.
    Waiting,
    /// Text message.
    Message(String),
}

/// Owns the HUD lifecycle: the window is created on first show and torn
/// down when hidden.
#[derive(Debug)]
pub struct HudContext<P: HudPresenter> {
    presenter: P,
    mode: Option<HudMode>,
}

impl<P: HudPresenter> HudContext<P> {
    /// Context with no window yet.
    pub fn new(presenter: P) -> Self {
        Self { presenter, mode: None }
    }

    /// Platform presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// What is showing, if anything.
    pub fn mode(&self) -> Option<&HudMode> {
        self.mode.as_ref()
    }

    /// True while something is showing.
    pub fn is_visible(&self) -> bool {
        self.mode.is_some()
    }

    /// Shows the blocking spinner. Returns true if the window had to be created.
    pub fn show_wait(&mut self) -> bool {
        let created = self.ensure_window();
        self.presenter.show_wait();
        self.mode = Some(HudMode::Waiting);
        created
    }

    /// Shows `message`. Returns true if the window had to be created.
    pub fn show_message(&mut self, message: &str) -> bool {
        let created = self.ensure_window();
        self.presenter.show_message(message);
        self.mode = Some(HudMode::Message(message.to_string()));
        created
    }

    /// Hides the HUD and tears its window down. Returns false if nothing was showing.
    pub fn hide(&mut self) -> bool {
        if self.mode.take().is_none() {
            return false;
        }
        self.presenter.hide();
        self.presenter.destroy_window();
        debug!("hud window torn down");
        true
    }

    fn ensure_window(&mut self) -> bool {
        if self.mode.is_some() {
            return false;
        }
        self.presenter.create_window();
        debug!("hud window created");
        true
    }
}

/// HUD handle failure.
#[derive(Debug, Error)]
pub enum HudError {
    /// The HUD loop has stopped.
    #[error("hud loop is no longer running")]
    ChannelClosed,
}

/// Cloneable handle that marshals HUD calls onto the task owning the [`HudContext`].
pub struct HudHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<HudEvent>,
}

impl Clone for HudHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    ShowWait {
        resp: oneshot::Sender<()>,
    },
    ShowMessage {
        message: String,
        resp: oneshot::Sender<()>,
    },
    Hide {
        resp: oneshot::Sender<bool>,
    },
    Mode {
        resp: oneshot::Sender<Option<HudMode>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the HUD loop on the current tokio runtime.
pub fn spawn_hud<P: HudPresenter>(presenter: P) -> HudHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(64);
    let (events_tx, _) = broadcast::channel::<HudEvent>(64);
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut hud = HudContext::new(presenter);
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut hud, &events_tx_loop) {
                break;
            }
        }
        hud.hide();
        info!("hud loop stopped");
    });

    HudHandle { cmd_tx, events_tx }
}

impl HudHandle {
    /// Subscribes to HUD events.
    pub fn subscribe(&self) -> broadcast::Receiver<HudEvent> {
        self.events_tx.subscribe()
    }

    /// Shows the blocking spinner.
    pub async fn show_wait(&self) -> Result<(), HudError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ShowWait { resp: tx }).await?;
        rx.await.map_err(|_| HudError::ChannelClosed)
    }

    /// Shows `message`.
    pub async fn show_message(&self, message: impl Into<String>) -> Result<(), HudError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ShowMessage {
            message: message.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| HudError::ChannelClosed)
    }

    /// Returns false if nothing was showing.
    pub async fn hide(&self) -> Result<bool, HudError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Hide { resp: tx }).await?;
        rx.await.map_err(|_| HudError::ChannelClosed)
    }

    /// What the HUD currently shows.
    pub async fn mode(&self) -> Result<Option<HudMode>, HudError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Mode { resp: tx }).await?;
        rx.await.map_err(|_| HudError::ChannelClosed)
    }

    /// Hides anything showing and stops the loop.
    pub async fn shutdown(&self) -> Result<(), HudError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| HudError::ChannelClosed)
    }

    async fn send(&self, cmd: Command) -> Result<(), HudError> {
        self.cmd_tx.send(cmd).await.map_err(|_| HudError::ChannelClosed)
    }
}

fn handle_command<P: HudPresenter>(
    cmd: Command,
    hud: &mut HudContext<P>,
    events_tx: &broadcast::Sender<HudEvent>,
) -> bool {
    match cmd {
        Command::ShowWait { resp } => {
            if hud.show_wait() {
                let _ = events_tx.send(HudEvent::WindowCreated);
            }
            let _ = events_tx.send(HudEvent::Waiting);
            let _ = resp.send(());
        }
        Command::ShowMessage { message, resp } => {
            if hud.show_message(&message) {
                let _ = events_tx.send(HudEvent::WindowCreated);
            }
            let _ = events_tx.send(HudEvent::Message { text: message });
            let _ = resp.send(());
        }
        Command::Hide { resp } => {
            let hidden = hud.hide();
            if hidden {
                let _ = events_tx.send(HudEvent::Hidden);
            }
            let _ = resp.send(hidden);
        }
        Command::Mode { resp } => {
            let _ = resp.send(hud.mode().cloned());
        }
        Command::Shutdown { resp } => {
            if hud.hide() {
                let _ = events_tx.send(HudEvent::Hidden);
            }
            let _ = resp.send(());
            return true;
        }
    }

    false
}
