//! Runtime event stream payloads.

/// Events emitted from the HUD command loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudEvent {
    /// The HUD window was created on first show.
    WindowCreated,
    /// A blocking spinner is showing.
    Waiting,
    /// A message is showing.
    Message {
        /// Text on screen.
        text: String,
    },
    /// The HUD was hidden and its window torn down.
    Hidden,
}
