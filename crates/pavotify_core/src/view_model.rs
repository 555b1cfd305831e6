use crate::Phase;

/// Render-ready snapshot of the session, published to observers after every update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub phase: Phase,
    pub progress_percent: u8,
    pub status_message: String,
    /// True while a session occupies the controller; hosts disable new starts.
    pub busy: bool,
}
