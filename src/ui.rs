// UI side effects
// The client never talks to a screen directly; it raises these callbacks

/// Host-side UI surface consumed by the client.
///
/// `toast` carries user-visible failure messages, `redirect_to_login` is the
/// forced-logout navigation. Implementations must tolerate being called from
/// any task.
pub trait UiHandler: Send + Sync {
    /// Show a short user-visible notification
    fn toast(&self, message: &str);

    /// Send the user to the sign-in screen after the session ended
    fn redirect_to_login(&self);
}

/// Default handler that routes both side effects to the log
pub struct LoggingUi;

impl UiHandler for LoggingUi {
    fn toast(&self, message: &str) {
        tracing::warn!("[toast] {}", message);
    }

    fn redirect_to_login(&self) {
        tracing::warn!("Session ended, sign-in required");
    }
}
