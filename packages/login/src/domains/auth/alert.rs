use super::navigation::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Transient modal notification.
///
/// Navigation after a successful verify is carried as an explicit
/// `pending_navigation` tag set at the moment of success and consumed on
/// dismissal, never by matching on the display text.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
    pub pending_navigation: Option<Screen>,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            message: message.into(),
            kind: AlertKind::Success,
            pending_navigation: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            kind: AlertKind::Error,
            pending_navigation: None,
        }
    }

    pub fn with_navigation(mut self, screen: Screen) -> Self {
        self.pending_navigation = Some(screen);
        self
    }
}
