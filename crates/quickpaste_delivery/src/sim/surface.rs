use super::lock;
use crate::coordinator::{Notification, Surface, TransportError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Everything the popup was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceLog {
    pub notifications: Vec<Notification>,
    pub clipboard: Option<String>,
    pub closed: usize,
}

/// A popup that records notifications, clipboard writes and closes.
#[derive(Debug, Default)]
pub struct SimSurface {
    log: Mutex<SurfaceLog>,
    clipboard_denied: Mutex<bool>,
}

impl SimSurface {
    pub fn log(&self) -> SurfaceLog {
        lock(&self.log).clone()
    }

    /// Make clipboard writes fail, as without the clipboard-write permission.
    pub fn deny_clipboard(&self) {
        *lock(&self.clipboard_denied) = true;
    }
}

#[async_trait]
impl Surface for SimSurface {
    async fn write_clipboard(&self, text: &str) -> Result<(), TransportError> {
        if *lock(&self.clipboard_denied) {
            return Err(TransportError::Runtime(
                "Write permission denied.".to_string(),
            ));
        }
        lock(&self.log).clipboard = Some(text.to_string());
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        lock(&self.log).notifications.push(notification);
    }

    fn close(&self) {
        lock(&self.log).closed += 1;
    }
}
