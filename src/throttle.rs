use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

/// Debounces redraw requests from the metric streams.
///
/// The first request arms a window; requests made while the window is open
/// are absorbed. When the window elapses one notification is pushed to the
/// paired receiver, so the consumer repaints at most once per window no
/// matter how many snapshots arrived in the meantime.
pub struct UpdateThrottler {
    armed: Arc<AtomicBool>,
    window: Duration,
    tx: mpsc::Sender<()>,
}

impl UpdateThrottler {
    pub fn new(window: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let throttler = Self {
            armed: Arc::new(AtomicBool::new(false)),
            window,
            tx,
        };
        (throttler, rx)
    }

    /// Requests a refresh. Returns whether this call armed the window;
    /// callers only use the return value in tests, the notification itself
    /// travels through the receiver.
    pub fn notify(&self) -> bool {
        if self.armed.swap(true, Ordering::AcqRel) {
            return false;
        }
        let armed = Arc::clone(&self.armed);
        let tx = self.tx.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            armed.store(false, Ordering::Release);
            // A still-undrained notification means the consumer already has
            // a repaint pending; dropping this one loses nothing.
            let _ = tx.try_send(());
        });
        true
    }
}
