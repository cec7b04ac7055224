use tracing::info;

/// A best-effort notification about a report a party has expressed
/// interest in. Delivery (OS notification, toast, stdout) is up to the
/// sink; the store only decides *when* one is due.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub report_id: i64,
    pub title: String,
    pub body: String,
}

pub trait NotificationSink {
    fn notify(&self, notification: &Notification);
}

/// Default sink: emits the notification as a structured tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: &Notification) {
        info!(
            report_id = notification.report_id,
            title = %notification.title,
            body = %notification.body,
            "notification"
        );
    }
}
