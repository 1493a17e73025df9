//! Alerting layer: forwards high-severity events to an operator channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub level: Level,
    pub message: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<(String, String)>,
}

impl AlertMessage {
    fn summary(&self) -> String {
        let mut text = format!(
            "[{}] {} ({}) at {}",
            self.level, self.message, self.target, self.timestamp
        );
        for (name, value) in &self.fields {
            text.push_str(&format!("\n  {name} = {value}"));
        }
        text
    }
}

#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Least severe level that raises an alert.
    pub min_level: Level,
    /// Alerts queued before new ones are dropped.
    pub buffer_size: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_level: Level::ERROR,
            buffer_size: 100,
        }
    }
}

#[async_trait::async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Failed to send alert: {0}")]
    SendError(String),
}

/// Prints alerts to stderr.
pub struct ConsoleAlertSender;

#[async_trait::async_trait]
impl AlertSender for ConsoleAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        eprintln!("ALERT {}", alert.summary());
        Ok(())
    }
}

/// Posts alerts as `{"text": ...}` to a chat webhook.
pub struct WebhookAlertSender {
    url: String,
    client: reqwest::Client,
}

impl WebhookAlertSender {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertSender for WebhookAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let payload = serde_json::json!({ "text": format!("blogicum: {}", alert.summary()) });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Tracing layer that queues qualifying events for a background sender.
/// Must be built inside a Tokio runtime.
pub struct AlertLayer {
    sender: mpsc::Sender<AlertMessage>,
    min_level: Level,
}

impl AlertLayer {
    pub fn new(alert_sender: Arc<dyn AlertSender>, config: AlertConfig) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertMessage>(config.buffer_size.max(1));

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                if let Err(e) = alert_sender.send(alert).await {
                    // logging here would feed the layer again
                    eprintln!("{e}");
                }
            }
        });

        Self {
            sender: tx,
            min_level: config.min_level,
        }
    }

    pub fn console(config: AlertConfig) -> Self {
        Self::new(Arc::new(ConsoleAlertSender), config)
    }

    pub fn webhook(url: String, config: AlertConfig) -> Self {
        Self::new(Arc::new(WebhookAlertSender::new(url)), config)
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        // Level orders verbosity: ERROR is the smallest.
        if level > self.min_level {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let alert = AlertMessage {
            level,
            message: visitor.message,
            target: event.metadata().target().to_string(),
            timestamp: Utc::now(),
            fields: visitor.fields,
        };

        // Full queue drops the alert rather than blocking the caller.
        let _ = self.sender.try_send(alert);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<AlertMessage>>);

    #[async_trait::async_trait]
    impl AlertSender for Recorder {
        async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
            if let Ok(mut alerts) = self.0.lock() {
                alerts.push(alert);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_only_errors_raise_alerts() {
        let recorder = Arc::new(Recorder::default());
        let layer = AlertLayer::new(recorder.clone(), AlertConfig::default());
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk almost full");
            tracing::error!(post_id = 7, "write failed");
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let alerts = recorder.0.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "write failed");
        assert_eq!(alerts[0].fields, vec![("post_id".to_string(), "7".to_string())]);
    }
}
