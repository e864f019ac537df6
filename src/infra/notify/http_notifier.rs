use crate::domain::ports::NotificationDispatcher;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Hands registration-status notices to the portal's broadcast service.
/// Whether the resident gets an in-app banner or an SMS is decided there.
pub struct HttpNotifier {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpNotifier {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct NoticePayload {
    recipient_id: String,
    category: String,
    title: String,
    body: String,
}

#[async_trait]
impl NotificationDispatcher for HttpNotifier {
    async fn notify_registration_status(&self, user_id: &str, event_title: &str, status: &str) -> Result<(), AppError> {
        let verdict = match status {
            "APPROVED" => "approved",
            "REJECTED" => "declined",
            other => other,
        };

        let payload = NoticePayload {
            recipient_id: user_id.to_string(),
            category: "sk-events".to_string(),
            title: "Registration update".to_string(),
            body: format!("Your registration for \"{}\" was {}.", event_title, verdict),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Notification service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Notification service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
