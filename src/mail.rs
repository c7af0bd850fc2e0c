use askama::Template;
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::MailConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("could not render email: {0}")]
    Render(#[from] askama::Error),
}

/// A message submitted through the contact form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmail<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    sent_at: &'a str,
}

/// Forwards contact-form messages to a SendGrid-compatible mail API.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_email: String,
    from_name: String,
    to_email: String,
}

impl Mailer {
    /// Returns `None` when no API key is configured.
    pub fn from_config(client: reqwest::Client, config: &MailConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: api_key.to_string(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            to_email: config.to_email.clone(),
        })
    }

    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        let sent_at = Local::now().format("%d %B %Y, %H:%M").to_string();
        let payload = self.payload(message, &sent_at)?;

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Contact message from {} forwarded ({})", message.email, status);
        Ok(())
    }

    fn payload(&self, message: &ContactMessage, sent_at: &str) -> Result<Value, MailError> {
        let text = format!(
            "PORTFOLIO FEEDBACK\n\nFrom: {}\nEmail: {}\n\nMessage:\n{}\n\nSent: {}\n",
            message.name, message.email, message.message, sent_at
        );
        let html = ContactEmail {
            name: &message.name,
            email: &message.email,
            message: &message.message,
            sent_at,
        }
        .render()?;

        Ok(json!({
            "personalizations": [{ "to": [{ "email": self.to_email }] }],
            "from": { "email": self.from_email, "name": self.from_name },
            "reply_to": { "email": message.email, "name": message.name },
            "subject": format!("Portfolio feedback from {}", message.name),
            "content": [
                { "type": "text/plain", "value": text },
                { "type": "text/html", "value": html }
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Mailer {
        let config = MailConfig {
            api_key: Some("SG.test".to_string()),
            to_email: "class@example.com".to_string(),
            ..MailConfig::default()
        };
        Mailer::from_config(reqwest::Client::new(), &config).unwrap()
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = MailConfig::default();
        assert!(Mailer::from_config(reqwest::Client::new(), &config).is_none());

        let blank = MailConfig {
            api_key: Some("  ".to_string()),
            ..MailConfig::default()
        };
        assert!(Mailer::from_config(reqwest::Client::new(), &blank).is_none());
    }

    #[test]
    fn payload_addresses_configured_recipient() {
        let message = ContactMessage {
            name: "Hilmi".to_string(),
            email: "hilmi@example.com".to_string(),
            message: "Halo!\nSalam kenal".to_string(),
        };
        let payload = mailer().payload(&message, "01 January 2025, 10:00").unwrap();

        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "class@example.com"
        );
        assert_eq!(payload["reply_to"]["email"], "hilmi@example.com");
        assert_eq!(payload["subject"], "Portfolio feedback from Hilmi");
        let text = payload["content"][0]["value"].as_str().unwrap();
        assert!(text.contains("Halo!\nSalam kenal"));
        let html = payload["content"][1]["value"].as_str().unwrap();
        assert!(html.contains("Halo!<br/>Salam kenal"));
    }

    #[test]
    fn html_body_escapes_user_input() {
        let message = ContactMessage {
            name: "<script>".to_string(),
            email: "a@b.c".to_string(),
            message: "1 < 2 & \"ok\"".to_string(),
        };
        let payload = mailer().payload(&message, "now").unwrap();
        let html = payload["content"][1]["value"].as_str().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("1 &lt; 2 &amp; &quot;ok&quot;"));
    }

    #[test]
    fn line_breaks_survive_escaping() {
        let html = ContactEmail {
            name: "Raka",
            email: "raka@example.com",
            message: "a<b\nc",
            sent_at: "now",
        }
        .render()
        .unwrap();
        assert!(html.contains("<div>a&lt;b<br/>c</div>"));
    }
}
