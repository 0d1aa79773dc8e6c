use crate::domain::ports::{MailTransport, OutgoingEmail};
use crate::error::{PayoutError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Mail transport backed by the Resend HTTP API.
///
/// `from` must be a sender on a domain verified with Resend; the API rejects
/// anything else with a useful message, which is surfaced verbatim in the
/// dispatch error.
pub struct ResendTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl ResendTransport {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self::with_api_url(RESEND_API_URL, api_key, from)
    }

    /// Injectable endpoint for tests.
    pub fn with_api_url(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [email.to],
                "subject": email.subject,
                "html": email.html,
                "text": strip_tags(&email.html),
            }))
            .send()
            .await
            .map_err(|e| PayoutError::Dispatch(format!("send failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(PayoutError::Dispatch(message));
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| PayoutError::Dispatch(format!("send response: {e}")))?;
        Ok(body.id)
    }
}

/// Plain-text fallback body: tags removed, whitespace collapsed.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        let html = "<div>Hello  <strong>world</strong></div>\n<p>bye</p>";
        assert_eq!(strip_tags(html), "Hello world bye");
    }

    #[test]
    fn test_strip_tags_plain_text_passthrough() {
        assert_eq!(strip_tags("just text"), "just text");
    }
}
