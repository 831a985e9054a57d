use crate::domain::model::TemplateVariables;
use crate::domain::ports::Notifier;
use crate::utils::error::{DigestError, Result};
use reqwest::Client;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://api.postmarkapp.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateEmail<'a> {
    from: &'a str,
    to: &'a str,
    template_id: i64,
    template_model: TemplateModel<'a>,
    track_opens: bool,
}

#[derive(Debug, Serialize)]
struct TemplateModel<'a> {
    albums: &'a [TemplateVariables],
    title: &'a str,
    subject: &'a str,
}

pub struct PostmarkClient {
    client: Client,
    base_url: String,
    token: String,
    from_email: String,
    to_email: String,
    template_id: i64,
}

impl PostmarkClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        from_email: impl Into<String>,
        to_email: impl Into<String>,
        template_id: i64,
    ) -> Result<Self> {
        let token = token.into();
        let from_email = from_email.into();
        let to_email = to_email.into();
        if token.is_empty() || from_email.is_empty() || to_email.is_empty() {
            return Err(DigestError::ConfigError {
                message: "token, to_email or from_email can't be empty on client initialization"
                    .to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            from_email,
            to_email,
            template_id,
        })
    }
}

impl Notifier for PostmarkClient {
    async fn send(&self, subject: &str, title: &str, albums: &[TemplateVariables]) -> Result<()> {
        let email = TemplateEmail {
            from: &self.from_email,
            to: &self.to_email,
            template_id: self.template_id,
            template_model: TemplateModel {
                albums,
                title,
                subject,
            },
            track_opens: true,
        };

        let endpoint = format!("{}/email/withTemplate", self.base_url);
        tracing::debug!("Posting template email to: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header("Accept", "application/json")
            .header("X-Postmark-Server-Token", &self.token)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // body 讀取失敗視為傳輸錯誤，不吞掉
            let message = response.text().await?;
            return Err(DigestError::DeliveryError {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!("Email accepted with status {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StreamingUrl;
    use httpmock::prelude::*;

    fn vars() -> Vec<TemplateVariables> {
        vec![TemplateVariables {
            artist: "Artist X".to_string(),
            album: "Album Y".to_string(),
            release_year: 2021,
            tags: vec!["rock".to_string()],
            artwork_url: "https://img.example.com/y.jpg".to_string(),
            source_url: "https://tracker.example/torrents.php?id=1&torrentid=10".to_string(),
            streaming_urls: vec![StreamingUrl {
                url: "https://music.apple.com/de/album/11?l=en".to_string(),
                link_type: "web_streaming".to_string(),
            }],
        }]
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        for (token, from, to) in [("", "a@b.c", "d@e.f"), ("t", "", "d@e.f"), ("t", "a@b.c", "")] {
            let result = PostmarkClient::new(Client::new(), DEFAULT_BASE_URL, token, from, to, 1);
            assert!(matches!(result, Err(DigestError::ConfigError { .. })));
        }
    }

    #[tokio::test]
    async fn test_send_posts_template_model() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/email/withTemplate")
                .header("X-Postmark-Server-Token", "pm-token")
                .json_body(serde_json::json!({
                    "From": "digest@example.com",
                    "To": "me@example.com",
                    "TemplateId": 30755957,
                    "TemplateModel": {
                        "albums": [{
                            "artist": "Artist X",
                            "album": "Album Y",
                            "release_year": 2021,
                            "tags": ["rock"],
                            "artwork_url": "https://img.example.com/y.jpg",
                            "source_url": "https://tracker.example/torrents.php?id=1&torrentid=10",
                            "streaming_urls": [{
                                "url": "https://music.apple.com/de/album/11?l=en",
                                "link_type": "web_streaming"
                            }]
                        }],
                        "title": "Weekly, 1 May 2026",
                        "subject": "Weekly: Top 10 on 1 May 2026"
                    },
                    "TrackOpens": true
                }));
            then.status(200)
                .json_body(serde_json::json!({"ErrorCode": 0, "Message": "OK"}));
        });

        let client = PostmarkClient::new(
            Client::new(),
            server.base_url(),
            "pm-token",
            "digest@example.com",
            "me@example.com",
            30755957,
        )
        .unwrap();

        client
            .send("Weekly: Top 10 on 1 May 2026", "Weekly, 1 May 2026", &vars())
            .await
            .unwrap();

        api_mock.assert();
    }

    #[tokio::test]
    async fn test_send_rejected_is_delivery_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/email/withTemplate");
            then.status(422).body(r#"{"ErrorCode": 1101, "Message": "Template not found"}"#);
        });

        let client = PostmarkClient::new(
            Client::new(),
            server.base_url(),
            "pm-token",
            "digest@example.com",
            "me@example.com",
            1,
        )
        .unwrap();

        match client.send("s", "t", &vars()).await {
            Err(DigestError::DeliveryError { status, message }) => {
                assert_eq!(status, 422);
                assert!(message.contains("Template not found"));
            }
            other => panic!("expected DeliveryError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_rejected_with_empty_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/email/withTemplate");
            then.status(500);
        });

        let client = PostmarkClient::new(
            Client::new(),
            server.base_url(),
            "pm-token",
            "digest@example.com",
            "me@example.com",
            1,
        )
        .unwrap();

        match client.send("s", "t", &vars()).await {
            Err(DigestError::DeliveryError { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.is_empty());
            }
            other => panic!("expected DeliveryError, got {:?}", other),
        }
    }
}
