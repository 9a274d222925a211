//! TUI-less "say" command

use std::error::Error;
use std::path::PathBuf;

use tracing::warn;

use crate::core::attachment::read_selected_file;
use crate::core::credentials::ApiSettings;
use crate::core::gemini::GeminiClient;
use crate::core::session::ChatSession;

pub async fn run_say(
    prompt: String,
    file: Option<PathBuf>,
    settings: ApiSettings,
) -> Result<(), Box<dyn Error>> {
    let client = GeminiClient::new(reqwest::Client::new(), &settings);
    match say_once(&prompt, file, &client).await? {
        Some(reply) => {
            println!("{reply}");
            Ok(())
        }
        None => {
            eprintln!("Usage: chatbot say <prompt> [--file <path>]");
            std::process::exit(1);
        }
    }
}

/// Send one message, optionally with an attachment, and return the reply.
/// `None` means there was nothing to send.
pub async fn say_once(
    prompt: &str,
    file: Option<PathBuf>,
    client: &GeminiClient,
) -> Result<Option<String>, Box<dyn Error>> {
    let mut session = ChatSession::new();

    if let Some(path) = file {
        match read_selected_file(&path).await {
            Ok(selected) => session.attach_file(Some(selected)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read attachment");
                return Err(format!("Could not read {}: {err}", path.display()).into());
            }
        }
    }

    session.send(prompt, client).await;

    Ok(session
        .messages()
        .last()
        .filter(|msg| !msg.is_user())
        .map(|msg| msg.content.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compose::FAILURE_FALLBACK;
    use mockito::Matcher;
    use tempfile::tempdir;

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        let settings = ApiSettings {
            api_key: "test-key".into(),
            base_url: server.url(),
            model: "gemini-test".into(),
            request_timeout: None,
        };
        GeminiClient::new(reqwest::Client::new(), &settings)
    }

    #[tokio::test]
    async fn say_once_inlines_attachment_upstream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "A B C\n").unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .match_body(Matcher::Json(serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [{"text": "Summarize\n\n[Attached File Content]:\nA B C"}]
                }]
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Three letters."}]}}]}"#)
            .create_async()
            .await;

        let reply = say_once("Summarize", Some(path), &client_for(&server))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.as_deref(), Some("Three letters."));
    }

    #[tokio::test]
    async fn say_once_returns_filler_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let reply = say_once("hi", None, &client_for(&server)).await.unwrap();
        assert_eq!(reply.as_deref(), Some(FAILURE_FALLBACK));
    }

    #[tokio::test]
    async fn say_once_with_nothing_to_send_returns_none() {
        let server = mockito::Server::new_async().await;
        let reply = say_once("   ", None, &client_for(&server)).await.unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn say_once_reports_unreadable_attachment() {
        let server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = say_once("hi", Some(missing), &client_for(&server))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }
}
