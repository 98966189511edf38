//! # Session Subcommand
//!
//! Runs one verification session end to end against a gate: starts from
//! the given config, persists it, waits for the link token, and prints the
//! link and token the wallet should open.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use disclose_session::{OptionsSink, TokenSource, VerificationSession, DEFAULT_DEBOUNCE};
use serde_json::json;

use crate::gate::Endpoints;
use crate::link::LinkArgs;

/// Arguments for `disclose session`.
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Fetch tokens from the linking service directly instead of the gate.
    #[arg(long)]
    pub direct: bool,

    /// Seconds to wait for the link token.
    #[arg(long, default_value_t = 30)]
    pub wait_secs: u64,
}

pub async fn run_session(args: &SessionArgs, endpoints: &Endpoints) -> Result<u8> {
    let gate = Arc::new(endpoints.gate()?);
    let sink: Arc<dyn OptionsSink> = gate.clone();
    let source: Arc<dyn TokenSource> = if args.direct {
        Arc::new(endpoints.linking()?) as Arc<dyn TokenSource>
    } else {
        gate as Arc<dyn TokenSource>
    };

    let session = VerificationSession::with_config(
        args.link.options.subject()?,
        args.link.metadata(),
        args.link.options.config()?,
        sink,
        source,
        DEFAULT_DEBOUNCE,
    );
    session.flush().await?;

    let token = tokio::time::timeout(Duration::from_secs(args.wait_secs), session.token()).await;
    let token = match token {
        Ok(Some(token)) => token,
        Ok(None) => bail!("no link token issued for this request"),
        Err(_) => bail!("timed out after {}s waiting for the link token", args.wait_secs),
    };

    let out = json!({
        "subjectId": session.subject_id(),
        "link": session.link(),
        "token": token.as_str(),
        "readyToOpen": session.ready_to_open(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    session.end();
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionsArgs;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(direct: bool) -> SessionArgs {
        SessionArgs {
            link: LinkArgs {
                options: OptionsArgs {
                    subject: Some("session-cli".into()),
                    ..OptionsArgs::default()
                },
                scope: None,
                endpoint: None,
                link_only: false,
            },
            direct,
            wait_secs: 5,
        }
    }

    #[tokio::test]
    async fn session_saves_and_waits_for_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/saveOptions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": "Options saved successfully" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/deferredLinking"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": "tok-s" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let endpoints = Endpoints {
            gate_url: Some(server.uri()),
            linking_url: Some(server.uri()),
        };
        assert_eq!(run_session(&args(false), &endpoints).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_token_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/saveOptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/post-deferred-linking-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": "" })),
            )
            .mount(&server)
            .await;

        let endpoints = Endpoints {
            gate_url: Some(server.uri()),
            linking_url: Some(server.uri()),
        };
        assert!(run_session(&args(true), &endpoints).await.is_err());
    }
}
