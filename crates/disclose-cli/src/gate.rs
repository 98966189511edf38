//! # Gate Subcommands
//!
//! Talk to a running disclosure gate and the linking service.
//!
//! - `save` — `POST /saveOptions`
//! - `token` — fetch a deep-link token for a built request
//! - `verify` — submit a proof JSON file to `/verify`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use disclose_client::{
    ClientConfig, DeferredLinkRequest, GateClient, LinkingServiceClient, VerifyResponse,
};
use disclose_core::build_request;
use disclose_zkp::PartialSubmission;

use crate::link::LinkArgs;
use crate::options::OptionsArgs;

/// Exit code for a proof the gate rejected.
pub const EXIT_REJECTED: u8 = 2;

/// Where the gate and linking service live. Unset flags fall back to
/// `DISCLOSE_API_URL` and `LINKING_SERVICE_URL`, then to the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct Endpoints {
    /// Disclosure gate base URL [env: DISCLOSE_API_URL].
    #[arg(long, global = true)]
    pub gate_url: Option<String>,

    /// Linking service base URL [env: LINKING_SERVICE_URL].
    #[arg(long, global = true)]
    pub linking_url: Option<String>,
}

impl Endpoints {
    pub fn gate(&self) -> Result<GateClient> {
        let config = match &self.gate_url {
            Some(url) => ClientConfig::parse(url).context("invalid gate URL")?,
            None => ClientConfig::gate_from_env()?,
        };
        Ok(GateClient::new(config)?)
    }

    pub fn linking(&self) -> Result<LinkingServiceClient> {
        let config = match &self.linking_url {
            Some(url) => ClientConfig::parse(url).context("invalid linking URL")?,
            None => ClientConfig::linking_from_env()?,
        };
        Ok(LinkingServiceClient::new(config)?)
    }
}

/// Arguments for `disclose save`.
#[derive(Args, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    pub options: OptionsArgs,
}

/// Arguments for `disclose token`.
#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Call the linking service directly instead of the gate's proxy.
    #[arg(long)]
    pub direct: bool,
}

/// Arguments for `disclose verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// JSON file with `attestationId`, `proof`, `publicSignals`, `userContextData`.
    #[arg(long)]
    pub submission: PathBuf,
}

pub async fn run_save(args: &SaveArgs, endpoints: &Endpoints) -> Result<u8> {
    let subject = args.options.subject()?;
    let config = args.options.config()?;
    endpoints.gate()?.save_options(&subject, &config).await?;
    println!("saved options for {subject}");
    Ok(0)
}

pub async fn run_token(args: &TokenArgs, endpoints: &Endpoints) -> Result<u8> {
    let subject = args.link.options.subject()?;
    let config = args.link.options.config()?;
    let request = build_request(&args.link.metadata(), &subject, &config);
    let exchange = DeferredLinkRequest::for_request(&request);

    let token = if args.direct {
        endpoints.linking()?.fetch_token(&exchange).await?
    } else {
        endpoints.gate()?.deferred_linking(&exchange).await?
    };
    match token {
        Some(token) => {
            println!("{token}");
            Ok(0)
        }
        None => {
            tracing::warn!(subject_id = %subject.short(), "linking service returned an empty token");
            Ok(1)
        }
    }
}

pub async fn run_verify(args: &VerifyArgs, endpoints: &Endpoints) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.submission)
        .with_context(|| format!("failed to read {}", args.submission.display()))?;
    let submission: PartialSubmission = serde_json::from_str(&raw)
        .with_context(|| format!("invalid submission in {}", args.submission.display()))?;

    match endpoints.gate()?.verify(&submission).await? {
        VerifyResponse::Success(success) => {
            println!("{}", serde_json::to_string_pretty(&success)?);
            Ok(0)
        }
        VerifyResponse::Failure(failure) => {
            println!("{}", serde_json::to_string_pretty(&failure)?);
            Ok(EXIT_REJECTED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoints(server: &MockServer) -> Endpoints {
        Endpoints {
            gate_url: Some(server.uri()),
            linking_url: Some(server.uri()),
        }
    }

    #[test]
    fn explicit_gate_url_must_parse() {
        let endpoints = Endpoints {
            gate_url: Some("not a url".into()),
            linking_url: None,
        };
        let err = endpoints.gate().unwrap_err();
        assert!(err.to_string().contains("invalid gate URL"));
    }

    #[tokio::test]
    async fn save_posts_subject_and_options() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/saveOptions"))
            .and(body_partial_json(json!({
                "subjectId": "cli-subject",
                "options": { "ofac": false }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": "Options saved successfully" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let args = SaveArgs {
            options: OptionsArgs {
                subject: Some("cli-subject".into()),
                no_ofac: true,
                ..OptionsArgs::default()
            },
        };
        assert_eq!(run_save(&args, &endpoints(&server)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn direct_token_uses_linking_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post-deferred-linking-token"))
            .and(body_partial_json(json!({ "campaign_user_id": "cli-subject" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "tok" })))
            .expect(1)
            .mount(&server)
            .await;

        let args = TokenArgs {
            link: LinkArgs {
                options: OptionsArgs {
                    subject: Some("cli-subject".into()),
                    ..OptionsArgs::default()
                },
                scope: None,
                endpoint: None,
                link_only: false,
            },
            direct: true,
        };
        assert_eq!(run_token(&args, &endpoints(&server)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejected_proof_exits_with_rejected_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "result": false,
                "message": "Verification failed",
                "failedCheck": "ofac",
                "details": { "isValid": true, "isMinimumAgeValid": true, "isOfacValid": false }
            })))
            .mount(&server)
            .await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"attestationId": 1, "proof": {{}}, "publicSignals": [], "userContextData": "0x1"}}"#
        )
        .unwrap();
        let args = VerifyArgs {
            submission: file.path().to_path_buf(),
        };
        assert_eq!(
            run_verify(&args, &endpoints(&server)).await.unwrap(),
            EXIT_REJECTED
        );
    }
}
