//! # Link Subcommand
//!
//! Builds the verification request and universal link locally, or asks a
//! running gate for its `/v1/request` preview with `--remote`.

use anyhow::{Context, Result};
use clap::Args;
use disclose_core::{build_request, universal_link, AppMetadata};
use serde_json::json;

use crate::gate::Endpoints;
use crate::options::OptionsArgs;

/// Arguments for the `disclose link` subcommand itself.
#[derive(Args, Debug)]
pub struct LinkCommand {
    #[command(flatten)]
    pub link: LinkArgs,

    /// Ask the gate to build the request instead of building it locally.
    #[arg(long)]
    pub remote: bool,
}

/// Arguments for `disclose link`.
#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(flatten)]
    pub options: OptionsArgs,

    /// Relying-party scope.
    #[arg(long)]
    pub scope: Option<String>,

    /// Endpoint the proof is bound to.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Print only the link.
    #[arg(long)]
    pub link_only: bool,
}

impl LinkArgs {
    pub fn metadata(&self) -> AppMetadata {
        let mut metadata = AppMetadata::playground();
        if let Some(scope) = &self.scope {
            metadata.scope = scope.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            metadata.endpoint = endpoint.clone();
        }
        metadata
    }
}

/// Render the request, link and digest as the lines to print.
pub fn render(args: &LinkArgs) -> Result<String> {
    let subject = args.options.subject()?;
    let config = args.options.config()?;
    let request = build_request(&args.metadata(), &subject, &config);
    let link = universal_link(&request);

    if args.link_only {
        return Ok(link);
    }
    let out = json!({
        "request": request,
        "link": link,
        "digest": request.digest().to_hex(),
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Render the gate's preview for the same config. The gate applies its own
/// scope and endpoint.
pub async fn render_remote(args: &LinkArgs, endpoints: &Endpoints) -> Result<String> {
    let subject = args.options.subject()?;
    let config = args.options.config()?;
    let preview = endpoints
        .gate()?
        .request_preview(&subject, &config)
        .await
        .context("request preview failed")?;

    if args.link_only {
        return Ok(preview.link);
    }
    Ok(serde_json::to_string_pretty(&preview)?)
}

pub async fn run_link(command: &LinkCommand, endpoints: &Endpoints) -> Result<u8> {
    let out = if command.remote {
        render_remote(&command.link, endpoints).await?
    } else {
        render(&command.link)?
    };
    println!("{out}");
    Ok(0)
}
