use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::auth;

#[derive(Parser)]
#[command(name = "dropctl")]
#[command(about = "Daily Drop CLI - manage a tenant's daily drops over the HTTP API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "DAILYDROP_SERVER",
        default_value = "http://localhost:3000",
        help = "Base URL of the Daily Drop API server"
    )]
    pub server: String,

    #[arg(long, global = true, env = "DAILYDROP_TOKEN", help = "Identity bearer token")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Tenant to operate on (omit in single-tenant mode)")]
    pub tenant: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show today's drop")]
    Today,

    #[command(about = "Publish (or overwrite) today's drop")]
    Publish {
        #[arg(long, help = "Body text of the drop")]
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, help = "Embeddable player URL")]
        video_url: Option<String>,
        #[arg(long, help = "Call-to-action URL")]
        resource_link: Option<String>,
    },

    #[command(about = "List recent drops with publishing stats")]
    List {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    #[command(about = "Overwrite an existing drop by id")]
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
        #[arg(long)]
        resource_link: Option<String>,
        #[arg(long, help = "Move the drop to another date (YYYY-MM-DD)")]
        date: Option<NaiveDate>,
    },

    #[command(about = "Delete a drop by id")]
    Delete {
        #[arg(long)]
        id: String,
    },

    #[command(about = "Mint a local development identity token")]
    Token {
        #[arg(long, help = "User id to embed in the token")]
        user: String,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let Cli { server, token, tenant, command } = cli;

    // Token minting is local; everything else talks to the server
    if let Commands::Token { user } = &command {
        let token = auth::issue_token(user.clone())
            .context("minting requires IDENTITY_JWT_SECRET to be set")?;
        println!("{}", token);
        return Ok(());
    }

    let token = token
        .context("an identity token is required; pass --token or set DAILYDROP_TOKEN")?;
    let client = reqwest::Client::new();
    let base = server.trim_end_matches('/');

    let response = match command {
        Commands::Today => {
            let mut req = client.get(format!("{}/api/drops/today", base));
            if let Some(tenant) = &tenant {
                req = req.query(&[("tenant_id", tenant)]);
            }
            req.bearer_auth(&token).send().await?
        }
        Commands::Publish { content, title, video_url, resource_link } => {
            let body = json!({
                "tenant_id": tenant,
                "title": title,
                "content": content,
                "video_url": video_url,
                "resource_link": resource_link,
            });
            client
                .post(format!("{}/api/drops", base))
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
        }
        Commands::List { limit } => {
            let mut req = client
                .get(format!("{}/api/drops/list", base))
                .query(&[("limit", limit.to_string())]);
            if let Some(tenant) = &tenant {
                req = req.query(&[("tenant_id", tenant)]);
            }
            req.bearer_auth(&token).send().await?
        }
        Commands::Update { id, content, title, video_url, resource_link, date } => {
            let body = json!({
                "id": id,
                "tenant_id": tenant,
                "title": title,
                "content": content,
                "video_url": video_url,
                "resource_link": resource_link,
                "date": date,
            });
            client
                .put(format!("{}/api/drops", base))
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
        }
        Commands::Delete { id } => {
            let mut req = client
                .delete(format!("{}/api/drops", base))
                .query(&[("id", &id)]);
            if let Some(tenant) = &tenant {
                req = req.query(&[("tenant_id", tenant)]);
            }
            req.bearer_auth(&token).send().await?
        }
        Commands::Token { .. } => unreachable!("handled above"),
    };

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .unwrap_or_else(|_| json!({ "error": true, "message": "non-JSON response" }));

    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("server answered {}", status);
    }

    Ok(())
}
