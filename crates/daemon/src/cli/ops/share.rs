use clap::{Args, Subcommand};

use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::share::info::ShareInfo;
use stash_daemon::http_server::api::v0::share::{
    CreateRequest, InfoRequest, ListRequest, RevokeRequest,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Create, CreateRequest),
    (Info, InfoRequest),
    (Ls, ListRequest),
    (Revoke, RevokeRequest),
}

pub type ShareCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Share {
    #[command(subcommand)]
    pub command: ShareCommand,
}

#[async_trait::async_trait]
impl Op for Share {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

fn describe(share: &ShareInfo) -> String {
    let mut paths: Vec<String> = share.files.iter().map(ToString::to_string).collect();
    paths.extend(share.folders.iter().map(|folder| format!("{}/", folder)));
    format!(
        "{} [{}] {} (expires {}{})",
        share.token,
        share.permission,
        paths.join(", "),
        share.expires_at.to_rfc3339(),
        if share.live { "" } else { ", expired" }
    )
}

#[async_trait::async_trait]
impl Op for CreateRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!(
            "Share created: {}\nToken: {}\nPermission: {}\nExpires: {}",
            response.url,
            response.token,
            response.permission,
            response.expires_at.to_rfc3339()
        ))
    }
}

#[async_trait::async_trait]
impl Op for InfoRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let share = client.call(self.clone()).await?;
        Ok(format!("owner: {}\n{}", share.owner, describe(&share)))
    }
}

#[async_trait::async_trait]
impl Op for ListRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        if response.shares.is_empty() {
            return Ok("No shares found".to_string());
        }
        Ok(response
            .shares
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait::async_trait]
impl Op for RevokeRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Revoked {}", response.token))
    }
}
