use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::files::{
    DeleteRequest, MkdirRequest, RenameRequest, SaveRequest, TouchRequest,
};

use crate::cli::op::{Op, OpContext};

#[async_trait::async_trait]
impl Op for MkdirRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Created folder {}", response.path))
    }
}

#[async_trait::async_trait]
impl Op for TouchRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Created {}", response.path))
    }
}

#[async_trait::async_trait]
impl Op for SaveRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Saved {} ({} bytes)", response.path, response.size))
    }
}

#[async_trait::async_trait]
impl Op for RenameRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Renamed {} to {}", self.path, response.path))
    }
}

#[async_trait::async_trait]
impl Op for DeleteRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Deleted {}", response.path))
    }
}
