use stash_daemon::http_server::api::client::ApiError;
use stash_daemon::http_server::api::v0::files::{CatRequest, ListRequest};

use common::prelude::EntryKind;

use crate::cli::op::{Op, OpContext};

#[async_trait::async_trait]
impl Op for ListRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;

        if response.files.is_empty() {
            return Ok("No files found".to_string());
        }

        let output = response
            .files
            .iter()
            .map(|entry| match entry.kind {
                EntryKind::Folder => format!("{}/", entry.path),
                EntryKind::File => format!("{} ({} bytes)", entry.path, entry.size),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}

#[async_trait::async_trait]
impl Op for CatRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(response.content)
    }
}
