use clap::{Args, Subcommand};

pub mod download;
pub mod read;
pub mod upload;
pub mod write;

use crate::cli::op::Op;
use stash_daemon::http_server::api::v0::files::{
    CatRequest, DeleteRequest, ListRequest, MkdirRequest, RenameRequest, SaveRequest,
    TouchRequest,
};

crate::command_enum! {
    (Upload, upload::Upload),
    (Ls, ListRequest),
    (Mkdir, MkdirRequest),
    (Touch, TouchRequest),
    (Cat, CatRequest),
    (Save, SaveRequest),
    (Rename, RenameRequest),
    (Rm, DeleteRequest),
    (Download, download::Download),
}

pub type FilesCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Files {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[async_trait::async_trait]
impl Op for Files {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
