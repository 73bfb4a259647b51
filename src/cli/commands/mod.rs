use anyhow::Result;

pub mod init;
pub mod render;
pub mod submit;
pub mod validate;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
