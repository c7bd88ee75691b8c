use anyhow::Result;
use clap::Parser;
use aims_seed::cli::import_users::{run, ImportUsersArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = ImportUsersArgs::parse();
    aims_seed::util::env::bootstrap_cli("import_users");

    run(args).await?;
    Ok(())
}
