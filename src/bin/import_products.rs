use anyhow::Result;
use clap::Parser;
use aims_seed::cli::import_products::{run, ImportProductsArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = ImportProductsArgs::parse();
    aims_seed::util::env::bootstrap_cli("import_products");

    run(args).await?;
    Ok(())
}
