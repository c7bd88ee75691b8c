use anyhow::Result;
use aims_seed::cli::generate_products::{run, GenerateProductsConfig};

fn main() -> Result<()> {
    aims_seed::util::env::bootstrap_cli("generate_products");

    run(GenerateProductsConfig::from_env())?;
    Ok(())
}
