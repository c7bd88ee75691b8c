use anyhow::Result;
use aims_seed::cli::generate_users::{run, GenerateUsersConfig};

fn main() -> Result<()> {
    aims_seed::util::env::bootstrap_cli("generate_users");

    run(GenerateUsersConfig::from_env())?;
    Ok(())
}
