mod main_lib;

use coinscope_core::Config;
use main_lib::{init_tracing, run, Command, USAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.as_ref().map(|c| c.debug).unwrap_or(false));

    let Some(command) = Command::parse(std::env::args().skip(1)) else {
        println!("{}", USAGE);
        return Ok(());
    };

    match config {
        Ok(config) => {
            for section in run(&command, &config).await {
                println!("{}", section);
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
        }
    }
    Ok(())
}
