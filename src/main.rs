// src/main.rs

use taskfarm::{cli, config, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("taskfarm error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = config::resolve(&args)?;
    logging::init_logging(cfg.verbose, args.log_level)?;
    run(args, cfg).await
}
