use anyhow::Context;
use env_logger::Env;
use tiktok_metrics::{
    configuration::get_configuration,
    startup::{build_runner, run, target_urls, RunOutcome},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let runner = build_runner(&configuration).context("Failed to build the actor client.")?;
    let post_urls = target_urls(&configuration);

    match run(&runner, &post_urls, &configuration.output.path).await {
        Ok(RunOutcome::Exported { path, rows }) => {
            println!("Done. Data saved to: {} | {} rows", path.display(), rows)
        }
        Ok(RunOutcome::NoItems) => println!("No data. Check the URLs or the Apify quota."),
        Err(e) => {
            log::error!("Error while running the scraper: {:?}", e);
            println!("Error: {}", e);
        }
    }

    Ok(())
}
