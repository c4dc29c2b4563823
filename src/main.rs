use clap::Parser;
use threadsmith::cli::Config;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    threadsmith::cli::run(config).await
}
