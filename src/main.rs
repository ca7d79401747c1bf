use clap::Parser;

mod cli;
mod config;
mod error;
mod platforms;
mod server;
#[cfg(test)]
mod tests;
mod upstream;
mod ytdlp;

use config::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();
    let mut config = Config::load(&args.config)?;

    match args.command {
        cli::Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            server::start_daemon(config);
            Ok(())
        }

        cli::Command::Grab {
            platform,
            url,
            format,
        } => {
            let value = grab(&platform, &url, format.as_deref(), &config)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }

        cli::Command::Search { query } => {
            let results = platforms::search::run(&query, &config)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
    }
}

fn grab(
    platform: &str,
    url: &str,
    format: Option<&str>,
    config: &Config,
) -> anyhow::Result<serde_json::Value> {
    let value = match platform {
        "youtube" => serde_json::to_value(platforms::youtube::fetch(url, format, config)?)?,
        "instagram" => serde_json::to_value(platforms::instagram::fetch(url, config)?)?,
        "pinterest" => serde_json::to_value(platforms::pinterest::fetch(url, config)?)?,
        "gdrive" => serde_json::to_value(platforms::gdrive::fetch(url, config)?)?,
        "github" => serde_json::to_value(platforms::github::fetch(url, config)?)?,
        "twitter" => serde_json::to_value(platforms::twitter::fetch(url, config)?)?,
        "tiktok" => serde_json::to_value(platforms::tiktok::fetch(url, config)?)?,
        "mediafire" => serde_json::to_value(platforms::mediafire::fetch(url, config)?)?,
        "facebook" => serde_json::to_value(platforms::facebook::fetch(url, config)?)?,
        other => anyhow::bail!("unknown platform: {other}"),
    };
    Ok(value)
}
