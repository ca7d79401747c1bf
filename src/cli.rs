use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML config file (created with defaults on first run)
    #[clap(short, long, default_value = "config.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP relay.
    Serve {
        /// Override the configured port
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Run one platform handler and print the JSON response.
    Grab {
        /// youtube, instagram, pinterest, gdrive, github, twitter, tiktok,
        /// mediafire or facebook
        platform: String,

        /// Media page URL
        url: String,

        /// mp4 or mp3 (youtube only)
        #[clap(short, long)]
        format: Option<String>,
    },

    /// Search for videos and print the result list.
    Search {
        /// Free-text query
        query: String,
    },
}
