mod drive;
mod public;
mod show;

use crate::config::{Config, ConfigOverrides};
use crate::error::Result;
use clap::{Args, Parser, Subcommand};

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "sheet-gallery")]
#[command(about = "Read gallery rows from Google Sheets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub google: GoogleArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[google]` table of the config file.
#[derive(Args, Debug, Default)]
pub struct GoogleArgs {
    /// OAuth client ID
    #[arg(long, env = "GOOGLE_CLIENT_ID", global = true, hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", global = true, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// API key for the public sheet
    #[arg(long, env = "GOOGLE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// ID of the public sheet
    #[arg(long, env = "GOOGLE_SHEET_ID", global = true)]
    pub sheet_id: Option<String>,

    /// Local port for the OAuth redirect
    #[arg(long, env = "GOOGLE_CALLBACK_PORT", global = true)]
    pub callback_port: Option<u16>,
}

impl From<&GoogleArgs> for ConfigOverrides {
    fn from(args: &GoogleArgs) -> Self {
        ConfigOverrides {
            client_id: args.client_id.clone(),
            client_secret: args.client_secret.clone(),
            api_key: args.api_key.clone(),
            public_sheet_id: args.sheet_id.clone(),
            callback_port: args.callback_port,
        }
    }
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Whoami => drive::whoami(&self.config()?.google).await,
            Commands::Files => drive::list_files(&self.config()?.google).await,
            Commands::Read { file_id } => drive::read_sheet(&self.config()?.google, file_id).await,
            Commands::Public => public::fetch_public_sheet(&self.config()?.google).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }

    fn config(&self) -> Result<Config> {
        Config::load((&self.google).into())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and show the Google profile
    Whoami,
    /// List spreadsheets in Google Drive
    Files,
    /// Read title and image columns from a Google Sheet
    Read {
        /// Drive file ID of the spreadsheet
        file_id: String,
    },
    /// Read the configured public sheet without signing in
    Public,
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_command() {
        let cli = Cli::try_parse_from(["sheet-gallery", "read", "file_1", "--callback-port", "9000"])
            .unwrap();

        assert!(matches!(&cli.command, Commands::Read { file_id } if file_id == "file_1"));
        assert_eq!(cli.google.callback_port, Some(9000));
    }

    #[test]
    fn test_args_become_overrides() {
        let args = GoogleArgs {
            api_key: Some("key".to_string()),
            sheet_id: Some("sheet".to_string()),
            ..Default::default()
        };

        let overrides = ConfigOverrides::from(&args);

        assert_eq!(overrides.api_key.as_deref(), Some("key"));
        assert_eq!(overrides.public_sheet_id.as_deref(), Some("sheet"));
        assert!(overrides.client_id.is_none());
    }
}
