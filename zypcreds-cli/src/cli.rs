use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use zypcreds_core::{ClientConfig, ContentType};

/// Talk to the ZypCreds verification service from the command line.
#[derive(Parser)]
#[command(name = "zypcreds", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the raw response body instead of the normalized result.
    #[arg(long, global = true)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Credentials, endpoints and transport settings.
#[derive(Args)]
pub struct ConnectionArgs {
    /// API ID of the account.
    #[arg(long, env = "ZYPCREDS_ACCOUNT_ID")]
    pub account_id: String,

    /// API key of the account, used to sign requests.
    #[arg(long, env = "ZYPCREDS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Base URL replacing the production host for every endpoint.
    #[arg(long, env = "ZYPCREDS_BASE_URL")]
    pub base_url: Option<String>,

    /// Verification endpoint.
    #[arg(long, env = "ZYPCREDS_VERIFY_URI")]
    pub verify_uri: Option<String>,

    /// Token endpoint.
    #[arg(long, env = "ZYPCREDS_TOKEN_URI")]
    pub token_uri: Option<String>,

    /// Whitelist endpoint.
    #[arg(long, env = "ZYPCREDS_WHITELIST_URI")]
    pub whitelist_uri: Option<String>,

    /// Blacklist endpoint.
    #[arg(long, env = "ZYPCREDS_BLACKLIST_URI")]
    pub blacklist_uri: Option<String>,

    /// Response format, `json` or `xml`.
    #[arg(long, env = "ZYPCREDS_FORMAT", default_value = "json")]
    pub format: ContentType,

    /// Connect and request timeout in seconds.
    #[arg(long, env = "ZYPCREDS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ConnectionArgs {
    /// Builds the client configuration. Explicit endpoints win over `--base-url`.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.account_id, &self.secret_key)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_content_type(self.format);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }

        let overrides = [
            (&self.verify_uri, &mut config.verify_uri),
            (&self.token_uri, &mut config.token_uri),
            (&self.whitelist_uri, &mut config.whitelist_uri),
            (&self.blacklist_uri, &mut config.blacklist_uri),
        ];
        for (uri, target) in overrides {
            if let Some(uri) = uri {
                target.clone_from(uri);
            }
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a verification code to an index.
    RequestVerification {
        /// Index (e.g. phone number) to verify.
        index: String,
        /// Country hint for normalizing the index.
        #[arg(long)]
        country: Option<String>,
        /// IP address of the end user.
        #[arg(long)]
        ip: Option<String>,
    },
    /// Check a code entered by the end user.
    AttemptVerification {
        /// Index the code was sent to.
        index: String,
        /// Code entered by the end user.
        code: String,
        /// IP address of the end user.
        #[arg(long)]
        ip: Option<String>,
    },
    /// Check whether a session token is still valid.
    CheckToken {
        /// Index the token was issued for.
        index: String,
        /// Session token.
        token: String,
    },
    /// Manage the account whitelist.
    Whitelist {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage the account blacklist.
    Blacklist {
        #[command(subcommand)]
        action: ListAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ListAction {
    /// Fetch the list.
    Get,
    /// Add an index to the list.
    Add {
        /// Index to add.
        index: String,
    },
    /// Remove an index from the list.
    Delete {
        /// Index to remove.
        index: String,
    },
}
