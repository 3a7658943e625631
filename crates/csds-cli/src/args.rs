use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use csds_client::{ApiVersion, AuthnMode, ClientOptions, Platform, DEFAULT_SERVICE_URI};

#[derive(Parser, Debug, Clone)]
#[command(name = "csds", version, about = "Client Status Discovery Service CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter used when RUST_LOG is unset (e.g. info, csds_client=debug).
    #[arg(long, global = true, env = "CSDS_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Query the control plane and print the sync status of its clients.
    Status(StatusArgs),

    /// Build the dependency graph from a saved client status response.
    Graph {
        /// Response JSON, e.g. one saved with --file-to-save-config.
        input: PathBuf,

        /// Where to write the DOT file.
        #[arg(long, default_value = "config_graph.dot")]
        out: PathBuf,

        /// Do not open the hosted viewer.
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// CSDS endpoint, host[:port] or a full URL.
    #[arg(long, env = "CSDS_SERVICE_URI", default_value = DEFAULT_SERVICE_URI)]
    pub service_uri: String,

    /// Cloud platform (gcp).
    #[arg(long, env = "CSDS_CLOUD_PLATFORM", default_value = "gcp")]
    pub cloud_platform: Platform,

    /// Authentication method: auto or jwt.
    #[arg(long, env = "CSDS_AUTHN_MODE", default_value = "auto")]
    pub authn_mode: AuthnMode,

    /// xDS API major version: v2 or v3.
    #[arg(long, env = "CSDS_API_VERSION", default_value = "v2")]
    pub api_version: ApiVersion,

    /// YAML (or JSON) file with the node matchers.
    #[arg(long, env = "CSDS_REQUEST_FILE")]
    pub request_file: Option<PathBuf>,

    /// Inline YAML (or JSON) node matchers; merged over --request-file.
    #[arg(long, env = "CSDS_REQUEST_YAML")]
    pub request_yaml: Option<String>,

    /// File holding a ready-made bearer token (JWT) for --authn-mode jwt;
    /// the file content is sent as is, no key exchange is performed.
    #[arg(long, env = "CSDS_JWT_FILE")]
    pub jwt_file: Option<PathBuf>,

    /// Save the detailed config here instead of printing it.
    #[arg(long, env = "CSDS_FILE_TO_SAVE_CONFIG")]
    pub file_to_save_config: Option<PathBuf>,

    /// Re-query every N seconds; 0 runs once.
    #[arg(long, env = "CSDS_MONITOR_INTERVAL", default_value_t = 0)]
    pub monitor_interval: u64,

    /// Render the xDS dependency graph.
    #[arg(long, env = "CSDS_VISUALIZATION")]
    pub visualization: bool,
}

impl StatusArgs {
    pub fn to_options(&self) -> ClientOptions {
        ClientOptions {
            service_uri: self.service_uri.clone(),
            platform: self.cloud_platform,
            authn_mode: self.authn_mode,
            api_version: self.api_version,
            request_file: self.request_file.clone(),
            request_yaml: self.request_yaml.clone(),
            jwt_file: self.jwt_file.clone(),
            config_file: self.file_to_save_config.clone(),
            monitor_interval: None,
            visualization: self.visualization,
        }
        .with_monitor_secs(self.monitor_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status(argv: &[&str]) -> StatusArgs {
        let mut full = vec!["csds", "status"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Status(a) => a,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let opts = status(&[]).to_options();
        assert_eq!(opts.service_uri, "trafficdirector.googleapis.com:443");
        assert_eq!(opts.platform, Platform::Gcp);
        assert_eq!(opts.authn_mode, AuthnMode::Auto);
        assert_eq!(opts.api_version, ApiVersion::V2);
        assert!(!opts.is_monitor());
        assert!(!opts.visualization);
    }

    #[test]
    fn flags_map_to_options() {
        let opts = status(&[
            "--api-version",
            "v3",
            "--authn-mode",
            "jwt",
            "--jwt-file",
            "/tmp/token",
            "--monitor-interval",
            "10",
            "--visualization",
        ])
        .to_options();
        assert_eq!(opts.api_version, ApiVersion::V3);
        assert_eq!(opts.authn_mode, AuthnMode::Jwt);
        assert_eq!(opts.monitor_interval, Some(Duration::from_secs(10)));
        assert!(opts.visualization);
    }

    #[test]
    fn unsupported_platform_is_rejected() {
        let err = Cli::try_parse_from(["csds", "status", "--cloud-platform", "aws"]).unwrap_err();
        assert!(err.to_string().contains("aws platform is not supported"));
    }

    #[test]
    fn jwt_file_help_says_token_is_sent_as_is() {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        let status = cmd.find_subcommand_mut("status").unwrap();
        let help = status.render_long_help().to_string();
        assert!(help.contains("ready-made bearer token"));
    }

    #[test]
    fn graph_subcommand() {
        let cli = Cli::try_parse_from(["csds", "--json", "graph", "resp.json", "--no-open"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Graph { input, out, no_open } => {
                assert_eq!(input, PathBuf::from("resp.json"));
                assert_eq!(out, PathBuf::from("config_graph.dot"));
                assert!(no_open);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
