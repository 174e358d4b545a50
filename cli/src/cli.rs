use clap::{Args, Parser, Subcommand};
use pretalx_core::QueryParams;

#[derive(Debug, Parser)]
#[command(name = "pretalx", version, about = "Query a pretalx instance from your terminal")]
pub struct Cli {
    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Root URL of the pretalx instance
    #[arg(long, global = true, env = "PRETALX_URL")]
    pub url: Option<String>,

    /// API token (ignored when username and password are both given)
    #[arg(long, global = true, env = "PRETALX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, global = true, env = "PRETALX_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "PRETALX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the authenticated user
    Me,
    /// Exchange username and password for a token and save it to the config file
    Login,
    /// List events, or show one
    Events {
        event: Option<String>,
        #[command(flatten)]
        query: QueryArgs,
    },
    Submissions(ResourceArgs),
    Talks(ResourceArgs),
    Speakers(ResourceArgs),
    Reviews(ResourceArgs),
    Rooms(ResourceArgs),
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Event slug
    pub event: String,
    /// Object code; omit to list the collection
    pub code: Option<String>,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Extra query parameter, passed through verbatim (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl QueryArgs {
    pub fn to_params(&self) -> QueryParams {
        self.params.iter().cloned().collect()
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_param_splits_on_first_equals() {
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_param("state=").unwrap(), ("state".to_string(), String::new()));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn talks_with_code_and_params() {
        let cli = Cli::try_parse_from([
            "pretalx",
            "--url",
            "https://pretalx.com",
            "talks",
            "myconf",
            "XYZ",
            "-p",
            "state=confirmed",
        ])
        .unwrap();

        let Command::Talks(args) = &cli.command else {
            panic!("expected talks, got {:?}", cli.command);
        };
        assert_eq!(args.event, "myconf");
        assert_eq!(args.code.as_deref(), Some("XYZ"));
        assert_eq!(
            args.query.to_params(),
            QueryParams::new().with("state", "confirmed")
        );
        assert_eq!(cli.auth.url.as_deref(), Some("https://pretalx.com"));
    }

    #[test]
    fn events_without_slug() {
        let cli = Cli::try_parse_from(["pretalx", "events"]).unwrap();
        match cli.command {
            Command::Events { event, query } => {
                assert!(event.is_none());
                assert!(query.params.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
