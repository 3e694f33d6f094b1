//! plusfeed CLI - query the legacy Nike+ feeds and print JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plusfeed_core::{Endpoints, FeedClient, Transport};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plusfeed")]
#[command(version)]
#[command(about = "Query the legacy Nike+ feeds with a session id")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Session id sent as the plusid cookie
    #[arg(short, long, global = true, env = "PLUSFEED_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// Feed host, e.g. http://127.0.0.1:3000 for the mock server
    /// [default: $PLUSFEED_BASE_URL, else the service host]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Account totals
    User,
    /// Personal records keyed by type
    Records,
    /// Every run with its basic data
    Runs,
    /// Totals across all runs
    Summary,
    /// Goal list document
    Goals,
    /// Full run document
    Run(RunArg),
    /// GPS waypoints of a run
    Gps(RunArg),
    /// Kilometer splits of a run
    KmSplits(RunArg),
    /// Mile splits of a run
    MileSplits(RunArg),
    /// Extended data series of a run
    Extended(RunArg),
    /// Id of the most recent run
    Recent,
}

#[derive(clap::Args, Debug, PartialEq)]
struct RunArg {
    /// Run id (defaults to the most recent run)
    run_id: Option<String>,
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("failed to serialize result")
}

/// The run id to query: the one given, or the most recent run's.
fn resolve_run_id<T: Transport>(client: &FeedClient<T>, arg: &RunArg) -> Result<Option<String>> {
    if arg.run_id.is_some() {
        return Ok(arg.run_id.clone());
    }
    let recent = client
        .get_recent_run_id()
        .context("failed to look up the most recent run")?;
    debug!(run_id = ?recent, "using most recent run");
    Ok(recent)
}

fn execute<T: Transport>(client: &FeedClient<T>, command: &Command) -> Result<Value> {
    let value = match command {
        Command::User => json(client.get_user_data()?)?,
        Command::Records => json(client.get_records()?)?,
        Command::Runs => json(client.get_run_list()?)?,
        Command::Summary => json(client.get_run_list_summary()?)?,
        Command::Goals => json(client.get_goal_list()?)?,
        Command::Recent => json(client.get_recent_run_id()?)?,
        Command::Run(arg) => {
            let run_id = resolve_run_id(client, arg)?;
            json(client.get_full_run(run_id.as_deref())?)?
        }
        Command::Gps(arg) => {
            let run_id = resolve_run_id(client, arg)?;
            json(client.get_full_gps(run_id.as_deref())?)?
        }
        Command::KmSplits(arg) => {
            let run_id = resolve_run_id(client, arg)?;
            json(client.get_km_splits(run_id.as_deref())?)?
        }
        Command::MileSplits(arg) => {
            let run_id = resolve_run_id(client, arg)?;
            json(client.get_mile_splits(run_id.as_deref())?)?
        }
        Command::Extended(arg) => {
            let run_id = resolve_run_id(client, arg)?;
            json(client.get_extended_data(run_id.as_deref())?)?
        }
    };
    Ok(value)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let session = cli
        .session
        .context("a session id is required (--session or PLUSFEED_SESSION)")?;
    let endpoints = match cli.base_url.as_deref() {
        Some(base) => Endpoints::with_base_url(base),
        None => Endpoints::from_env(),
    };
    debug!(user_data = %endpoints.user_data, "using endpoints");

    let client = FeedClient::with_endpoints(session, endpoints);
    let value = execute(&client, &cli.command)?;
    let out = serde_json::to_string_pretty(&value).context("failed to render output")?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plusfeed_core::{FeedError, HttpRequest, HttpResponse};

    /// Answers by URL: the user feed names run 77, the GPS feed has one
    /// waypoint.
    struct Fixture;

    impl Transport for Fixture {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FeedError> {
            let body = if request.url.contains("get_user_data.jsp") {
                r#"<plusService><mostRecentRun id="77"/></plusService>"#
            } else if request.url.contains("get_gps_detail.jsp") {
                r#"{"plusService": {"route": {"id": "g", "waypointList": [{"lat": 1}]}}}"#
            } else {
                return Ok(HttpResponse {
                    status: 404,
                    headers: Vec::new(),
                    body: String::new(),
                });
            };
            Ok(HttpResponse::ok(body))
        }
    }

    fn client() -> FeedClient<Fixture> {
        FeedClient::with_transport("1234", Endpoints::with_base_url("http://h"), Fixture)
    }

    #[test]
    fn parses_run_commands() {
        let cli = Cli::try_parse_from(["plusfeed", "--session", "1", "km-splits", "1001"]).unwrap();
        assert_eq!(
            cli.command,
            Command::KmSplits(RunArg {
                run_id: Some("1001".to_string())
            })
        );
        assert_eq!(cli.session.as_deref(), Some("1"));
    }

    #[test]
    fn run_id_is_optional() {
        let cli = Cli::try_parse_from(["plusfeed", "gps"]).unwrap();
        assert_eq!(cli.command, Command::Gps(RunArg { run_id: None }));
    }

    #[test]
    fn missing_run_id_uses_most_recent_run() {
        let value = execute(&client(), &Command::Gps(RunArg { run_id: None })).unwrap();
        assert_eq!(value[0]["runId"], 77);
        assert_eq!(value[0]["gpxId"], "g");
    }

    #[test]
    fn recent_prints_the_raw_id() {
        let value = execute(&client(), &Command::Recent).unwrap();
        assert_eq!(value, Value::String("77".to_string()));
    }

    #[test]
    fn feed_errors_surface() {
        let err = execute(&client(), &Command::Records).unwrap_err();
        let feed_err = err.downcast_ref::<FeedError>().unwrap();
        assert!(matches!(feed_err, FeedError::HttpError { status: 404, .. }));
    }
}
