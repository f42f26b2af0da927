use std::path::PathBuf;
use std::time::Duration;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use place_autofill::batch::{geocode_all, parse_queries, save_records};
use place_autofill::geocode::lookup_first;
use place_autofill::google::{ClientConfig, GoogleMapsClient, DEFAULT_BASE_URL};
use place_autofill::session::{Completion, SearchSession};
use place_autofill::{normalize, PlaceRecord, Suggestion, SuggestionSource};

#[derive(Debug, Parser)]
#[command(version, about = "Look up an address and split it into structured fields")]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ClientArgs {
    /// Google Maps Platform API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "GOOGLE_MAPS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// language of the returned names, e.g. `nl`
    #[arg(long)]
    language: Option<String>,
    /// region bias as a ccTLD, e.g. `us`
    #[arg(long)]
    region: Option<String>,
    /// extra attempts after a connect error, timeout, 5xx or UNKNOWN_ERROR
    #[arg(long, default_value_t = 0)]
    retries: usize,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

impl From<ClientArgs> for ClientConfig {
    fn from(args: ClientArgs) -> Self {
        Self {
            api_key: args.api_key,
            base_url: args.base_url,
            language: args.language,
            region: args.region,
            retries: args.retries,
            timeout: Duration::from_secs(args.timeout_secs),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode an address and print the first match
    Lookup {
        #[arg(required = true)]
        query: Vec<String>,
        /// print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List autocomplete suggestions for partial input
    Suggest {
        #[arg(required = true)]
        input: Vec<String>,
    },
    /// Geocode one address per line and write the results as CSV
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "result/places.csv")]
        output: PathBuf,
        #[arg(long, default_value_t = 5)]
        concurrency: usize,
    },
    /// Search, pick a suggestion, and see the fields fill in
    Interactive,
}

#[tokio::main]
async fn main() {
    install_tracing();
    if let Err(e) = color_eyre::install() {
        eprintln!("cannot install error report handler: {e}");
    }

    if let Err(e) = run(Cli::parse()).await {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

async fn run(cli: Cli) -> color_eyre::Result<()> {
    let client = GoogleMapsClient::new(cli.client.into())
        .wrap_err("cannot build HTTP client")?;

    match cli.command {
        Command::Lookup { query, json } => {
            let query = query.join(" ");
            match lookup_first(&client, &query).await {
                Ok(result) => print_place(&normalize(&result), json)?,
                Err(e) => error!("cannot look up [{}]: {}", query, e),
            }
        }
        Command::Suggest { input } => {
            let input = input.join(" ");
            match client.suggest(&input).await {
                Ok(suggestions) => print_suggestions(&suggestions),
                Err(e) => error!("cannot fetch suggestions for [{}]: {}", input, e),
            }
        }
        Command::Batch { input, output, concurrency } => {
            let text = std::fs::read_to_string(&input)
                .wrap_err_with(|| format!("cannot read queries from {}", input.display()))?;
            let queries = parse_queries(&text);
            if queries.is_empty() {
                bail!("no queries found in {}", input.display());
            }
            let total = queries.len();
            let report = geocode_all(&client, queries, concurrency).await;
            info!("geocoded [{}/{}] queries, [{}] failed", report.records.len(), total, report.failed.len());

            info!("saving records to [{}]", output.display());
            save_records(&report.records, &output)
                .wrap_err_with(|| format!("cannot write {}", output.display()))?;
        }
        Command::Interactive => interactive(&client).await?,
    }
    Ok(())
}

fn print_place(place: &PlaceRecord, json: bool) -> color_eyre::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(place)?);
        return Ok(());
    }
    println!("display name : {}", place.display_name);
    println!("coordinate   : {}, {}", place.coordinate.lat, place.coordinate.lng);
    println!("street       : {}", place.address.street);
    println!("number       : {}", place.address.number);
    println!("city         : {}", place.address.city);
    println!("state        : {}", place.state);
    println!("postal code  : {}", place.postal_code);
    println!("country code : {}", place.country_code);
    Ok(())
}

fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("(no suggestions)");
    }
    for (idx, suggestion) in suggestions.iter().enumerate() {
        println!("{}", suggestion_line(idx + 1, suggestion));
    }
}

fn suggestion_line(number: usize, suggestion: &Suggestion) -> String {
    format!("{:>2}. {} [{}]", number, suggestion.description, suggestion.id)
}

/// A line typed in interactive mode
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Quit,
    Pick(usize),
    Lookup(&'a str),
    Suggest(&'a str),
    Nothing,
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Nothing;
        }
        if line == ":q" {
            return Input::Quit;
        }
        if let Some(n) = line.strip_prefix(':').and_then(|n| n.trim().parse().ok()) {
            return Input::Pick(n);
        }
        if let Some(query) = line.strip_prefix('!') {
            return match query.trim() {
                "" => Input::Nothing,
                query => Input::Lookup(query),
            };
        }
        Input::Suggest(line)
    }
}

async fn interactive(client: &GoogleMapsClient) -> color_eyre::Result<()> {
    println!("type an address for suggestions, :N to pick one, !address to look it up directly, :q to quit");

    let mut session = SearchSession::new();
    let mut suggestions: Vec<Suggestion> = Vec::new();
    let mut in_flight = FuturesUnordered::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let query = match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Nothing => continue,
                    Input::Suggest(input) => {
                        match client.suggest(input).await {
                            Ok(found) => {
                                suggestions = found;
                                print_suggestions(&suggestions);
                            }
                            Err(e) => error!("cannot fetch suggestions for [{}]: {}", input, e),
                        }
                        continue;
                    }
                    Input::Pick(n) => match n.checked_sub(1).and_then(|idx| suggestions.get(idx)) {
                        Some(suggestion) => suggestion.description.clone(),
                        None => {
                            warn!("no suggestion numbered [{}]", n);
                            continue;
                        }
                    },
                    Input::Lookup(query) => query.to_string(),
                };
                let ticket = session.begin();
                in_flight.push(async move {
                    let outcome = lookup_first(client, &query).await;
                    (ticket, outcome)
                });
            }
            Some((ticket, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                if session.complete(ticket, outcome) == Completion::Applied {
                    print_place(session.current(), false)?;
                }
            }
        }
    }

    while let Some((ticket, outcome)) = in_flight.next().await {
        if session.complete(ticket, outcome) == Completion::Applied {
            print_place(session.current(), false)?;
        }
    }
    Ok(())
}
