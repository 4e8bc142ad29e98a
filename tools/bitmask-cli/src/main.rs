//! bitmask-cli: command line front end for the Bitmask backend API.
//!
//! Talks to the backend over the same HTTP API the desktop client uses. It
//! has no special access to backend internals.
//!
//! ## Usage
//!
//! ```bash
//! # Who is logged in
//! bitmask-cli user active
//!
//! # Log in, password from the environment
//! BITMASK_PASSWORD=... bitmask-cli user login alice@example.org
//!
//! # Follow mail events
//! bitmask-cli events watch MAIL_SERVICE_STARTED MAIL_SERVICE_STOPPED
//! ```

mod cli;

use anyhow::{Context, Result};
use bitmask_api::{BitmaskClient, ClientConfig, Command, HttpConnector};
use bitmask_telemetry::{init_logging, TelemetryConfig};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use cli::{Args, Commands, EventsAction, KeysAction, MailAction, UserAction};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&TelemetryConfig::for_service("bitmask-cli").verbose(args.verbose))?;

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config = config.with_base_url(url);
    }
    let client = BitmaskClient::<HttpConnector>::connect(config).context("cannot configure client")?;

    run(&client, args.command).await
}

async fn run(client: &BitmaskClient<HttpConnector>, command: Commands) -> Result<()> {
    match command {
        Commands::User { action } => user(client, action).await,
        Commands::Mail { action } => mail(client, action).await,
        Commands::Keys { action } => keys(client, action).await,
        Commands::Events { action } => events(client, action).await,
        Commands::Call {
            namespace,
            verb,
            args,
        } => {
            let command = Command::parse(&namespace, &verb, &args)?;
            let result = client.dispatcher().dispatch(command).await?;
            print_json(&result)
        }
    }
}

async fn user(client: &BitmaskClient<HttpConnector>, action: UserAction) -> Result<()> {
    let users = client.user();
    match action {
        UserAction::Active => print_json(&json!({ "user": users.active().await? })),
        UserAction::Create { uid, password } => {
            let reply = users
                .create(&uid, password)
                .await
                .with_context(|| format!("cannot create {uid}"))?;
            print_json(&reply)
        }
        UserAction::Login { uid, password } => {
            let mut account = client.account(&uid);
            let session = account.login(password).await?;
            print_json(session)
        }
        UserAction::Logout { uid } => {
            users.logout(uid.as_deref()).await?;
            print_json(&json!({ "logout": "ok" }))
        }
    }
}

async fn mail(client: &BitmaskClient<HttpConnector>, action: MailAction) -> Result<()> {
    let mail = client.mail();
    match action {
        MailAction::Status => print_json(&mail.status().await?),
        MailAction::Token => print_json(&mail.get_token().await?),
    }
}

async fn keys(client: &BitmaskClient<HttpConnector>, action: KeysAction) -> Result<()> {
    let keys = client.keys();
    match action {
        KeysAction::List { kind } => print_json(&keys.list(kind).await?),
        KeysAction::Export { address, kind } => print_json(&keys.export(&address, kind).await?),
        KeysAction::Insert {
            address,
            path,
            validation,
        } => {
            let raw_key = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            print_json(&keys.insert(&address, &raw_key, validation).await?)
        }
        KeysAction::Delete { address, kind } => {
            keys.delete(&address, kind).await?;
            print_json(&json!({ "deleted": address }))
        }
    }
}

async fn events(client: &BitmaskClient<HttpConnector>, action: EventsAction) -> Result<()> {
    let EventsAction::Watch { names } = action;

    let events = client.events();
    for name in &names {
        // Local subscription holds even if the backend does not acknowledge it
        if let Err(error) = events.subscribe(name).await {
            warn!(event = %name, error = %error, "Backend did not accept registration");
        }
    }

    let mut stream = client.start_events()?;
    info!(events = ?names, "Watching events, Ctrl-C to stop");

    loop {
        tokio::select! {
            event = stream.next_event() => match event {
                Some(event) => {
                    let line = json!({ "event": event.name, "payload": event.payload });
                    println!("{line}");
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.stop_events().await;
    for name in &names {
        if let Err(error) = events.unregister(name).await {
            warn!(event = %name, error = %error, "Backend did not accept unregistration");
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
