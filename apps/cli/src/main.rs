use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    DraftField, HttpPinsApi, InteractionEvent, Notice, PopupDescriptor, Runtime, Selection,
    Session,
};
use shared::domain::{Coordinates, PinId};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_database_url, validate_server_url, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "pinmap", about = "Browse and drop geotagged reviews")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every pin on the map.
    Pins,
    /// Select a pin and show its details.
    Show { id: String },
    /// Drop a new pin as the signed-in user.
    Add {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        long: f64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        desc: String,
        #[arg(long)]
        rating: u8,
    },
    /// Record an identity confirmed by the account service.
    Login {
        #[arg(long)]
        username: String,
    },
    Logout,
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }
    let server_url = validate_server_url(&settings.server_url)?;
    let database_url = normalize_database_url(&settings.database_url);
    info!(%server_url, %database_url, "pinmap: starting");

    let storage = Storage::new(&database_url)
        .await
        .context("failed to open identity storage")?;
    let mut runtime = Runtime::start(
        Arc::new(HttpPinsApi::new(server_url)),
        Arc::new(storage),
        settings.initial_viewport(),
    )
    .await;

    match args.command {
        Command::Pins => {
            load(&mut runtime).await?;
            print_pins(&runtime);
        }
        Command::Show { id } => {
            load(&mut runtime).await?;
            let id = PinId::new(id);
            runtime
                .dispatch(InteractionEvent::MarkerClicked(id.clone()))
                .await?;
            if runtime.controller().selection() != Selection::ViewingPin(id.clone()) {
                bail!("no pin with id {id}");
            }
            print_popup(&runtime);
        }
        Command::Add {
            lat,
            long,
            title,
            desc,
            rating,
        } => {
            load(&mut runtime).await?;
            add_pin(&mut runtime, Coordinates::new(lat, long), title, desc, rating).await?;
        }
        Command::Login { username } => {
            runtime
                .dispatch(InteractionEvent::LoginSucceeded { username })
                .await?;
            print_session(&runtime.controller().session());
        }
        Command::Logout => {
            runtime.dispatch(InteractionEvent::LogoutClicked).await?;
            print_session(&runtime.controller().session());
        }
        Command::Whoami => print_session(&runtime.controller().session()),
    }

    Ok(())
}

async fn load(runtime: &mut Runtime) -> Result<()> {
    runtime.mount().await?;
    runtime.settle().await?;
    if let Some(Notice::PinsUnavailable(reason)) = runtime.controller().notice() {
        eprintln!("warning: {reason}");
    }
    Ok(())
}

async fn add_pin(
    runtime: &mut Runtime,
    at: Coordinates,
    title: String,
    desc: String,
    rating: u8,
) -> Result<()> {
    runtime
        .dispatch(InteractionEvent::MapDoubleClicked(at))
        .await?;
    if runtime.controller().selection() != Selection::Drafting {
        bail!("sign in first: pinmap login --username <name>");
    }

    for field in [
        DraftField::Title(title),
        DraftField::Desc(desc),
        DraftField::Rating(rating),
    ] {
        runtime.dispatch(InteractionEvent::DraftEdited(field)).await?;
    }
    runtime.dispatch(InteractionEvent::SubmitRequested).await?;
    runtime.settle().await?;

    match runtime.controller().notice() {
        Some(Notice::PinAdded(id)) => {
            println!("added pin {id}");
            Ok(())
        }
        Some(Notice::SubmitFailed(reason)) => Err(anyhow!("pin not added: {reason}")),
        other => Err(anyhow!("pin not added: unexpected state {other:?}")),
    }
}

fn print_pins(runtime: &Runtime) {
    let pins = runtime.controller().pins().snapshot();
    if pins.is_empty() {
        println!("no pins");
        return;
    }
    for pin in pins.iter() {
        println!(
            "{}\t{:.5},{:.5}\t{}\t{}/5\tby {}",
            pin.id, pin.lat, pin.long, pin.title, pin.rating, pin.username
        );
    }
}

fn print_popup(runtime: &Runtime) {
    let scene = runtime.scene();
    if let Some(PopupDescriptor::Pin {
        id,
        position,
        title,
        desc,
        stars,
        author,
        created,
    }) = scene.popup
    {
        println!("{title} ({id})");
        println!("  {desc}");
        println!("  rating: {}", "*".repeat(stars as usize));
        println!("  created by {author}, {created}");
        println!("  at {:.5},{:.5}", position.lat, position.long);
    }
}

fn print_session(session: &Session) {
    match session.username() {
        Some(username) => println!("signed in as {username}"),
        None => println!("not signed in"),
    }
}
