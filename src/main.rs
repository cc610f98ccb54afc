use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use portal_form_bridge::{
    BookingControl, BridgeConfig, ClickEvent, HandlerOutcome, PageHandles, PortalBridge,
    PortalClient, PortalView, SlotField, SlotForm, SubmitEvent,
};

#[derive(Debug, Parser)]
#[command(
    name = "portal-bridge",
    about = "Drive the clinic portal's slot form and booking buttons from a terminal"
)]
struct Cli {
    /// Portal origin, overrides PORTAL_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Publish an availability slot (doctor portal)
    AddSlot {
        #[arg(long, default_value = "")]
        start_time: String,
        #[arg(long, default_value = "")]
        end_time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Book a slot by id (patient portal)
    Book { slot_id: String },
}

/// Alerts go to stdout; a reload has nothing to refresh in a terminal.
struct ConsoleView;

impl PortalView for ConsoleView {
    fn alert(&self, message: &str) {
        println!("{}", message);
    }

    fn reload(&self) {
        info!("Page reload requested");
    }
}

struct ArgsForm {
    start_time: String,
    end_time: String,
    location: String,
    notes: String,
}

impl SlotForm for ArgsForm {
    fn field_value(&self, field: SlotField) -> String {
        match field {
            SlotField::StartTime => self.start_time.clone(),
            SlotField::EndTime => self.end_time.clone(),
            SlotField::Location => self.location.clone(),
            SlotField::Notes => self.notes.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let client = match PortalClient::new(&config) {
        Ok(client) => client,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let page = PageHandles::new(Arc::new(ConsoleView));

    let result = match cli.command {
        Command::AddSlot {
            start_time,
            end_time,
            location,
            notes,
        } => {
            let form = ArgsForm {
                start_time,
                end_time,
                location,
                notes,
            };
            let bridge =
                PortalBridge::mount(client, page.with_slot_form(Arc::new(form)), config.options);
            bridge.on_slot_submit(&mut SubmitEvent::new()).await
        }
        Command::Book { slot_id } => {
            let control = BookingControl::new(0, slot_id);
            let click = ClickEvent::on(&control);
            let bridge = PortalBridge::mount(
                client,
                page.with_booking_controls(vec![control]),
                config.options,
            );
            bridge.on_book_click(&click).await
        }
    };

    match result {
        Ok(HandlerOutcome::Reloaded) => ExitCode::SUCCESS,
        Ok(outcome) => {
            info!("Interaction finished without success: {:?}", outcome);
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
