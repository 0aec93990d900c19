use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;

use crate::components::trip::TripActions;
use crate::environment::model::ResultExt;
use crate::environment::types::{MenuSelection, TripDay, TripDayId, TripId};
use crate::environment::{Environment, Model, Repository};
use crate::helper::DATE_FORMAT;
use crate::store::{Dispatch, Store};

#[derive(Parser)]
#[command(name = "tripdeck")]
#[command(about = "Plan trips, their days and events against a trip server")]
struct Cli {
    /// Configuration file, instead of the one in the platform config folder
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the trips of a dashboard menu
    List {
        #[arg(long, default_value = "all", value_parser = menu_names())]
        menu: String,
    },
    /// Load one trip with all its days and events
    Show { trip_id: u64 },
    /// Add a day (YYYY-MM-DD) to a trip
    AddDay { trip_id: u64, date: String },
    /// Remove a trip day
    DeleteDay { trip_day_id: u64 },
}

fn menu_names() -> PossibleValuesParser {
    PossibleValuesParser::new(MenuSelection::iter().map(<&'static str>::from))
}

pub fn run() {
    use env_logger::Env;
    use std::io::Write;
    env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Could not start the runtime: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = runtime.block_on(execute(cli)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<(), String> {
    let repository = match cli.config {
        Some(path) => Repository::load_from(&path),
        None => Repository::load(),
    }
    .string_error("Load configuration")?;
    let model = Model::http(repository.config()).string_error("Connect")?;

    let store = Store::new(repository.timezones().clone());
    let actions = TripActions::new(
        Environment::new(model, repository),
        Arc::new(store.clone()),
    );

    // Failures already live in the store as an alert, printed below
    let outcome = match cli.command {
        Commands::List { menu } => {
            actions.update_current_menu(MenuSelection::parse_lenient(&menu));
            actions.get_trip_list().await.map(|_| ())
        }
        Commands::Show { trip_id } => actions.get_trip_detail(TripId(trip_id)).await.map(|_| ()),
        Commands::AddDay { trip_id, date } => {
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).string_error("Read date")?;
            let day = TripDay {
                trip_id: TripId(trip_id),
                trip_date: date.format(DATE_FORMAT).to_string(),
                ..Default::default()
            };
            actions.create_trip_day(day).await.map(|_| ())
        }
        Commands::DeleteDay { trip_day_id } => {
            actions.delete_trip_day(TripDayId(trip_day_id)).await
        }
    };

    let state = store.state();
    let json = serde_json::to_string_pretty(&state).string_error("Render state")?;
    println!("{json}");
    if let Some(alert) = state.alert.alert {
        eprintln!("[{}] {}", alert.kind, alert.message);
    }
    outcome
}
