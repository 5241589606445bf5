use chrono::NaiveDate;
use clap::Subcommand;
use uuid::Uuid;

use super::{confirm, finish_journal, open_journal, open_store};
use traveler::state::{Trip, TripDraft};
use traveler::{Config, Error, Result};

#[derive(Subcommand)]
pub enum TripCommand {
    /// List trips, optionally filtered by name
    List {
        /// Case-insensitive part of the trip name
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Create a trip (with the starter albums)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// First day, YYYY-MM-DD (default: today)
        #[arg(long)]
        begin: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD (default: today)
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        location: String,
    },

    /// Change some fields of a trip
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        begin: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        location: Option<String>,
    },

    /// Delete trips by id, or by row number in the (searched) list
    Delete {
        ids: Vec<Uuid>,
        /// Row numbers as shown by `trip list`, starting at 0
        #[arg(long, value_delimiter = ',')]
        rows: Vec<usize>,
        /// Search the rows refer to
        #[arg(short, long, default_value = "")]
        search: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Also delete the trips' album documents and photo files
        #[arg(long)]
        purge: bool,
    },
}

pub fn run(cmd: TripCommand, config: &Config) -> Result<()> {
    let mut journal = open_journal(config)?;

    match cmd {
        TripCommand::List { search } => {
            for (row, trip) in journal.trips(&search).into_iter().enumerate() {
                print_trip(row, trip);
            }
        }
        TripCommand::Add {
            name,
            description,
            begin,
            end,
            location,
        } => {
            let mut draft = TripDraft::new(name, location);
            draft.description = description;
            draft.begin_date = begin.unwrap_or(draft.begin_date);
            draft.end_date = end.unwrap_or(draft.end_date);

            match journal.add_trip(draft) {
                Some(id) => println!("{id}"),
                None => println!("Trip name must not be empty; nothing added."),
            }
        }
        TripCommand::Edit {
            id,
            name,
            description,
            begin,
            end,
            location,
        } => {
            let mut trip = journal.trip(id).cloned().ok_or(Error::TripNotFound(id))?;
            if let Some(name) = name {
                trip.name = name;
            }
            if let Some(description) = description {
                trip.description = description;
            }
            if let Some(location) = location {
                trip.location = location;
            }
            trip.begin_date = begin.unwrap_or(trip.begin_date);
            trip.end_date = end.unwrap_or(trip.end_date);
            if journal.edit_trip(&trip) {
                println!("Updated {}", trip.id);
            }
        }
        TripCommand::Delete {
            ids,
            rows,
            search,
            yes,
            purge,
        } => {
            let mut targets = ids;
            targets.extend(journal.request_trip_deletion_at(&search, &rows).ids());
            let request = journal.request_trip_deletion(&targets);
            if request.is_empty() {
                println!("No matching trips.");
                return Ok(());
            }

            let names: Vec<&str> = request
                .ids()
                .iter()
                .filter_map(|id| journal.trip(*id))
                .map(|trip| trip.name.as_str())
                .collect();
            let question = format!("Delete {}? This cannot be undone.", names.join(", "));
            if !confirm(&question, yes) {
                println!("Cancelled.");
                return Ok(());
            }

            let removal = journal.confirm_trip_deletion(request);
            println!("Deleted {} trip(s).", removal.trips.len());
            finish_journal(&mut journal);

            if purge {
                let store = open_store(config)?;
                for album_id in &removal.orphaned_albums {
                    store.purge_album(*album_id)?;
                }
            } else if !removal.orphaned_albums.is_empty() {
                println!(
                    "{} album(s) keep their photos on disk; `traveler audit --purge` removes them.",
                    removal.orphaned_albums.len()
                );
            }
        }
    }

    finish_journal(&mut journal);
    Ok(())
}

fn print_trip(row: usize, trip: &Trip) {
    println!("[{row}] {}  {}", trip.id, trip.name);
    if !trip.description.is_empty() {
        println!("    {}", trip.description);
    }
    println!("    Dates: {} - {}", trip.begin_date, trip.end_date);
    println!("    Location: {}", trip.location);
}
