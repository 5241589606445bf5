use clap::Subcommand;
use uuid::Uuid;

use super::{confirm, finish_journal, open_journal, open_store};
use traveler::{Config, Error, Result};

#[derive(Subcommand)]
pub enum AlbumCommand {
    /// List a trip's albums, optionally filtered by name
    List {
        trip: Uuid,
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Add an album to a trip
    Add { trip: Uuid, name: String },

    /// Rename an album
    Rename { album: Uuid, name: String },

    /// Delete albums by id, or by row number in the (searched) list
    Delete {
        trip: Uuid,
        albums: Vec<Uuid>,
        /// Row numbers as shown by `album list`, starting at 0
        #[arg(long, value_delimiter = ',')]
        rows: Vec<usize>,
        #[arg(short, long, default_value = "")]
        search: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Also delete the albums' documents and photo files
        #[arg(long)]
        purge: bool,
    },
}

pub fn run(cmd: AlbumCommand, config: &Config) -> Result<()> {
    let mut journal = open_journal(config)?;

    match cmd {
        AlbumCommand::List { trip, search } => {
            let trip = journal.trip(trip).ok_or(Error::TripNotFound(trip))?;
            println!("Trip: {}", trip.name);
            for (row, album) in journal.albums(trip.id, &search).into_iter().enumerate() {
                println!("[{row}] {}  {}", album.id, album.name);
            }
        }
        AlbumCommand::Add { trip, name } => {
            if journal.trip(trip).is_none() {
                return Err(Error::TripNotFound(trip));
            }
            match journal.add_album(trip, &name) {
                Some(id) => println!("{id}"),
                None => println!("Album name must not be empty; nothing added."),
            }
        }
        AlbumCommand::Rename { album, name } => {
            let mut renamed = journal.album(album).cloned().ok_or(Error::AlbumNotFound(album))?;
            renamed.name = name;
            if journal.rename_album(&renamed) {
                println!("Renamed {} to {}", renamed.id, renamed.name);
            }
        }
        AlbumCommand::Delete {
            trip,
            albums,
            rows,
            search,
            yes,
            purge,
        } => {
            if journal.trip(trip).is_none() {
                return Err(Error::TripNotFound(trip));
            }
            let mut targets = albums;
            targets.extend(journal.request_album_deletion_at(trip, &search, &rows).ids());
            let request = journal.request_album_deletion(trip, &targets);
            if request.is_empty() {
                println!("No matching albums.");
                return Ok(());
            }

            let names: Vec<&str> = request
                .ids()
                .iter()
                .filter_map(|id| journal.album(*id))
                .map(|album| album.name.as_str())
                .collect();
            let question = format!("Delete {}? This cannot be undone.", names.join(", "));
            if !confirm(&question, yes) {
                println!("Cancelled.");
                return Ok(());
            }

            let removed = journal.confirm_album_deletion(trip, request);
            println!("Deleted {} album(s).", removed.len());
            finish_journal(&mut journal);

            if purge {
                let store = open_store(config)?;
                for album in &removed {
                    store.purge_album(album.id)?;
                }
            }
        }
    }

    finish_journal(&mut journal);
    Ok(())
}
