use clap::Subcommand;
use std::path::PathBuf;
use uuid::Uuid;

use super::{confirm, open_journal, open_store, report_notices};
use traveler::media::{self, thumbnail, FileDialogSource, PathSource};
use traveler::state::AlbumSession;
use traveler::{Config, Error, Result};

#[derive(Subcommand)]
pub enum PhotoCommand {
    /// List an album's photos in order
    List { album: Uuid },

    /// Add photos from files, a file dialog, or the camera
    Add {
        album: Uuid,
        /// Image files to import
        paths: Vec<PathBuf>,
        /// Choose the files in a native dialog instead
        #[arg(long, conflicts_with = "paths")]
        dialog: bool,
        /// Take a single picture (falls back to picking one file)
        #[arg(long, conflicts_with_all = ["paths", "dialog"])]
        capture: bool,
    },

    /// Delete photos from an album
    Delete {
        album: Uuid,
        #[arg(required = true)]
        photos: Vec<Uuid>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Move the photo at row FROM to row TO
    Move { album: Uuid, from: usize, to: usize },

    /// Generate thumbnails for an album
    Thumbnails { album: Uuid },
}

fn album_id(cmd: &PhotoCommand) -> Uuid {
    match cmd {
        PhotoCommand::List { album }
        | PhotoCommand::Add { album, .. }
        | PhotoCommand::Delete { album, .. }
        | PhotoCommand::Move { album, .. }
        | PhotoCommand::Thumbnails { album } => *album,
    }
}

pub async fn run(cmd: PhotoCommand, config: &Config) -> Result<()> {
    let album_id = album_id(&cmd);
    let journal = open_journal(config)?;
    let album = journal.album(album_id).ok_or(Error::AlbumNotFound(album_id))?;
    println!("Album: {}", album.name);

    let mut session = AlbumSession::activate(open_store(config)?, album_id);

    match cmd {
        PhotoCommand::List { .. } => {
            for (row, photo) in session.photos().iter().enumerate() {
                let status = if photo.is_displayable() { "" } else { "  (missing)" };
                println!("[{row}] {}  {}{status}", photo.id, photo.image_path.display());
            }
        }
        PhotoCommand::Add {
            paths,
            dialog,
            capture,
            ..
        } => {
            let added = if dialog {
                media::pick_into(&FileDialogSource::default(), &mut session).await?
            } else if capture {
                media::capture_into(&FileDialogSource::new("Take a Picture"), &mut session)
                    .await?
            } else {
                media::pick_into(&PathSource::new(paths), &mut session).await?
            };
            println!("Added {added} photo(s).");
        }
        PhotoCommand::Delete { photos, yes, .. } => {
            let request = session.request_delete(&photos);
            if request.is_empty() {
                println!("No matching photos.");
            } else if confirm(
                &format!(
                    "Delete {} photo(s)? This action cannot be undone.",
                    request.len()
                ),
                yes,
            ) {
                let removed = session.confirm_delete(request);
                if let Ok(cache_dir) = thumbnail::thumbnail_cache_dir(&config.cache_dir) {
                    for photo in &removed {
                        thumbnail::remove_thumbnail(&cache_dir, photo.id);
                    }
                }
                println!("Deleted {} photo(s).", removed.len());
            } else {
                println!("Cancelled.");
            }
        }
        PhotoCommand::Move { from, to, .. } => {
            if !session.move_photo(from, to) {
                println!("Rows out of range (album has {} photos).", session.photos().len());
            }
        }
        PhotoCommand::Thumbnails { .. } => {
            let cache_dir = thumbnail::thumbnail_cache_dir(&config.cache_dir)?;
            let mut placeholders = 0;
            for photo in session.photos() {
                match thumbnail::generate_thumbnail(photo, &cache_dir) {
                    Some(path) => println!("{}  {}", photo.id, path.display()),
                    None => placeholders += 1,
                }
            }
            if placeholders > 0 {
                println!("{placeholders} photo(s) unavailable; showing placeholders.");
            }
        }
    }

    report_notices(session.notices());
    session.deactivate()
}
