use clap::Args;
use std::collections::HashSet;

use super::{confirm, open_store};
use traveler::state::Library;
use traveler::{Config, Error, Result};

#[derive(Args)]
pub struct AuditArgs {
    /// Delete orphaned album documents and their photo files
    #[arg(long)]
    purge: bool,
    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

/// Compare album documents on disk with the catalog.
///
/// Documents without a catalog album are left behind by trip and album
/// deletions; photos whose file is gone will show a placeholder. Nothing
/// is moved or rewritten unless `--purge` is given.
pub fn run(args: AuditArgs, config: &Config) -> Result<()> {
    let library = Library::open(&config.catalog_path())?;
    let store = open_store(config)?;

    let known: HashSet<_> = library.all_album_ids()?.into_iter().collect();
    let orphaned: Vec<_> = store
        .list_documents()
        .into_iter()
        .filter(|id| !known.contains(id))
        .collect();

    let mut missing = 0;
    let mut unreadable = Vec::new();
    for album_id in &known {
        match store.load(*album_id) {
            Ok(photos) => {
                missing += photos.iter().filter(|photo| !photo.is_displayable()).count();
            }
            Err(Error::CorruptData { path, .. }) => unreadable.push((path, "corrupt")),
            Err(e) => {
                tracing::debug!(album = %album_id, error = %e, "album document unreadable");
                unreadable.push((store.document_path(*album_id), "unreadable"));
            }
        }
    }

    println!("{} album(s) in the catalog", known.len());
    println!("{missing} photo(s) with a missing file");
    println!("{} album document(s) that cannot be read", unreadable.len());
    for (path, reason) in &unreadable {
        println!("    {} ({reason})", path.display());
    }
    println!("{} orphaned album document(s)", orphaned.len());
    for album_id in &orphaned {
        println!("    {}", store.document_path(*album_id).display());
    }

    if args.purge && !orphaned.is_empty() {
        let question = format!("Delete {} orphaned album(s) and their photos?", orphaned.len());
        if confirm(&question, args.yes) {
            let mut photos = 0;
            for album_id in &orphaned {
                photos += store.purge_album(*album_id)?;
            }
            println!("Purged {} album(s), {photos} photo file(s).", orphaned.len());
        }
    }
    Ok(())
}
