/// Command handlers for the `traveler` binary
///
/// Each submodule parses one command group and drives the library's
/// state stores; nothing here touches storage directly.
pub mod album;
pub mod audit;
pub mod discover;
pub mod photo;
pub mod trip;

use std::io::{self, BufRead, Write};

use traveler::state::{Journal, Library, Notice, PhotoStore};
use traveler::{Config, Result};

pub fn open_journal(config: &Config) -> Result<Journal> {
    Journal::open(Library::open(&config.catalog_path())?)
}

pub fn open_store(config: &Config) -> Result<PhotoStore> {
    PhotoStore::open(&config.data_dir)
}

/// Ask a yes/no question on the terminal. `assume_yes` skips the prompt.
pub fn confirm(question: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Give failed catalog writes one more try, then report (and drop) the
/// notices that are left. Anything still pending is lost when the process exits.
pub fn finish_journal(journal: &mut Journal) {
    if journal.has_pending_writes() {
        if let Err(e) = journal.retry_save() {
            tracing::warn!(error = %e, "catalog retry failed");
        }
    }
    report_notices(&journal.take_notices());
}

/// Print write-through failures without failing the command
pub fn report_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("warning: {notice}");
    }
}
