//! Tack subcommand handlers for slactac.

use tracing::info;

use slactac_config::Config;
use slactac_core::TackBook;
use slactac_store::file_storage;

use crate::cli::TackAction;

/// Handle tack subcommands.
pub(crate) async fn handle_tack_command(
    action: TackAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = file_storage(&config.storage.data_dir).await?;
    let book = TackBook::new(storage, config)?;

    match action {
        TackAction::Add {
            original,
            replacement,
        } => {
            book.save(&original, &replacement).await?;
            println!("Saved: {} -> {}", original.trim(), replacement.trim());
        }
        TackAction::Remove { original } => {
            if book.remove(&original).await? {
                println!("Removed: {}", original.trim());
            } else {
                println!("No override for: {}", original.trim());
            }
        }
        TackAction::List { format } => tack_list(&book, &format).await?,
        TackAction::Clear { yes } => {
            if !yes {
                println!("This removes every override. Re-run with --yes to confirm.");
                return Ok(());
            }
            book.clear_all().await?;
            println!("All overrides cleared.");
        }
        TackAction::Picked { clear } => {
            let picked = if clear {
                book.take_last_picked().await?
            } else {
                book.last_picked().await?
            };
            match picked {
                Some(name) => println!("{}", name),
                None => println!("No channel picked."),
            }
        }
    }

    info!("Tack command finished");
    Ok(())
}

/// List all overrides.
async fn tack_list(book: &TackBook, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let tacks = book.list().await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&tacks)?);
        }
        _ => {
            if tacks.is_empty() {
                println!("No overrides.");
                return Ok(());
            }
            println!("{:<30} {}", "ORIGINAL", "SHOWN AS");
            println!("{}", "-".repeat(60));
            for (original, replacement) in &tacks {
                println!("{:<30} {}", original, replacement);
            }
            println!("\nTotal: {} override(s)", tacks.len());
        }
    }
    Ok(())
}
