//! Command handlers.

use super::commands::Commands;
use soundboard::{
    AudioContentType, ErrorCategory, LocalStoreError, LocalStoreErrorKind, SoundCache,
    SoundError, SoundErrorKind, SoundboardError, SoundboardResult,
};
use std::path::Path;
use std::process::ExitCode;

/// Run one command against the cache.
pub async fn handle_command(cache: &SoundCache, command: Commands) -> SoundboardResult<()> {
    match command {
        Commands::List => list(cache).await,
        Commands::Find { name } => find(cache, &name).await,
        Commands::Fetch { name } => {
            let path = cache.fetch_sound(&name).await?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Add {
            name,
            file,
            content_type,
        } => add(cache, &name, &file, content_type.as_deref()).await,
        Commands::Delete { name } => {
            cache.delete_sound(&name).await?;
            println!("Deleted {name}");
            Ok(())
        }
        Commands::Search { partial } => {
            for name in cache.autocomplete(&partial).await? {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Invalidate => {
            cache.invalidate().await?;
            println!("Snapshot invalidated");
            Ok(())
        }
    }
}

async fn list(cache: &SoundCache) -> SoundboardResult<()> {
    let sounds = cache.require_sounds().await?;
    println!("{:<64}  BLOB KEY", "NAME");
    println!("{:-<80}", "");
    for entry in &sounds {
        println!("{:<64}  {}", entry.name(), entry.blob_key());
    }
    println!("Total: {} sounds", sounds.len());
    Ok(())
}

async fn find(cache: &SoundCache, name: &str) -> SoundboardResult<()> {
    let entry = cache
        .find_sound(name)
        .await?
        .ok_or_else(|| SoundError::new(SoundErrorKind::NotFound(name.to_string())))?;
    println!("{}\t{}", entry.name(), entry.blob_key());
    Ok(())
}

async fn add(
    cache: &SoundCache,
    name: &str,
    file: &Path,
    content_type: Option<&str>,
) -> SoundboardResult<()> {
    let filename = file
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();

    let content_type = match content_type {
        Some(content_type) => content_type.to_string(),
        None => {
            let extension = file
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            AudioContentType::from_extension(&extension)
                .ok_or_else(|| {
                    SoundError::new(SoundErrorKind::InvalidContentType(format!(
                        "no audio type for extension {extension:?}; pass --content-type"
                    )))
                })?
                .to_string()
        }
    };

    let data = tokio::fs::read(file).await.map_err(|e| {
        LocalStoreError::new(LocalStoreErrorKind::FileRead(format!(
            "{}: {}",
            file.display(),
            e
        )))
    })?;

    let entry = cache.add_sound(name, data, &content_type, &filename).await?;
    println!("Added {} ({})", entry.name(), entry.blob_key());
    Ok(())
}

/// Print an error in its category's wording and pick the exit code.
pub fn report_error(err: &SoundboardError) -> ExitCode {
    tracing::debug!(error = %err, category = %err.category(), "Command failed");
    let detail = match err.sound_kind() {
        Some(kind) => kind.to_string(),
        None => err.kind().to_string(),
    };

    match err.category() {
        ErrorCategory::Empty => {
            println!("No sounds available.");
            ExitCode::SUCCESS
        }
        ErrorCategory::Unavailable => {
            eprintln!("Soundboard is unavailable, try again later: {detail}");
            ExitCode::from(1)
        }
        ErrorCategory::NotFound => {
            eprintln!("That sound isn't available: {detail}");
            ExitCode::from(2)
        }
        ErrorCategory::Rejected => {
            eprintln!("Request rejected: {detail}");
            ExitCode::from(3)
        }
    }
}
