//! CLI argument parsing and command dispatch.

pub mod args;

use std::path::Path;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::api::media::mime_for_path;
use crate::api::{EntriesQuery, EntryDraft, TagStreamQuery, WykopApi};
use crate::core::envelope::Cursor;
use crate::error::{Result, WykopError};
use crate::storage::config::ResolvedConfig;
use crate::storage::token_file::TokenFile;

pub use args::{Cli, Commands};

/// Resolve configuration, connect, run the command and print its JSON.
///
/// The (possibly rotated) refresh token is written back to the token file
/// once connected, whether or not the command itself succeeds.
///
/// # Errors
///
/// Configuration, authentication and command errors; a failure to persist
/// the token is reported only when the command succeeded.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = ResolvedConfig::resolve(&cli.overrides())?;
    debug!(?config, "Resolved configuration");

    let credentials = config.credentials()?;
    let api = WykopApi::connect(config.connector_config()?, credentials).await?;

    let result = execute(&api, &cli.command).await;
    let persisted = persist_refresh_token(&api, &config.token_file());

    let output = result?;
    persisted?;
    print_json(&output, cli.pretty)
}

fn persist_refresh_token(api: &WykopApi, file: &TokenFile) -> Result<()> {
    let Some(token) = api.refresh_token() else {
        return Ok(());
    };
    file.save(token).inspect_err(|e| {
        warn!(path = %file.path().display(), error = %e, "Failed to persist refresh token");
    })
}

/// Run one command against an authenticated client.
///
/// # Errors
///
/// Propagates API errors from the underlying call.
pub async fn execute(api: &WykopApi, command: &Commands) -> Result<Value> {
    match command {
        Commands::Connect => Ok(json!({ "connect_url": api.connect_url().await? })),
        Commands::Entries(args) => {
            let query = EntriesQuery {
                sort: args.sort.clone(),
                last_update: Some(args.last_update),
                page: args.pages.cursor(),
                page_count: args.pages.budget(),
                category: args.category.clone(),
                bucket: args.bucket.clone(),
                limit: args.limit,
            };
            api.get_entries(&query).await
        }
        Commands::Entry { id } => api.get_entry_by_id(*id).await,
        Commands::EntryComments { id, pages } => {
            let start = pages.page.as_ref().map(|_| pages.cursor());
            api.get_entry_comments(*id, start, pages.budget()).await
        }
        Commands::EntryVotes { id, page } => {
            api.get_entry_votes(*id, &page_cursor(page.as_deref())).await
        }
        Commands::PostEntry(args) => {
            let mut draft = EntryDraft::new(&args.content).adult(args.adult);
            draft.photo.clone_from(&args.photo);
            api.post_entry(&draft).await
        }
        Commands::DeleteEntry { id } => {
            api.delete_entry_by_id(*id).await?;
            Ok(json!({ "deleted": id }))
        }
        Commands::CommentVotes {
            entry_id,
            comment_id,
            page,
        } => {
            api.get_entry_comment_votes(*entry_id, *comment_id, &page_cursor(page.as_deref()))
                .await
        }
        Commands::TagStream { tag, pages } => {
            let query = TagStreamQuery {
                page: pages.cursor(),
                page_count: pages.budget(),
                ..TagStreamQuery::default()
            };
            api.get_tag_stream(tag, &query).await
        }
        Commands::TagsPopular => api.get_tags_popular().await,
        Commands::UploadPhoto { path, media_type } => upload_photo(api, path, media_type).await,
    }
}

fn page_cursor(page: Option<&str>) -> Cursor {
    page.map_or(Cursor::None, Cursor::parse)
}

async fn upload_photo(api: &WykopApi, path: &Path, media_type: &str) -> Result<Value> {
    let mime = mime_for_path(path).ok_or_else(|| {
        WykopError::Config(format!("unsupported photo type: {}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo")
        .to_string();
    let bytes = std::fs::read(path)?;
    api.post_media_photo(media_type, bytes, &file_name, mime)
        .await
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
