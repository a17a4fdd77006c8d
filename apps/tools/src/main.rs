mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launcher_core::{
    color::{gradient, GradientPair},
    drag::{DragEvent, Point, PointerGesture},
    icon::SymbolIcon,
    BookmarkBoard, BookmarkStore, MutationSync, PresentationBinder, PresentationDescriptor,
    SymbolLookup,
};
use serde::Serialize;
use shared::{
    domain::{non_empty, Bookmark, BookmarkId, CategoryId, IconType},
    error::{ApiError, ApiException},
    protocol::BookmarkDraft,
};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::{load_settings, prepare_database_url, Settings};

#[derive(Parser, Debug)]
#[command(name = "launcher", about = "Organize bookmarks into categories")]
struct Cli {
    /// Config file; defaults to ./launcher.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    AddCategory {
        name: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
    },
    AddBookmark {
        category_id: i64,
        title: String,
        url: String,
        #[arg(long, default_value = "favicon")]
        icon_type: String,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        icon_url: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Duplicate {
        bookmark_id: i64,
    },
    /// Print every category with its bookmarks and their presentation.
    List,
    /// Drag one bookmark onto another within a category.
    Move {
        #[arg(long)]
        category: i64,
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
    },
    Gradient {
        hex: String,
    },
    Icon {
        key: String,
    },
}

#[derive(Serialize)]
struct ListedBookmark<'a> {
    #[serde(flatten)]
    bookmark: &'a Bookmark,
    presentation: PresentationDescriptor,
}

#[derive(Serialize)]
struct ListedCategory<'a> {
    id: CategoryId,
    name: &'a str,
    hex_color: &'a str,
    gradient: GradientPair,
    bookmarks: Vec<ListedBookmark<'a>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli, settings).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<ApiException>() {
            Some(api) => {
                let body = ApiError::new(api.code, api.message.clone());
                eprintln!("{}", serde_json::to_string(&body)?);
                std::process::exit(api.code.exit_code());
            }
            None => Err(err),
        },
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    match &cli.command {
        Command::Gradient { hex } => {
            print_json(&gradient(hex, settings.hue_shift_degrees))?;
            return Ok(());
        }
        Command::Icon { key } => {
            let catalog = settings.symbol_catalog();
            let icon: Option<SymbolIcon> = catalog.lookup(key);
            print_json(&icon)?;
            return Ok(());
        }
        _ => {}
    }

    let raw_database_url = cli.database_url.as_deref().unwrap_or(&settings.database_url);
    let database_url = prepare_database_url(raw_database_url)?;
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open database '{database_url}'"))?;
    info!(database_url = %database_url, "database ready");

    match cli.command {
        Command::AddCategory {
            name,
            color,
            symbol,
        } => {
            let color = color.unwrap_or_else(|| settings.default_category_color.clone());
            let category_id = storage
                .create_category(&name, &color, symbol.as_deref())
                .await?;
            println!("created category_id={}", category_id.0);
        }
        Command::AddBookmark {
            category_id,
            title,
            url,
            icon_type,
            symbol,
            icon_url,
            color,
        } => {
            let icon_type = IconType::parse(&icon_type).ok_or_else(|| {
                ApiException::validation(format!("unknown icon type '{icon_type}'"))
            })?;
            let draft = BookmarkDraft {
                title,
                url: validate_url(&url)?,
                category_id: CategoryId(category_id),
                icon_type,
                symbol_name: symbol,
                icon_url: non_empty(icon_url.as_deref())
                    .map(validate_url)
                    .transpose()?,
                hex_color: color,
            };
            let bookmark_id = storage.create_bookmark(&draft).await?;
            println!("created bookmark_id={}", bookmark_id.0);
        }
        Command::Duplicate { bookmark_id } => {
            let sync = MutationSync::new(Arc::new(storage));
            let board = BookmarkBoard::new(sync.refresh().await?);
            let intent = board
                .duplicate(BookmarkId(bookmark_id))
                .map_err(|err| ApiException::not_found(err.to_string()))?;
            sync.apply(intent).await?;
            println!("duplicated bookmark_id={bookmark_id}");
        }
        Command::List => {
            let binder = PresentationBinder::new(settings.symbol_catalog())
                .with_hue_shift(settings.hue_shift_degrees)
                .with_default_color(settings.default_category_color.clone());
            let mut board =
                BookmarkBoard::with_presentation(storage.list_categories().await?, binder);

            let category_ids: Vec<_> = board.categories().iter().map(|c| c.id).collect();
            let presentations: Vec<Vec<PresentationDescriptor>> = category_ids
                .into_iter()
                .map(|id| board.describe_category(id).unwrap_or_default())
                .collect();

            let listed: Vec<_> = board
                .categories()
                .iter()
                .zip(presentations)
                .map(|(category, descriptors)| ListedCategory {
                    id: category.id,
                    name: &category.name,
                    hex_color: &category.hex_color,
                    gradient: board.presentation().category_gradient(category),
                    bookmarks: category
                        .bookmarks
                        .iter()
                        .zip(descriptors)
                        .map(|(bookmark, presentation)| ListedBookmark {
                            bookmark,
                            presentation,
                        })
                        .collect(),
                })
                .collect();
            print_json(&listed)?;
        }
        Command::Move { category, from, to } => {
            let category_id = CategoryId(category);
            let store: Arc<dyn BookmarkStore> = Arc::new(storage);
            let sync = MutationSync::new(store);
            let mut board = BookmarkBoard::new(sync.refresh().await?);

            let events = simulate_drag(
                settings.drag_activation_distance,
                BookmarkId(from),
                BookmarkId(to),
            );
            let mut intent = None;
            for event in events {
                intent = board
                    .handle_drag(category_id, event)
                    .map_err(|err| ApiException::validation(err.to_string()))?;
            }

            let Some(intent) = intent else {
                println!("order unchanged");
                return Ok(());
            };
            if let Some(snapshot) = sync.reorder(intent).await? {
                board.replace_snapshot(snapshot);
            }
            let order = board.order(category_id).unwrap_or_default();
            print_json(&order)?;
        }
        Command::Gradient { .. } | Command::Icon { .. } => {}
    }

    Ok(())
}

/// Pointer events for pressing on `from`, travelling far enough to start a
/// drag, and releasing over `to`.
fn simulate_drag(activation_distance: f64, from: BookmarkId, to: BookmarkId) -> Vec<DragEvent> {
    let mut gesture = PointerGesture::new(activation_distance);
    gesture.press(from, Point::new(0.0, 0.0));
    let mut events = gesture.motion(Point::new(0.0, activation_distance.max(1.0)), Some(to));
    events.extend(gesture.release(Some(to)));
    events
}

fn validate_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim())
        .map_err(|err| ApiException::validation(format!("invalid url '{raw}': {err}")))?;
    Ok(parsed.to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_drag_starts_and_drops_on_target() {
        let events = simulate_drag(8.0, BookmarkId(1), BookmarkId(3));
        assert_eq!(
            events,
            vec![
                DragEvent::Start(BookmarkId(1)),
                DragEvent::Over(Some(BookmarkId(3))),
                DragEvent::Over(Some(BookmarkId(3))),
                DragEvent::Drop,
            ]
        );
    }

    #[test]
    fn rejects_relative_urls() {
        let err = validate_url("example.com/path").expect_err("relative url");
        let api = err.downcast_ref::<ApiException>().expect("api exception");
        assert_eq!(api.code, shared::error::ErrorCode::Validation);
        assert_eq!(
            validate_url(" https://example.com ").expect("absolute url"),
            "https://example.com/"
        );
    }

    #[test]
    fn cli_parses_move_flags() {
        let cli = Cli::try_parse_from([
            "launcher", "move", "--category", "2", "--from", "5", "--to", "7",
        ])
        .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Move {
                category: 2,
                from: 5,
                to: 7
            }
        ));
    }
}
