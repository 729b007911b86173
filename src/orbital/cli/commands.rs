//! # CLI Layer
//!
//! One possible front end for orbital. This is the only place that knows about
//! terminal I/O, argument parsing and process exit codes. Each `handle_*`
//! resolves its selectors through the API, calls one operation and formats the
//! outcome; the logic itself lives in the library.
//!
//! The CLI runs one operation per process, so session state (active space,
//! expanded collections) only lasts for the invocation. `--space` picks the
//! space to work in.

use super::print::{
    print_hits, print_messages, print_space, print_spaces, print_tabs, CmdMessage, CollectionView,
};
use super::setup::{
    BackupCommands, Cli, CollectionCommands, Commands, LinkCommands, LinkFields, SpaceCommands,
    TabCommands,
};
use chrono::Utc;
use clap::Parser;
use directories::ProjectDirs;
use orbital::api::OrbitalApi;
use orbital::commands::backup::backup_filename;
use orbital::commands::search::{SearchFilter, Selection};
use orbital::config::OrbitalConfig;
use orbital::error::{OrbitalError, Result};
use orbital::model::{LinkUpdate, SpaceUpdate, AVAILABLE_ICONS};
use orbital::store::fs::FsBackend;
use orbital::tabs::{JsonTabSource, MockTabSource, TabPool, TabSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Overrides the data directory.
const HOME_ENV: &str = "ORBITAL_HOME";
/// Log filter, in `tracing_subscriber::EnvFilter` syntax.
const LOG_ENV: &str = "ORBITAL_LOG";

struct AppContext {
    api: OrbitalApi<FsBackend>,
    data_dir: PathBuf,
    config: OrbitalConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { all }) => handle_list(&ctx, all),
        Some(Commands::Search {
            query,
            filter,
            select,
        }) => handle_search(&mut ctx, &query.join(" "), filter, select),
        Some(Commands::Space(cmd)) => match cmd {
            SpaceCommands::List => handle_space_list(&ctx),
            SpaceCommands::Add { name, icon } => handle_space_add(&mut ctx, &name.join(" "), &icon),
            SpaceCommands::Edit { space, name, icon } => {
                handle_space_edit(&mut ctx, &space, SpaceUpdate { name, icon })
            }
            SpaceCommands::Delete { space } => handle_space_delete(&mut ctx, &space),
            SpaceCommands::Icons => {
                println!("{}", AVAILABLE_ICONS.join(" "));
                Ok(())
            }
        },
        Some(Commands::Collection(cmd)) => match cmd {
            CollectionCommands::Add { name } => handle_collection_add(&mut ctx, &name.join(" ")),
            CollectionCommands::Rename { collection, name } => {
                handle_collection_rename(&mut ctx, &collection, &name.join(" "))
            }
            CollectionCommands::Delete { collection } => {
                handle_collection_delete(&mut ctx, &collection)
            }
            CollectionCommands::Star { collection } => handle_collection_star(&mut ctx, &collection),
            CollectionCommands::Move { collection, target } => {
                handle_collection_move(&mut ctx, &collection, &target)
            }
            CollectionCommands::Export { collection, output } => {
                handle_collection_export(&ctx, &collection, output)
            }
        },
        Some(Commands::Link(cmd)) => match cmd {
            LinkCommands::Add {
                collection,
                url,
                title,
                comment,
            } => handle_link_add(&mut ctx, &collection, &url, title, comment),
            LinkCommands::Edit { link, fields } => handle_link_edit(&mut ctx, &link, fields),
            LinkCommands::Delete { link } => handle_link_delete(&mut ctx, &link),
            LinkCommands::Move { link, target } => handle_link_move(&mut ctx, &link, &target),
            LinkCommands::Reparent { link, collection } => {
                handle_link_reparent(&mut ctx, &link, &collection)
            }
        },
        Some(Commands::Tabs(cmd)) => match cmd {
            TabCommands::List => {
                print_tabs(&ctx.api.tabs_by_window());
                Ok(())
            }
            TabCommands::Save { tab, collection } => {
                handle_tab_save(&mut ctx, &tab, collection.as_deref())
            }
            TabCommands::SaveWindow { window } => handle_tab_save_window(&mut ctx, window),
        },
        Some(Commands::Backup(cmd)) => match cmd {
            BackupCommands::Export { output } => handle_backup_export(&ctx, output),
            BackupCommands::Import { file } => handle_backup_import(&mut ctx, &file),
        },
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_list(&ctx, false),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("app", "orbital", "orbital")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| OrbitalError::Store("Could not determine data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = OrbitalConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable config, using defaults");
        OrbitalConfig::default()
    });
    debug!(dir = %data_dir.display(), "data directory");

    let tabs_file = cli.tabs.clone().or_else(|| config.tabs_file.clone());
    let source: Box<dyn TabSource> = match tabs_file {
        Some(path) => Box::new(JsonTabSource::new(path)),
        None => Box::new(MockTabSource),
    };
    let pool = TabPool::from_source(source.as_ref())?;

    let mut api = OrbitalApi::open(FsBackend::new(&data_dir), pool, &config)?;
    if let Some(selector) = &cli.space {
        let id = api.resolve_space(selector)?.id.clone();
        api.set_active_space(&id)?;
    }

    Ok(AppContext {
        api,
        data_dir,
        config,
    })
}

fn active_space_id(ctx: &AppContext) -> String {
    ctx.api.session().active_space_id().to_string()
}

fn handle_list(ctx: &AppContext, all: bool) -> Result<()> {
    let library = ctx.api.library();
    let active = ctx.api.session().active_space_id();
    let spaces: Vec<_> = library
        .spaces()
        .iter()
        .filter(|s| all || s.id == active)
        .collect();

    for (i, space) in spaces.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let views: Vec<CollectionView> = library
            .collections_in_space(&space.id)
            .map(|collection| CollectionView {
                collection,
                links: library.links_in_collection(&collection.id).collect(),
                expanded: ctx.api.session().is_expanded(&collection.id),
            })
            .collect();
        print_space(space, &views);
    }
    Ok(())
}

fn handle_search(
    ctx: &mut AppContext,
    query: &str,
    filter: SearchFilter,
    select: bool,
) -> Result<()> {
    let outcome = ctx.api.search(query, filter);
    print_hits(&outcome);

    let Some(hit) = outcome.hits().first().filter(|_| select) else {
        return Ok(());
    };
    let message = match ctx.api.select(hit, Utc::now())? {
        Selection::Focus {
            space_id,
            collection_id,
            ..
        } => {
            let space = ctx.api.resolve_space(&space_id)?.name.clone();
            let collection = ctx.api.resolve_collection(&collection_id)?.name.clone();
            CmdMessage::success(format!("Focused {} in {}", collection, space))
        }
        Selection::Reveal { tab_id } => CmdMessage::info(format!("Open tab {}", tab_id)),
    };
    print_messages(&[message]);
    Ok(())
}

fn handle_space_list(ctx: &AppContext) -> Result<()> {
    print_spaces(ctx.api.spaces(), ctx.api.session().active_space_id());
    Ok(())
}

fn handle_space_add(ctx: &mut AppContext, name: &str, icon: &str) -> Result<()> {
    let space = ctx.api.create_space(name, icon);
    print_messages(&[CmdMessage::success(format!(
        "Created space {} ({})",
        space.name, space.id
    ))]);
    Ok(())
}

fn handle_space_edit(ctx: &mut AppContext, selector: &str, update: SpaceUpdate) -> Result<()> {
    let id = ctx.api.resolve_space(selector)?.id.clone();
    let message = match ctx.api.update_space(&id, update) {
        Some(space) => CmdMessage::success(format!("Space is now {} [{}]", space.name, space.icon)),
        None => CmdMessage::warning("Nothing changed."),
    };
    print_messages(&[message]);
    Ok(())
}

fn handle_space_delete(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let id = ctx.api.resolve_space(selector)?.id.clone();
    let removal = ctx.api.delete_space(&id)?;
    print_messages(&[CmdMessage::success(format!(
        "Deleted space {} with {} collections and {} links",
        removal.space.name,
        removal.collections.len(),
        removal.links.len()
    ))]);
    Ok(())
}

fn handle_collection_add(ctx: &mut AppContext, name: &str) -> Result<()> {
    let space_id = active_space_id(ctx);
    let collection = ctx.api.create_collection(&space_id, Some(name))?;
    print_messages(&[CmdMessage::success(format!(
        "Created collection {} ({})",
        collection.name, collection.id
    ))]);
    Ok(())
}

fn handle_collection_rename(ctx: &mut AppContext, selector: &str, name: &str) -> Result<()> {
    let id = ctx.api.resolve_collection(selector)?.id.clone();
    if let Some(collection) = ctx.api.rename_collection(&id, name) {
        print_messages(&[CmdMessage::success(format!(
            "Renamed to {}",
            collection.name
        ))]);
    }
    Ok(())
}

fn handle_collection_delete(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let id = ctx.api.resolve_collection(selector)?.id.clone();
    let removal = ctx.api.delete_collection(&id)?;
    print_messages(&[CmdMessage::success(format!(
        "Deleted collection {} and {} links",
        removal.collection.name,
        removal.links.len()
    ))]);
    Ok(())
}

fn handle_collection_star(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let id = ctx.api.resolve_collection(selector)?.id.clone();
    if let Some(collection) = ctx.api.toggle_star(&id) {
        let state = if collection.is_starred {
            "Starred"
        } else {
            "Unstarred"
        };
        print_messages(&[CmdMessage::success(format!("{} {}", state, collection.name))]);
    }
    Ok(())
}

fn handle_collection_move(ctx: &mut AppContext, selector: &str, target: &str) -> Result<()> {
    let id = ctx.api.resolve_collection(selector)?.id.clone();
    let target_id = ctx.api.resolve_collection(target)?.id.clone();
    let message = if ctx.api.reorder_collections(&id, &target_id) {
        CmdMessage::success("Collection moved.")
    } else {
        CmdMessage::info("Nothing to move.")
    };
    print_messages(&[message]);
    Ok(())
}

fn handle_collection_export(
    ctx: &AppContext,
    selector: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let id = ctx.api.resolve_collection(selector)?.id.clone();
    let export = ctx.api.export_collection_csv(&id)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));
    fs::write(&path, export.content).map_err(OrbitalError::Io)?;
    print_messages(&[CmdMessage::success(format!(
        "Exported to {}",
        path.display()
    ))]);
    Ok(())
}

fn handle_link_add(
    ctx: &mut AppContext,
    collection: &str,
    url: &str,
    title: Option<String>,
    comment: Option<String>,
) -> Result<()> {
    let collection_id = ctx.api.resolve_collection(collection)?.id.clone();
    let title = title.unwrap_or_else(|| url.to_string());
    let link = ctx.api.create_link(&collection_id, &title, url, comment)?;
    print_messages(&[CmdMessage::success(format!(
        "Saved {} ({})",
        link.url, link.id
    ))]);
    Ok(())
}

fn handle_link_edit(ctx: &mut AppContext, selector: &str, fields: LinkFields) -> Result<()> {
    let id = ctx.api.resolve_link(selector)?.id.clone();
    let update = LinkUpdate {
        title: fields.title,
        url: fields.url,
        comment: fields.comment,
    };
    if update.is_empty() {
        print_messages(&[CmdMessage::warning(
            "Nothing to change: pass --title, --url or --comment.",
        )]);
        return Ok(());
    }
    if let Some(link) = ctx.api.update_link(&id, update) {
        print_messages(&[CmdMessage::success(format!("Updated {}", link.title))]);
    }
    Ok(())
}

fn handle_link_delete(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let id = ctx.api.resolve_link(selector)?.id.clone();
    if let Some(link) = ctx.api.remove_link(&id) {
        print_messages(&[CmdMessage::success(format!("Deleted {}", link.title))]);
    }
    Ok(())
}

fn handle_link_move(ctx: &mut AppContext, selector: &str, target: &str) -> Result<()> {
    let id = ctx.api.resolve_link(selector)?.id.clone();
    let target_id = ctx.api.resolve_link(target)?.id.clone();
    let message = if ctx.api.reorder_links(&id, &target_id) {
        CmdMessage::success("Link moved.")
    } else {
        CmdMessage::info("Nothing to move.")
    };
    print_messages(&[message]);
    Ok(())
}

fn handle_link_reparent(ctx: &mut AppContext, selector: &str, collection: &str) -> Result<()> {
    let id = ctx.api.resolve_link(selector)?.id.clone();
    let collection_id = ctx.api.resolve_collection(collection)?.id.clone();
    let message = if ctx.api.reparent_link(&id, &collection_id) {
        CmdMessage::success("Link moved.")
    } else {
        CmdMessage::info("Link is already there.")
    };
    print_messages(&[message]);
    Ok(())
}

fn handle_tab_save(ctx: &mut AppContext, tab: &str, collection: Option<&str>) -> Result<()> {
    let link = match collection {
        Some(selector) => {
            let collection_id = ctx.api.resolve_collection(selector)?.id.clone();
            ctx.api.add_tab_to_collection(tab, &collection_id)?
        }
        None => ctx.api.quick_add_tab(tab)?,
    };
    print_messages(&[CmdMessage::success(format!(
        "Saved {} ({})",
        link.title, link.id
    ))]);
    Ok(())
}

fn handle_tab_save_window(ctx: &mut AppContext, window: i64) -> Result<()> {
    let message = match ctx.api.save_window_as_session(window)? {
        Some((collection, links)) => CmdMessage::success(format!(
            "Saved {} tabs into {} ({})",
            links.len(),
            collection.name,
            collection.id
        )),
        None => CmdMessage::warning(format!("Window {} has no open tabs.", window)),
    };
    print_messages(&[message]);
    Ok(())
}

fn handle_backup_export(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let backup = ctx.api.export_backup();
    let path = output.unwrap_or_else(|| PathBuf::from(backup_filename(Utc::now().date_naive())));
    fs::write(&path, backup.to_json()?).map_err(OrbitalError::Io)?;
    print_messages(&[CmdMessage::success(format!(
        "Backed up {} spaces, {} collections and {} links to {}",
        backup.data.spaces.len(),
        backup.data.collections.len(),
        backup.data.links.len(),
        path.display()
    ))]);
    Ok(())
}

fn handle_backup_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file).map_err(OrbitalError::Io)?;
    let summary = ctx.api.import_backup(&json)?;
    let mut messages = vec![CmdMessage::success(format!(
        "Restored {} spaces, {} collections and {} links",
        summary.spaces, summary.collections, summary.links
    ))];
    if summary.reseeded {
        messages.push(CmdMessage::warning(
            "The backup had no spaces; default spaces were created.",
        ));
    }
    print_messages(&messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for (key, value) in ctx.config.entries() {
                println!("{} = {}", key, value);
            }
        }
        (Some(key), None) => {
            let entry = ctx.config.entries().into_iter().find(|(k, _)| *k == key);
            match entry {
                Some((key, value)) => println!("{} = {}", key, value),
                None => {
                    return Err(OrbitalError::InvariantViolation(format!(
                        "Unknown config key: {}",
                        key
                    )))
                }
            }
        }
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value)?;
            ctx.config.save(&ctx.data_dir)?;
            print_messages(&[CmdMessage::success(format!("Set {}", key))]);
        }
    }
    Ok(())
}
