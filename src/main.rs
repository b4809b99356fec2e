use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use menu_recommender::{
    CatalogOptions, Config, ConfigOverrides, DelimiterSetting, FilterPolicy, LoadStatus, MenuItem,
    MenuLoader, MenuSnapshot, MenuStore, UploadSource,
};

#[derive(Parser, Debug)]
#[command(name = "menu-recommender", version, about = "Find menu items by category and flavor")]
struct Cli {
    /// Configuration file (defaults to ./menu.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Menu file path or http(s) URL
    #[arg(long, global = true)]
    source: Option<String>,
    /// auto, comma or semicolon
    #[arg(long, global = true)]
    delimiter: Option<DelimiterSetting>,
    /// wildcard or require_both
    #[arg(long = "filter-policy", global = true)]
    filter_policy: Option<FilterPolicy>,
    /// Treat the source as a user upload: it must be a CSV file
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    upload: bool,
    /// Use the built-in sample menu instead of loading a file
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    sample: bool,
    /// Print JSON instead of text
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available categories
    Categories,
    /// List the flavors offered in a category
    Flavors { category: String },
    /// Show items matching a category and flavor
    Filter {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        flavor: String,
    },
    /// Print the category and flavor index
    Index,
    /// Show where the menu came from and how many rows were kept
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("menu_recommender=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let overrides = ConfigOverrides {
        config_file: cli.config.clone(),
        source: cli.source.clone(),
        delimiter: cli.delimiter,
        filter_policy: cli.filter_policy,
    };
    let config = Arc::new(Config::load(&overrides)?);

    let store = MenuStore::new(CatalogOptions::from(config.as_ref()));
    let mut status = store.subscribe();

    let loaded = if cli.sample {
        store.load_sample()
    } else {
        let loader = MenuLoader::new(config.clone())?;
        if cli.upload {
            let bytes = tokio::fs::read(&config.source)
                .await
                .with_context(|| format!("Failed to read upload {}", config.source))?;
            let file_name = PathBuf::from(&config.source)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let upload = UploadSource::new(file_name, None, bytes);
            loader.load(&store, &upload).await
        } else {
            loader.load_location(&store, &config.source).await
        }
    };

    let snapshot = match loaded {
        Ok(snapshot) => snapshot,
        Err(e) => anyhow::bail!(e.user_message()),
    };

    if status.has_changed().unwrap_or(false) {
        if let LoadStatus::Loaded {
            categories,
            item_count,
            dropped,
            ..
        } = &*status.borrow_and_update()
        {
            info!(
                "Menu data loaded successfully! {} items in {} categories",
                item_count,
                categories.len()
            );
            if *dropped > 0 {
                warn!("{} rows were skipped because they were incomplete", dropped);
            }
        }
    }

    match cli.command {
        Command::Categories => print_list(&store.categories(), cli.json)?,
        Command::Flavors { category } => print_list(&store.flavors_for(&category), cli.json)?,
        Command::Filter { category, flavor } => {
            print_items(&store.filter(&category, &flavor), cli.json)?
        }
        Command::Index => print_index(&snapshot, cli.json)?,
        Command::Status => print_status(&snapshot, cli.json)?,
    }

    Ok(())
}

fn print_list(values: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(values)?);
    } else {
        for value in values {
            println!("{}", value);
        }
    }
    Ok(())
}

fn print_items(items: &[MenuItem], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No menu items found matching your criteria.");
        return Ok(());
    }

    for item in items {
        println!("{}", item);
        if let Some(description) = &item.description {
            println!("    {}", description);
        }
    }
    Ok(())
}

fn print_index(snapshot: &MenuSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot.index())?);
        return Ok(());
    }

    for (category, flavors) in snapshot.index().flavors_by_category() {
        println!("{}: {}", category, flavors.join(", "));
    }
    Ok(())
}

fn print_status(snapshot: &MenuSnapshot, json: bool) -> Result<()> {
    if json {
        let summary = serde_json::json!({
            "source": snapshot.source(),
            "loadedAt": snapshot.loaded_at(),
            "items": snapshot.items().len(),
            "dropped": snapshot.dropped(),
            "categories": snapshot.index().categories(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Source:     {}", snapshot.source());
        println!("Loaded at:  {}", snapshot.loaded_at().format("%Y-%m-%d %H:%M:%S UTC"));
        println!("Items:      {}", snapshot.items().len());
        println!("Skipped:    {}", snapshot.dropped());
    }
    Ok(())
}
