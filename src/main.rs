use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use storefront::{
    CategoryFilter, Entry, ItemCollection, Level, NotificationSink, SortDirection, Storefront,
    StorefrontConfig,
};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse the catalog and manage a cart and wishlist")]
struct Cli {
    /// Directory holding the cart and wishlist files
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    data_dir: PathBuf,

    /// Catalog document (JSON array of products)
    #[arg(long, env = "STOREFRONT_CATALOG", default_value = "products.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products, optionally for one category
    Products {
        #[arg(long, default_value = "all")]
        category: String,
    },
    Categories,
    /// Show one product
    Show {
        id: i64,
    },
    /// Price and rating chart data plus a summary
    Stats,
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Pay for everything in the cart
    Purchase,
}

#[derive(Subcommand)]
enum CartAction {
    List,
    Add { id: i64 },
    Remove { id: i64 },
    Clear,
    Sort {
        #[arg(long)]
        asc: bool,
    },
    Total,
}

#[derive(Subcommand)]
enum WishlistAction {
    List,
    Add { id: i64 },
    Remove { id: i64 },
    Move { id: i64 },
    Clear,
}

struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Error => eprintln!("[{}] {}", level, message),
            Level::Success | Level::Info => println!("[{}] {}", level, message),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env()
        .map_err(|e| anyhow!(e))?
        .data_dir(&cli.data_dir)
        .catalog_path_if_exists(&cli.catalog);
    if config.catalog_path.is_none() && needs_catalog(&cli.command) {
        return Err(anyhow!("Catalog '{}' not found", cli.catalog.display()));
    }

    let mut shop = Storefront::from_config(config, Arc::new(ConsoleSink))
        .with_context(|| format!("Failed to open storefront in '{}'", cli.data_dir.display()))?;

    match cli.command {
        Command::Products { category } => {
            let filter: CategoryFilter = category.parse()?;
            let products = shop.products(&filter);
            println!("{}", filter);
            if products.is_empty() {
                println!("No products found in this category.");
            }
            for item in products {
                println!(
                    "{:>4}  {:<32} ${:>9}  {}",
                    item.product_id, item.product_title, item.price, item.category
                );
            }
        }
        Command::Categories => {
            for category in shop.catalog().categories() {
                println!("{}", category);
            }
        }
        Command::Show { id } => {
            let item = shop
                .catalog()
                .find(id)
                .ok_or_else(|| anyhow!("Product {} not found", id))?;
            println!("{} (#{})", item.product_title, item.product_id);
            println!("Price: ${}", item.price);
            println!("Category: {}", item.category);
            println!("Rating: {:.1}/5", item.rating);
            println!(
                "{}",
                if item.availability { "In Stock" } else { "Out of Stock" }
            );
            if let Some(description) = &item.description {
                println!("{}", description);
            }
            for spec in &item.specifications {
                println!("  - {}", spec);
            }
            if shop.wishlist().contains(id) {
                println!("(in your wishlist)");
            }
        }
        Command::Stats => {
            let points = shop.catalog().chart_points();
            let summary = shop.catalog().summary();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "chart": points,
                    "summary": summary,
                }))?
            );
        }
        Command::Cart { action } => match action {
            CartAction::List => {
                print_entries(shop.cart().items(), "Your cart is empty.");
                println!("Total: ${}", shop.cart().total_price());
            }
            CartAction::Add { id } => {
                shop.add_product_to_cart(id);
            }
            CartAction::Remove { id } => {
                shop.cart_mut().remove_from_cart(id);
            }
            CartAction::Clear => {
                shop.cart_mut().clear_cart();
            }
            CartAction::Sort { asc } => {
                let direction = if asc {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                };
                shop.cart_mut().sort_cart_by_price(direction);
                print_entries(shop.cart().items(), "Your cart is empty.");
            }
            CartAction::Total => println!("{}", shop.cart().total_price()),
        },
        Command::Wishlist { action } => match action {
            WishlistAction::List => {
                print_entries(shop.wishlist().items(), "Your wishlist is empty.")
            }
            WishlistAction::Add { id } => {
                shop.add_product_to_wishlist(id);
            }
            WishlistAction::Remove { id } => {
                shop.wishlist_mut().remove_from_wishlist(id);
            }
            WishlistAction::Move { id } => {
                shop.move_to_cart(id);
            }
            WishlistAction::Clear => {
                shop.wishlist_mut().clear_wishlist();
            }
        },
        Command::Purchase => {
            if let Some(receipt) = shop.purchase() {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            }
        }
    }

    Ok(())
}

fn needs_catalog(command: &Command) -> bool {
    matches!(
        command,
        Command::Products { .. }
            | Command::Categories
            | Command::Show { .. }
            | Command::Stats
            | Command::Cart {
                action: CartAction::Add { .. }
            }
            | Command::Wishlist {
                action: WishlistAction::Add { .. }
            }
    )
}

fn print_entries(items: &ItemCollection, empty_message: &str) {
    if items.is_empty() {
        println!("{}", empty_message);
        return;
    }
    for Entry {
        product_id,
        product_title,
        price,
        ..
    } in items
    {
        println!("{:>4}  {:<32} ${:>9}", product_id, product_title, price);
    }
}
