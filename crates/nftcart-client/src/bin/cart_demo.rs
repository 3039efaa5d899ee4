//! # Cart Demo
//!
//! Drives both screens headlessly with in-memory collaborators and logs
//! every view signal.
//!
//! ## Usage
//! ```bash
//! # Run with the platform config (preference saved across runs)
//! cargo run -p nftcart-client --bin cart-demo
//!
//! # Use an explicit config file
//! cargo run -p nftcart-client --bin cart-demo -- --config ./nftcart.toml
//!
//! # More logging
//! RUST_LOG=trace cargo run -p nftcart-client --bin cart-demo
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nftcart_client::{
    demo_cart_items, CartConfig, CartController, CartView, CollectionController, CollectionView,
    StaticItemSource, StaticProfile, UnsupportedFavoritesStore,
};
use nftcart_core::{Item, ItemCollection, Money, OrderSummary, SortCriterion};

/// View that only logs what it is asked to do.
struct LoggingView;

impl CartView for LoggingView {
    fn toggle_empty_state(&self, is_empty: bool) {
        info!(is_empty, "cart: toggle empty state");
    }
    fn refresh_totals(&self) {
        info!("cart: refresh totals");
    }
    fn refresh_list(&self) {
        info!("cart: refresh list");
    }
    fn present_deletion_confirm(&self, item: &Item) {
        info!(name = %item.display_name, "cart: present deletion confirmation");
    }
    fn present_checkout(&self, summary: &OrderSummary) {
        info!(items = summary.item_count, total = %summary.total, "cart: present checkout");
    }
    fn dismiss_presented_flow(&self) {
        info!("cart: dismiss presented flow");
    }
    fn present_sort_options(&self) {
        info!("cart: present sort options");
    }
}

impl CollectionView for LoggingView {
    fn toggle_empty_state(&self, is_empty: bool) {
        info!(is_empty, "my nfts: toggle empty state");
    }
    fn refresh_list(&self) {
        info!("my nfts: refresh list");
    }
    fn present_sort_options(&self) {
        info!("my nfts: present sort options");
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=nftcart_client=trace` - Show every view signal
/// - Default: INFO, DEBUG for nftcart crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nftcart=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn owned_items() -> Vec<Item> {
    vec![
        Item::new("68", "Lilo", "https://code.s3.yandex.net/Mobile/iOS/NFT/Gray/Lilo/1.png")
            .with_rating(4)
            .with_price(Money::from_cents(3962)),
        Item::new("69", "Spring", "https://code.s3.yandex.net/Mobile/iOS/NFT/Gray/Spring/1.png")
            .with_rating(2)
            .with_price(Money::from_cents(1870)),
        Item::new("71", "Archie", "https://code.s3.yandex.net/Mobile/iOS/NFT/Gray/Archie/1.png")
            .with_rating(5),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("nftcart demo");
                println!();
                println!("Usage: cart-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CartConfig::load_or_default(config_path);
    let view = Arc::new(LoggingView);

    // Cart screen
    let cart_view: Arc<dyn CartView> = view.clone();
    let seed = ItemCollection::from_items(demo_cart_items())?;
    let mut cart = CartController::from_config(seed, &config);
    cart.attach(&cart_view);
    cart.on_view_will_appear();
    info!(items = cart.item_count(), total = %cart.total_price(), "Cart ready");

    cart.request_sort_options();
    cart.request_sort(SortCriterion::Price);

    let deletion = cart.request_deletion(0)?;
    info!(name = %deletion.item().display_name, "Confirming deletion");
    deletion.confirm();
    cart.await_pending_flow().await;
    info!(items = cart.item_count(), total = %cart.total_price(), "After deletion");

    let checkout = cart.request_checkout()?;
    let payload = checkout.summary().to_payload().to_json()?;
    info!(payload = %payload, "Order payload");
    checkout.confirm();
    cart.await_pending_flow().await;
    info!(items = cart.item_count(), "After checkout");

    // My NFTs screen
    let source = StaticItemSource::new(owned_items()).with_failure("70", "404 Not Found");
    let collection_view: Arc<dyn CollectionView> = view.clone();
    let mut collection = CollectionController::from_config(
        Arc::new(source),
        Arc::new(StaticProfile::owning(["68", "69", "70", "71"])),
        Arc::new(UnsupportedFavoritesStore),
        &config,
    );
    collection.attach(&collection_view);
    collection.on_view_load().await;
    collection.sort(SortCriterion::Rating);

    for item in collection.items() {
        info!(
            name = %item.display_name,
            rating = ?item.rating,
            price = %item.price_or_zero(),
            "Owned"
        );
    }

    if let Some(report) = collection.last_fetch_report() {
        for failure in &report.failed {
            info!(id = %failure.id, reason = %failure.message, "Not shown");
        }
    }

    Ok(())
}
