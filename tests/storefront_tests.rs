use std::path::PathBuf;
use std::sync::Arc;
use storefront::{
    Catalog, CategoryFilter, Entry, KeyValueStore, Level, MemoryStore, Outcome, PersistentStore,
    Price, RecordingSink, Storefront, StorefrontConfig,
};
use tempfile::TempDir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/products.json")
}

fn catalog() -> Catalog {
    Catalog::load(fixture_path()).unwrap()
}

fn open(backend: Arc<MemoryStore>) -> (Storefront, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let shop = Storefront::open(StorefrontConfig::default(), backend, sink.clone())
        .unwrap()
        .with_catalog(catalog());
    (shop, sink)
}

#[test]
fn test_catalog_categories_and_filter() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 6);
    assert_eq!(
        catalog.categories(),
        vec!["computers", "phones", "smart watches", "power banks", "chargers"]
    );

    assert_eq!(catalog.filter(&CategoryFilter::All).len(), 6);

    let phones: Vec<i64> = catalog
        .filter(&"phones".parse().unwrap())
        .iter()
        .map(|item| item.product_id)
        .collect();
    assert_eq!(phones, vec![2, 6]);

    assert!(catalog.filter(&CategoryFilter::Category("toasters".into())).is_empty());
    assert_eq!(CategoryFilter::Category("phones".into()).to_string(), "Phones");
    assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
}

#[test]
fn test_catalog_details() {
    let catalog = catalog();
    let xps = catalog.find(1).unwrap();
    assert_eq!(xps.price, Price::from_cents(99_999));
    assert_eq!(xps.specifications.len(), 3);
    assert!(xps.description.is_some());
    assert!(!catalog.find(3).unwrap().availability);
    assert!(catalog.find(99).is_none());
}

#[test]
fn test_catalog_rejects_duplicate_ids() {
    let raw = r#"[
        {"product_id": 1, "product_title": "A", "product_image": "a", "price": 1, "category": "x"},
        {"product_id": 1, "product_title": "B", "product_image": "b", "price": 2, "category": "x"}
    ]"#;
    assert!(Catalog::from_json_str(raw).is_err());
}

#[test]
fn test_chart_points() {
    let points = catalog().chart_points();
    assert_eq!(points[0].name, "Dell XPS 1...");
    assert_eq!(points[1].name, "iPhone 14");
    assert!((points[0].rating - 94.0).abs() < 1e-9);
}

#[test]
fn test_spend_cap_scenario() {
    let (mut shop, sink) = open(Arc::new(MemoryStore::new()));

    assert!(matches!(shop.add_product_to_cart(6), Outcome::Added { .. }));
    assert!(matches!(
        shop.add_product_to_cart(2),
        Outcome::CapExceeded { .. }
    ));
    assert_eq!(shop.cart().len(), 1);
    assert_eq!(shop.cart().total_price(), "599.00");
    assert_eq!(sink.last().unwrap().level, Level::Error);
}

#[test]
fn test_unavailable_and_unknown_products() {
    let (mut shop, sink) = open(Arc::new(MemoryStore::new()));

    assert!(matches!(
        shop.add_product_to_cart(3),
        Outcome::Unavailable { .. }
    ));
    assert!(matches!(
        shop.add_product_to_cart(99),
        Outcome::UnknownProduct { product_id: 99 }
    ));
    assert!(shop.cart().is_empty());
    assert_eq!(sink.count(Level::Error), 2);

    // Out-of-stock items can still be wished for.
    assert!(matches!(
        shop.add_product_to_wishlist(3),
        Outcome::Added { .. }
    ));
}

#[test]
fn test_wishlist_to_purchase_flow() {
    let (mut shop, _sink) = open(Arc::new(MemoryStore::new()));

    shop.add_product_to_wishlist(4);
    shop.add_product_to_wishlist(5);
    shop.move_to_cart(4);
    shop.move_to_cart(5);
    assert!(shop.wishlist().is_empty());
    assert_eq!(shop.cart().total_price(), "89.49");

    let receipt = shop.purchase().unwrap();
    assert_eq!(receipt.item_count(), 2);
    assert_eq!(receipt.total, Price::from_cents(8_949));
    assert!(shop.cart().is_empty());
    assert!(shop.purchase().is_none());
}

#[test]
fn test_state_survives_reopen() {
    let backend = Arc::new(MemoryStore::new());
    {
        let (mut shop, _sink) = open(backend.clone());
        shop.add_product_to_cart(1);
        shop.add_product_to_wishlist(2);
    }

    let (shop, _sink) = open(backend);
    assert!(shop.cart().is_initialized());
    assert!(shop.cart().contains(1));
    assert!(shop.wishlist().contains(2));
}

#[test]
fn test_hydration_drops_duplicates_and_over_cap() {
    let backend = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let seed = PersistentStore::new(backend.clone(), sink);
    seed.save(
        "cartItems",
        &[
            Entry::new(1, "Phone", "p.png", Price::from_cents(60_000), "phones"),
            Entry::new(1, "Phone", "p.png", Price::from_cents(60_000), "phones"),
            Entry::new(2, "Laptop", "l.png", Price::from_cents(50_000), "computers"),
            Entry::new(3, "Cable", "c.png", Price::from_cents(1_000), "misc"),
        ],
    );

    let (shop, _sink) = open(backend.clone());
    let ids: Vec<i64> = shop.cart().items().iter().map(|e| e.product_id).collect();
    assert_eq!(ids, vec![1, 3]);

    // The cleaned cart is written back.
    let stored = seed.load("cartItems");
    assert_eq!(stored.len(), 2);
    assert!(backend.get("cartItems").unwrap().is_some());
}

#[test]
fn test_corrupt_storage_opens_empty() {
    let backend = Arc::new(MemoryStore::new());
    backend.set("cartItems", "not json at all").unwrap();
    backend.set("wishlistItems", "{}").unwrap();

    let (shop, sink) = open(backend.clone());
    assert!(shop.cart().is_empty());
    assert!(shop.wishlist().is_empty());
    assert_eq!(backend.get("cartItems").unwrap(), None);
    assert_eq!(backend.get("wishlistItems").unwrap(), None);
    assert_eq!(sink.count(Level::Error), 2);
}

#[test]
fn test_file_backed_storefront() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorefrontConfig::new()
        .data_dir(temp_dir.path().join("state"))
        .catalog_path(fixture_path());

    {
        let mut shop =
            Storefront::from_config(config.clone(), Arc::new(RecordingSink::new())).unwrap();
        assert_eq!(shop.catalog().len(), 6);
        shop.add_product_to_cart(2);
        shop.add_product_to_cart(5);
    }

    let shop = Storefront::from_config(config, Arc::new(RecordingSink::new())).unwrap();
    assert_eq!(shop.cart().len(), 2);
    assert_eq!(shop.cart().total_price(), "838.50");
    assert!(temp_dir.path().join("state").join("cartItems.json").exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = StorefrontConfig::new().wishlist_key("cartItems");
    let result = Storefront::open(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingSink::new()),
    );
    assert!(result.is_err());

    let no_dir = Storefront::from_config(StorefrontConfig::new(), Arc::new(RecordingSink::new()));
    assert!(no_dir.is_err());
}
