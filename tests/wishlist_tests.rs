use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storefront::{
    Candidate, CartManager, KeyValueStore, Level, MemoryStore, Outcome, PersistentStore,
    RecordingSink, StoreError, StorefrontConfig, WishlistManager,
};

/// Memory store whose writes can be cut off per key or after a budget.
#[derive(Debug)]
struct FlakyStore {
    inner: MemoryStore,
    blocked: Mutex<Vec<String>>,
    writes_left: AtomicUsize,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            blocked: Mutex::new(Vec::new()),
            writes_left: AtomicUsize::new(usize::MAX),
        }
    }

    fn block(&self, key: &str) {
        self.blocked.lock().unwrap().push(key.to_string());
    }

    fn allow_writes(&self, count: usize) {
        self.writes_left.store(count, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> storefront::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> storefront::Result<()> {
        let blocked = self.blocked.lock().unwrap().iter().any(|k| k == key);
        let budget = self
            .writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if blocked || budget.is_err() {
            return Err(StoreError::IoError("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> storefront::Result<()> {
        self.inner.remove(key)
    }
}

fn flaky_setup() -> (Arc<FlakyStore>, Arc<RecordingSink>, CartManager, WishlistManager) {
    let backend = Arc::new(FlakyStore::new());
    let sink = Arc::new(RecordingSink::new());
    let store = PersistentStore::new(backend.clone(), sink.clone());
    let config = StorefrontConfig::default();
    let mut cart = CartManager::new(store.clone(), &config);
    let mut wishlist = WishlistManager::new(store, &config);
    cart.hydrate();
    wishlist.hydrate();
    (backend, sink, cart, wishlist)
}

struct Fixture {
    backend: Arc<MemoryStore>,
    sink: Arc<RecordingSink>,
    cart: CartManager,
    wishlist: WishlistManager,
}

fn setup() -> Fixture {
    let backend = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let store = PersistentStore::new(backend.clone(), sink.clone());
    let config = StorefrontConfig::default();
    let mut cart = CartManager::new(store.clone(), &config);
    let mut wishlist = WishlistManager::new(store, &config);
    cart.hydrate();
    wishlist.hydrate();
    Fixture {
        backend,
        sink,
        cart,
        wishlist,
    }
}

fn item(id: i64, title: &str, price: f64) -> Candidate {
    serde_json::from_value(json!({
        "product_id": id,
        "product_title": title,
        "product_image": format!("{}.png", title.to_lowercase()),
        "price": price,
        "category": "misc"
    }))
    .unwrap()
}

#[test]
fn test_add_has_no_cap() {
    let mut f = setup();

    assert!(f.wishlist.add_to_wishlist(&item(1, "Laptop", 2500.0)));
    assert!(f.wishlist.add_to_wishlist(&item(2, "Camera", 1800.0)));
    assert_eq!(f.wishlist.len(), 2);
    assert!(f.backend.get("wishlistItems").unwrap().is_some());
    assert_eq!(f.sink.last().unwrap().level, Level::Success);
}

#[test]
fn test_duplicate_is_info() {
    let mut f = setup();

    assert!(f.wishlist.add_to_wishlist(&item(1, "Laptop", 25.0)));
    assert!(!f.wishlist.add_to_wishlist(&item(1, "Laptop", 25.0)));
    assert_eq!(f.wishlist.len(), 1);
    assert_eq!(f.sink.last().unwrap().level, Level::Info);
}

#[test]
fn test_remove_and_clear() {
    let mut f = setup();
    f.wishlist.add_to_wishlist(&item(1, "Laptop", 25.0));
    f.wishlist.add_to_wishlist(&item(2, "Mouse", 15.0));
    f.sink.take();

    let outcome = f.wishlist.remove_from_wishlist(7);
    assert!(matches!(outcome, Outcome::NotFound { product_id: 7, .. }));
    assert_eq!(f.sink.count(Level::Error), 1);
    assert_eq!(f.wishlist.len(), 2);

    f.wishlist.remove_from_wishlist(1);
    assert!(!f.wishlist.contains(1));

    f.wishlist.clear_wishlist();
    assert!(f.wishlist.is_empty());
    assert_eq!(
        f.backend.get("wishlistItems").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn test_move_to_cart_success() {
    let mut f = setup();
    f.wishlist.add_to_wishlist(&item(5, "Watch", 50.0));

    let outcome = f.wishlist.move_to_cart(5, &mut f.cart);
    assert!(matches!(outcome, Outcome::MovedToCart(_)));
    assert!(!f.wishlist.contains(5));
    assert!(f.cart.contains(5));
    assert_eq!(f.cart.total_price(), "50.00");

    let last = f.sink.last().unwrap();
    assert_eq!(last.level, Level::Success);
    assert!(last.message.contains("moved to cart"));
}

#[test]
fn test_move_over_cap_keeps_item() {
    let mut f = setup();
    assert!(f.cart.add_to_cart(&item(1, "Laptop", 980.0)));
    f.wishlist.add_to_wishlist(&item(5, "Watch", 50.0));
    let cart_before = f.backend.get("cartItems").unwrap();
    let wishlist_before = f.backend.get("wishlistItems").unwrap();
    f.sink.take();

    let outcome = f.wishlist.move_to_cart(5, &mut f.cart);
    assert_eq!(outcome, Outcome::MoveRejected { product_id: 5 });

    assert!(f.wishlist.contains(5));
    assert!(!f.cart.contains(5));
    assert_eq!(f.cart.total_price(), "980.00");
    assert_eq!(f.backend.get("cartItems").unwrap(), cart_before);
    assert_eq!(f.backend.get("wishlistItems").unwrap(), wishlist_before);

    // Only the cart's own rejection is reported.
    let received = f.sink.notifications();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, Level::Error);
}

#[test]
fn test_move_duplicate_keeps_item() {
    let mut f = setup();
    f.cart.add_to_cart(&item(5, "Watch", 50.0));
    f.wishlist.add_to_wishlist(&item(5, "Watch", 50.0));
    f.sink.take();

    f.wishlist.move_to_cart(5, &mut f.cart);
    assert!(f.wishlist.contains(5));
    assert_eq!(f.cart.len(), 1);

    let received = f.sink.notifications();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].level, Level::Info);
}

#[test]
fn test_move_missing_item() {
    let mut f = setup();
    f.sink.take();

    let outcome = f.wishlist.move_to_cart(42, &mut f.cart);
    assert!(matches!(outcome, Outcome::NotFound { product_id: 42, .. }));
    assert!(f.cart.is_empty());
    assert_eq!(f.sink.count(Level::Error), 1);
}

#[test]
fn test_move_is_never_both_or_neither() {
    let mut f = setup();
    let prices = [400.0, 350.0, 300.0, 120.0, 90.0];
    for (index, price) in prices.iter().enumerate() {
        f.wishlist
            .add_to_wishlist(&item(index as i64 + 1, "Thing", *price));
    }

    for id in 1..=prices.len() as i64 {
        f.wishlist.move_to_cart(id, &mut f.cart);
        assert!(
            f.wishlist.contains(id) != f.cart.contains(id),
            "product {} must be in exactly one collection",
            id
        );
    }

    assert!(f.cart.total().unwrap().as_f64() <= 1000.0);
}

#[test]
fn test_persistence_suppressed_until_hydrated() {
    let backend = Arc::new(MemoryStore::new());
    backend
        .set(
            "wishlistItems",
            r#"[{"product_id":9,"product_title":"Saved","product_image":"s.png","price":10}]"#,
        )
        .unwrap();
    let sink = Arc::new(RecordingSink::new());
    let store = PersistentStore::new(backend.clone(), sink);
    let mut wishlist = WishlistManager::new(store, &StorefrontConfig::default());

    assert!(!wishlist.is_initialized());
    wishlist.add_to_wishlist(&item(1, "Early", 5.0));
    // The stored value was not clobbered by the early add.
    assert!(backend.get("wishlistItems").unwrap().unwrap().contains("Saved"));

    wishlist.hydrate();
    assert!(wishlist.is_initialized());
    assert!(wishlist.contains(9));
}

#[test]
fn test_move_undone_when_wishlist_save_fails() {
    let (backend, sink, mut cart, mut wishlist) = flaky_setup();
    wishlist.add_to_wishlist(&item(5, "Watch", 50.0));
    backend.block("wishlistItems");
    sink.take();

    let outcome = wishlist.move_to_cart(5, &mut cart);
    assert!(matches!(outcome, Outcome::MoveFailed(ref entry) if entry.product_id == 5));
    assert!(!outcome.is_success());
    assert!(wishlist.contains(5));
    assert!(!cart.contains(5));
    assert!(!backend.get("cartItems").unwrap().unwrap().contains("Watch"));

    let received = sink.notifications();
    let levels: Vec<Level> = received.iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![Level::Success, Level::Error, Level::Error]);
    assert!(received[1].message.contains("disk full"));
    assert!(received[2].message.contains("Watch"));
    assert!(received[2].message.contains("still in your wishlist"));
}

#[test]
fn test_move_undone_in_memory_when_every_save_fails() {
    let (backend, sink, mut cart, mut wishlist) = flaky_setup();
    wishlist.add_to_wishlist(&item(5, "Watch", 50.0));
    // The cart add goes through, the wishlist save and the undo do not.
    backend.allow_writes(1);
    sink.take();

    let outcome = wishlist.move_to_cart(5, &mut cart);
    assert!(matches!(outcome, Outcome::MoveFailed(_)));
    assert!(wishlist.contains(5));
    assert!(!cart.contains(5));
    assert_eq!(cart.total_price(), "0.00");

    let last = sink.last().unwrap();
    assert_eq!(last.level, Level::Error);
    assert!(last.message.contains("still in your wishlist"));
}
