#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use rental_core::{
    config::ConfigManager,
    core::MarketManager,
    domain::{Credentials, ListingDraft, Registration},
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by a unique directory for each test.
pub fn setup_test_env() -> (MarketManager, ConfigManager, PathBuf) {
    let base = temp_home();
    let manager = open_manager(&base);
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}

pub fn open_manager(base: &Path) -> MarketManager {
    let storage =
        JsonStorage::new(Some(base.to_path_buf())).expect("create json storage backend");
    MarketManager::open(Box::new(storage)).expect("open market")
}

/// Registers `name` and signs them in.
pub fn sign_up(manager: &mut MarketManager, name: &str) {
    let email = format!("{}@example.com", name.to_lowercase());
    manager
        .register(Registration {
            name: name.to_string(),
            email: email.clone(),
            password: "secret".into(),
        })
        .expect("register");
    manager
        .sign_in(&Credentials {
            email,
            password: "secret".into(),
        })
        .expect("sign in");
}

pub fn draft(title: &str, category: &str, location: &str, price: u32) -> ListingDraft {
    ListingDraft {
        category: category.into(),
        location_value: location.into(),
        guest_count: 4,
        room_count: 2,
        bathroom_count: 1,
        image_src: "https://img.example.com/photo.jpg".into(),
        title: title.into(),
        description: "A lovely place".into(),
        price,
    }
}
