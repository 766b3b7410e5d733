// Basic usage example for xmlprefs
//
// Run with: cargo run --example basic_usage

use serde::{Deserialize, Serialize};
use xmlprefs::{PreferenceStore, StorageConfig};

// Whatever shape your provider needs; only serde derives are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ExplorerView {
    layout: String,
    icon_size: u32,
    show_hidden: bool,
    columns: Vec<String>,
}

impl Default for ExplorerView {
    fn default() -> Self {
        Self {
            layout: "details".to_string(),
            icon_size: 32,
            show_hidden: false,
            columns: vec!["name".to_string(), "size".to_string()],
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let config = StorageConfig::builder("Zarestia", "xmlprefs-demo")
        .config_dir("./example_config")
        .build();
    let store = PreferenceStore::new(config);

    println!("📦 xmlprefs Basic Usage Example\n");

    // Nothing saved yet: falls back to defaults
    let view: ExplorerView = store.load("Explorer", "View").unwrap_or_default();
    println!("✅ Current view: {view:?}\n");

    println!("🔧 Switching to icon layout...");
    let updated = ExplorerView {
        layout: "icons".to_string(),
        icon_size: 64,
        ..view
    };
    store.save_then(&updated, "Explorer", "View", || println!("💾 Saved"));

    let reloaded = store.load_then::<ExplorerView, _>("Explorer", "View", |v| {
        println!("📂 Reloaded: {v:?}")
    });
    assert_eq!(reloaded.as_ref(), Some(&updated));

    // Invalid names are logged as warnings and otherwise ignored
    store.save(&updated, "Explorer", "../escape");

    println!("\n🗑️ Removing saved view...");
    store.remove("Explorer", "View");
    println!("✅ Saved view exists: {}", store.exists("Explorer", "View"));
}
