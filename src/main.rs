mod advisor;
mod app;
mod catalog;
mod chat;
mod event;
mod locale;
mod session;
mod shelf;
mod theme;
mod typewriter;

use advisor::{AdvisorClient, AdvisorConfig};
use app::ShelfieApp;
use catalog::{Catalog, CatalogError};
use eframe::egui;
use session::store::StateStore;
use std::path::PathBuf;
use std::sync::mpsc;

fn load_catalog() -> Result<Catalog, CatalogError> {
    match std::env::var_os("SHELFIE_CATALOG") {
        Some(path) => Catalog::load_from_path(&PathBuf::from(path)),
        None => Catalog::load_embedded(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let rtl = locale::detect_rtl();
    let catalog = load_catalog()?;
    log::info!("catalog loaded with {} products", catalog.products().len());

    let store = StateStore::open_default();
    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("shelfie-runtime")
        .build()?;

    let advisor =
        runtime.block_on(async { AdvisorClient::new(AdvisorConfig::from_env(), tx.clone()) })?;

    let app = ShelfieApp::new(rx, advisor, catalog, store, rtl);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Shelfie",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
