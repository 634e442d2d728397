//! Bookshelf catalog service
//!
//! In-memory book records served over HTTP, assembled from modules on top of
//! the kernel and HTTP facade crates.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every application module
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Initialize modules, serve HTTP until shutdown, then stop modules
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry
        .stop_all()
        .await
        .context("failed to stop modules cleanly")?;
    served
}
