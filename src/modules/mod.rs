pub mod books;

use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Register every application module with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    registry.register(books::create_module(&settings.books));
}
