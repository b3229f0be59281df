use rusty_library_loans::{
    adapters::csv::CsvInventory,
    application::{LoanStore, ReturnStore, UserStore, penalty_report, report},
    config::LibraryConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let config = LibraryConfig::load();

    // Initialize tracing
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rusty_library_loans={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration, using defaults: {}", e);
        LibraryConfig::default()
    });
    let data = &config.data;

    // Initialize adapters
    let inventory = Arc::new(CsvInventory::open(&data.inventory_path).unwrap_or_else(|e| {
        tracing::warn!(
            "Starting with an empty inventory at {}: {}",
            data.inventory_path.display(),
            e
        );
        CsvInventory::new(&data.inventory_path)
    }));

    // Load stores
    let mut loans = LoanStore::new(&data.loans_path, inventory);
    let mut returns = ReturnStore::new(&data.returns_path);
    let mut users = UserStore::new(&data.users_path);
    loans.load();
    returns.load();
    users.load();

    // Reconcile returns with the persisted loan log
    if let Err(e) = returns.import_from(loans.path()) {
        tracing::error!("Failed to import returns from loan log: {}", e);
    }

    tracing::info!(
        "{} loans, {} pending returns, {} users",
        loans.list_all().len(),
        returns.pending().len(),
        users.list().len()
    );

    println!("{}", report::general_report(loans.path()));
    println!("{}", penalty_report(&returns.list()));
}
