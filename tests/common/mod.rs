//! Shared test utilities for ledger integration tests

use std::sync::Once;

use tempfile::TempDir;

use game_pulse::{GameLedger, PrincipalId};

static TRACING: Once = Once::new();

/// Route ledger tracing through the test harness when RUST_LOG is set
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The owner principal every test ledger is deployed with
pub fn deployer() -> PrincipalId {
    PrincipalId::from("deployer")
}

/// Creates a ledger backed by a temporary database.
///
/// The returned TempDir must be kept alive for the ledger's lifetime.
pub fn create_test_ledger() -> (TempDir, GameLedger) {
    init_tracing();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let ledger = GameLedger::with_path(deployer(), &temp_dir.path().join("ledger.db"))
        .expect("Failed to open test ledger");
    (temp_dir, ledger)
}

/// Creates a test ledger with one game already registered for `wallet_1`.
pub fn create_registered_ledger() -> (TempDir, GameLedger, PrincipalId) {
    let (temp_dir, ledger) = create_test_ledger();
    let dev = PrincipalId::from("wallet_1");
    ledger
        .registry()
        .register_game(&deployer(), &dev)
        .expect("Failed to register test game");
    (temp_dir, ledger, dev)
}
