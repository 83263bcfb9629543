// src/tasks/wizard_sweeper.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::info;

use crate::services::booking_wizard::WizardStore;

/// Periodically evicts booking wizards idle past their timeout. The store
/// also checks lazily on access, so the sweep only reclaims memory for
/// sessions that never come back.
pub fn spawn_wizard_sweeper(store: Arc<WizardStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            sleep(interval).await;
            let evicted = store.sweep();
            if evicted > 0 {
                info!("evicted {} expired booking wizard(s)", evicted);
            }
        }
    })
}
