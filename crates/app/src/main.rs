//! `rusyle`: inspect the persisted session and dry-run navigation.
//!
//! Usage: `rusyle [PATH]...`. Restores the session from local storage,
//! refreshes the profile and event list when signed in, then reports where
//! each PATH would land.

use std::sync::Arc;

use anyhow::Context;
use rusyle_auth::SessionStore;
use rusyle_catalog::{CatalogStore, EventQuery};
use rusyle_client::{ApiClient, ClientConfig, FileStorage};
use rusyle_router::{NavigationOutcome, Navigator, RouteTable};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rusyle_observability::init();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "using API");

    let api = ApiClient::new(&config).context("failed to create API client")?;
    let storage = FileStorage::open_default().context("failed to open local storage")?;
    tracing::info!(dir = ?storage.dir(), "using local storage");

    let (session, report) = SessionStore::restore(api.clone(), Arc::new(storage));
    tracing::info!(?report, "restored session");

    if session.is_authenticated() {
        if let Err(err) = session.refresh_user().await {
            tracing::warn!(error = %err, "could not refresh profile");
        }

        let catalog = CatalogStore::new(api);
        match catalog.fetch_events(&EventQuery::new()).await {
            Ok(events) => tracing::info!(
                total = events.len(),
                active = catalog.active_events().len(),
                mine = catalog.my_events().len(),
                "events loaded"
            ),
            Err(err) => tracing::warn!(error = %err, "could not load events"),
        }
    }

    let snapshot = session.snapshot();
    println!(
        "authenticated: {}  admin: {}  user: {}",
        snapshot.is_authenticated(),
        snapshot.is_admin(),
        snapshot
            .user
            .as_ref()
            .map(|u| u.email.as_str())
            .unwrap_or("-")
    );

    let mut navigator = Navigator::new(RouteTable::standard(), session);
    for path in std::env::args().skip(1) {
        let line = match navigator.navigate(&path) {
            NavigationOutcome::Allowed(m) => format!("{path} -> {} (allowed)", m.name()),
            NavigationOutcome::Redirected { to, .. } => {
                format!("{path} -> {} (redirected to {})", to.name(), to.path)
            }
            NavigationOutcome::NotFound(p) => format!("{path} -> not found ({p})"),
            NavigationOutcome::TooManyRedirects(_) => format!("{path} -> redirect loop"),
        };
        println!("{line}");
    }

    Ok(())
}
