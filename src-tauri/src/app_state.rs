use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use crate::config_store::{ConfigStore, MarketConfig};
use crate::errors::{MarketError, MarketResult};
use crate::listing::{LoadPhase, PageLoader};
use crate::session::ConnectionManager;
use crate::storage::MarketPaths;

#[derive(Debug)]
pub struct MarketContext {
    paths: MarketPaths,
    config_store: ConfigStore,
    connection: ConnectionManager,
    listing_loader: PageLoader,
    environment: String,
}

impl MarketContext {
    pub fn initialize(root_dir: PathBuf) -> MarketResult<Self> {
        let environment =
            std::env::var("TESSERA_MARKET_ENV").unwrap_or_else(|_| "development".to_string());
        let paths = MarketPaths::new(&root_dir)?;
        paths.ensure_directories()?;

        let config_store = ConfigStore::from_paths(&paths);
        config_store.load_or_default(environment.clone())?;

        Ok(Self {
            paths,
            config_store,
            connection: ConnectionManager::new(),
            listing_loader: PageLoader::new(),
            environment,
        })
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config_store
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn paths(&self) -> &MarketPaths {
        &self.paths
    }

    pub fn load_config(&self) -> MarketResult<MarketConfig> {
        self.config_store.load_or_default(self.environment.clone())
    }

    pub fn update_config<F>(&mut self, updater: F) -> MarketResult<MarketConfig>
    where
        F: FnOnce(&mut MarketConfig) -> MarketResult<()>,
    {
        self.config_store.update(self.environment.clone(), updater)
    }

    pub fn listing_phase(&self) -> LoadPhase {
        self.listing_loader.phase()
    }

    pub fn listing_started(&mut self) {
        self.listing_loader.begin();
    }

    pub fn listing_finished(&mut self) {
        self.listing_loader.finish();
    }

    pub fn listing_failed(&mut self) {
        self.listing_loader.fail();
    }
}

/// Shared market context exposed to Tauri commands.
#[derive(Clone)]
pub struct SharedMarketContext(pub Arc<RwLock<MarketContext>>);

impl SharedMarketContext {
    pub fn new(inner: MarketContext) -> Self {
        Self(Arc::new(RwLock::new(inner)))
    }

    pub fn read<F, T>(&self, op: F) -> MarketResult<T>
    where
        F: FnOnce(&MarketContext) -> MarketResult<T>,
    {
        let guard = self
            .0
            .read()
            .map_err(|_| MarketError::Unknown("Poisoned market context".into()))?;
        op(&guard)
    }

    pub fn write<F, T>(&self, op: F) -> MarketResult<T>
    where
        F: FnOnce(&mut MarketContext) -> MarketResult<T>,
    {
        let mut guard = self
            .0
            .write()
            .map_err(|_| MarketError::Unknown("Poisoned market context".into()))?;
        op(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn initialize_creates_config_on_disk() {
        let temp = TempDir::new().unwrap();
        let context = MarketContext::initialize(temp.path().to_path_buf()).unwrap();
        assert!(context.paths().config_file().exists());
        assert_eq!(context.listing_phase(), LoadPhase::Idle);
    }

    #[test]
    fn listing_phase_transitions() {
        let temp = TempDir::new().unwrap();
        let mut context = MarketContext::initialize(temp.path().to_path_buf()).unwrap();

        context.listing_started();
        assert_eq!(context.listing_phase(), LoadPhase::Loading);
        context.listing_finished();
        assert_eq!(context.listing_phase(), LoadPhase::Loaded);
        context.listing_started();
        context.listing_failed();
        assert_eq!(context.listing_phase(), LoadPhase::Error);
    }

    #[test]
    fn shared_context_round_trip() {
        let temp = TempDir::new().unwrap();
        let context = MarketContext::initialize(temp.path().to_path_buf()).unwrap();
        let shared = SharedMarketContext::new(context);

        let endpoint = shared
            .read(|ctx| Ok(ctx.load_config()?.network.primary_endpoint))
            .unwrap();
        assert!(!endpoint.is_empty());

        shared
            .write(|ctx| {
                ctx.update_config(|config| {
                    config.network.primary_endpoint = "http://localhost:8599".into();
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();

        let endpoint = shared
            .read(|ctx| Ok(ctx.load_config()?.network.primary_endpoint))
            .unwrap();
        assert_eq!(endpoint, "http://localhost:8599");
    }
}
