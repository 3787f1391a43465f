//! Shared service state
//!
//! Built once at startup and shared by the HTTP router and the MCP server.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::estimator::{self, CalorieEstimator};
use crate::nutrition::{
    Catalog, KnowledgebaseLookup, LiveLookup, LookupStrategy, NutritionResolver, StubLookup,
};
use crate::tools::status::{ServiceStatus, StatusTracker};

pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub database: Database,
    pub resolver: NutritionResolver,
    /// Present when live lookups are enabled; also serves the scrape endpoint
    pub live: Option<Arc<LiveLookup>>,
    pub estimator: Arc<dyn CalorieEstimator>,
    pub status: StatusTracker,
}

impl AppState {
    /// Load the catalog, open the database and wire up the lookup chain
    pub fn initialize(config: Config) -> AppResult<Arc<Self>> {
        let catalog = Catalog::load(config.catalog_path.as_deref())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let database = Database::open(&config.database_path)?;

        let live = if config.live_lookup {
            match LiveLookup::new(
                catalog.live_sites.clone(),
                config.fetch_timeout,
                config.fetch_concurrency,
            ) {
                Ok(live) => Some(Arc::new(live)),
                Err(e) => {
                    warn!("Live lookup disabled: {}", e);
                    None
                }
            }
        } else {
            info!("Live lookup disabled by configuration");
            None
        };

        let estimator = estimator::from_config(&config);
        Ok(Arc::new(Self::from_parts(config, catalog, database, live, estimator)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: Config,
        catalog: Catalog,
        database: Database,
        live: Option<Arc<LiveLookup>>,
        estimator: Arc<dyn CalorieEstimator>,
    ) -> Self {
        let catalog = Arc::new(catalog);

        let mut strategies: Vec<Arc<dyn LookupStrategy>> = Vec::new();
        if let Some(live) = &live {
            strategies.push(live.clone());
        }
        strategies.push(Arc::new(KnowledgebaseLookup::new(catalog.clone())));
        strategies.push(Arc::new(StubLookup::new(catalog.loaded_at.clone())));
        let resolver = NutritionResolver::new(strategies);
        info!("Lookup tiers: {:?}", resolver.strategy_names());

        let status = StatusTracker::new(config.database_path.clone());

        Self {
            config,
            catalog,
            database,
            resolver,
            live,
            estimator,
            status,
        }
    }

    pub fn service_status(&self) -> ServiceStatus {
        self.status
            .get_status(self.resolver.strategy_names(), &self.catalog.loaded_at)
    }
}
