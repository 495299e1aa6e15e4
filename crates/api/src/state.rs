use std::sync::Arc;

use booksummary_core::interaction::InteractionRecorder;
use booksummary_db::repositories::PgInteractionStore;

use crate::config::ServerConfig;
use crate::generation::NovelGenerator;
use crate::storage::ObjectStorage;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: booksummary_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Browser realtime connections.
    pub ws_manager: Arc<WsManager>,
    /// Row-change events for the realtime fan-out.
    pub event_bus: Arc<booksummary_events::EventBus>,
    /// View/like rows and their counters.
    pub recorder: Arc<InteractionRecorder<PgInteractionStore>>,
    /// Cover image storage.
    pub storage: Arc<dyn ObjectStorage>,
    pub generator: Arc<NovelGenerator>,
}

impl AppState {
    /// Wire up state for a pool and configuration.
    pub fn new(
        pool: booksummary_db::DbPool,
        config: ServerConfig,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let recorder = InteractionRecorder::new(PgInteractionStore::new(pool.clone()));
        let generator = NovelGenerator::new(config.generation.clone());
        Self {
            pool,
            config: Arc::new(config),
            ws_manager: Arc::new(WsManager::new()),
            event_bus: Arc::new(booksummary_events::EventBus::default()),
            recorder: Arc::new(recorder),
            storage,
            generator: Arc::new(generator),
        }
    }
}
