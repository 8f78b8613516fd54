use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, StoreBackend},
    store::{MemoryWaitlistStore, PgWaitlistStore, WaitlistStore},
    web::WaitlistHandler,
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Creates the store once, hands it to the `WaitlistHandler` and binds the listener.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let store = init_store(&config).await?;
        let app_state = AppState::new(WaitlistHandler::new(store));

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        Ok(App::new(app_state, listener))
    }
}

async fn init_store(config: &AppConfig) -> Result<Arc<dyn WaitlistStore>> {
    let store_config = &config.store_config;
    info!(
        "{:<20} - {} backend, table '{}'",
        "init_store",
        store_config.backend.as_ref(),
        store_config.table_name
    );

    let store: Arc<dyn WaitlistStore> = match store_config.backend {
        StoreBackend::Postgres => {
            let store =
                PgWaitlistStore::init(&config.db_config, store_config.table_name.clone()).await?;
            if store_config.create_table {
                store.ensure_table().await?;
            }
            Arc::new(store)
        }
        StoreBackend::Memory => Arc::new(MemoryWaitlistStore::new()),
    };

    Ok(store)
}

pub struct InternalState {
    pub waitlist: WaitlistHandler,
}

/// Application state shared by every request.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(waitlist: WaitlistHandler) -> Self {
        AppState(Arc::new(InternalState { waitlist }))
    }
}
