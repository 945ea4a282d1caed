use crate::directory::{DirectoryOptions, MatchDirectory};
use crate::errors;
use crate::events::RoomBroadcaster;
use crate::handlers;
use crate::middleware::request_log;
use crate::settings::{ServerSettings, SettingsError};
use crate::store::{InMemoryRecordStore, RecordStore};
use noughts_ai::{create_advisor, AdvisorError};
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    lobby_limit: usize,
    seed: Option<u64>,
    advisor: String,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let defaults = ServerSettings::default();
        Self {
            host: host.into(),
            port,
            lobby_limit: defaults.lobby_limit,
            seed: None,
            advisor: defaults.advisor,
        }
    }

    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            lobby_limit: settings.lobby_limit,
            seed: settings.seed,
            advisor: settings.advisor.clone(),
        }
    }

    /// Ephemeral local port with a fixed seed.
    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0).with_seed(7)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_advisor(mut self, advisor: impl Into<String>) -> Self {
        self.advisor = advisor.into();
        self
    }

    pub fn with_lobby_limit(mut self, limit: usize) -> Self {
        self.lobby_limit = limit;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn advisor(&self) -> &str {
        &self.advisor
    }

    pub fn lobby_limit(&self) -> usize {
        self.lobby_limit
    }
}

/// Components shared by every route. Built once per server; nothing is global.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    rooms: Arc<RoomBroadcaster>,
    directory: Arc<MatchDirectory>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        Self::with_store(config, store)
    }

    pub fn with_store(
        config: ServerConfig,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, ServerError> {
        let advisor = create_advisor(config.advisor())?;
        let rooms = Arc::new(RoomBroadcaster::new());
        let options = DirectoryOptions {
            seed: config.seed(),
            advisor: Arc::from(advisor),
            lobby_limit: config.lobby_limit(),
        };
        let directory = Arc::new(MatchDirectory::new(store, Arc::clone(&rooms), options));

        Ok(Self::new_with_dependencies(config, rooms, directory))
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        rooms: Arc<RoomBroadcaster>,
        directory: Arc<MatchDirectory>,
    ) -> Self {
        Self {
            config,
            rooms,
            directory,
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn rooms(&self) -> Arc<RoomBroadcaster> {
        Arc::clone(&self.rooms)
    }

    pub fn directory(&self) -> Arc<MatchDirectory> {
        Arc::clone(&self.directory)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every route of the server, with the access log and error rendering applied.
    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route(context);
        let api_routes = Self::api_routes(context);
        let sse_routes = Self::sse_routes(context);

        health
            .or(sse_routes)
            .unify()
            .or(api_routes)
            .unify()
            .recover(errors::handle_rejection)
            .unify()
            .with(request_log())
            .map(Reply::into_response)
            .boxed()
    }

    fn health_route(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .and(Self::with_directory(context.directory()))
            .and(Self::with_rooms(context.rooms()))
            .map(|directory: Arc<MatchDirectory>, rooms: Arc<RoomBroadcaster>| {
                handlers::health(&directory, &rooms).into_response()
            })
            .boxed()
    }

    fn api_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let directory = context.directory();

        let list = warp::path!("api" / "matches")
            .and(warp::get())
            .and(warp::query::<handlers::ListMatchesQuery>())
            .and(Self::with_directory(directory.clone()))
            .and_then(
                |query: handlers::ListMatchesQuery, directory: Arc<MatchDirectory>| async move {
                    let response = handlers::list_matches(directory, query).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let create = warp::path!("api" / "matches")
            .and(warp::post())
            .and(Self::with_directory(directory.clone()))
            .and(warp::body::json())
            .and_then(
                |directory: Arc<MatchDirectory>, request: handlers::CreateMatchRequest| async move {
                    let response = handlers::create_match(directory, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let info = warp::path!("api" / "matches" / String)
            .and(warp::get())
            .and(Self::with_directory(directory.clone()))
            .and_then(|id: String, directory: Arc<MatchDirectory>| async move {
                let response = handlers::get_match(directory, id).await;
                Ok::<_, Infallible>(response)
            });

        let moves = warp::path!("api" / "matches" / String / "moves")
            .and(warp::post())
            .and(Self::with_directory(directory.clone()))
            .and(warp::body::json())
            .and_then(
                |id: String, directory: Arc<MatchDirectory>, request: handlers::MoveRequest| async move {
                    let response = handlers::submit_move(directory, id, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let suggestion = warp::path!("api" / "matches" / String / "suggestion")
            .and(warp::get())
            .and(Self::with_directory(directory))
            .and_then(|id: String, directory: Arc<MatchDirectory>| async move {
                let response = handlers::suggest_move(directory, id).await;
                Ok::<_, Infallible>(response)
            });

        list.or(create)
            .unify()
            .or(moves)
            .unify()
            .or(suggestion)
            .unify()
            .or(info)
            .unify()
            .boxed()
    }

    fn sse_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let directory = context.directory();
        let rooms = context.rooms();

        warp::path!("api" / "matches" / String / "events")
            .and(warp::get())
            .and(Self::with_directory(directory))
            .and(Self::with_rooms(rooms))
            .and_then(
                |id: String, directory: Arc<MatchDirectory>, rooms: Arc<RoomBroadcaster>| async move {
                    let response = handlers::stream_events(id, directory, rooms).await;
                    Ok::<_, Infallible>(response)
                },
            )
            .boxed()
    }

    fn with_directory(
        directory: Arc<MatchDirectory>,
    ) -> impl Filter<Extract = (Arc<MatchDirectory>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&directory))
    }

    fn with_rooms(
        rooms: Arc<RoomBroadcaster>,
    ) -> impl Filter<Extract = (Arc<RoomBroadcaster>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&rooms))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
