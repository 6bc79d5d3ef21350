pub mod actor;
pub mod codec;
pub mod config;
pub mod error;
pub mod game_service;
pub mod registry;
pub mod session;
pub mod store;
pub mod testing;
pub mod token;
pub mod types;
pub mod wire;

pub use actor::{
    ActorFactory,
    CanisterActor,
    Connector,
};
pub use config::{
    AppConfig,
    IdentityConfig,
    NetworkTarget,
};
pub use error::{
    GameError,
    GameResult,
};
pub use game_service::{
    CreateGameParams,
    CreateTablaParams,
    GameService,
};
pub use session::Session;
pub use store::GameStore;
pub use token::{
    ApproveRequest,
    TokenService,
    TokenStore,
};
