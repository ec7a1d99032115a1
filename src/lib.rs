use std::sync::Arc;

pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod spotify;
pub mod state;

pub use config::{Config, Settings};
pub use error::{Error, FetchError};
pub use poller::{NowPlayingSource, Poller, Published};
pub use spotify::{Credentials, NowPlaying, Spotify};
pub use state::{PlayerState, Status};

pub type Shared<T> = Arc<T>;
