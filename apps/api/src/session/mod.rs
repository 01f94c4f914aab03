// Interview Session Controller and the contracts it runs against.
// The controller is embedded by a client process; it reaches this API
// through `ApiClient`.

pub mod api_client;
pub mod collaborators;
pub mod controller;
pub mod error;
pub mod orchestrator;
pub mod script;
pub mod status;
pub mod transcript;
pub mod view;
pub mod voice;

pub use controller::{
    SessionConfig, SessionController, SessionDeps, SessionMode, UserAction, NAVIGATION_DELAY,
};
