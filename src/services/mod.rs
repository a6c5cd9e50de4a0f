// Clow Browser services
// Stateless or lightly stateful helpers: settings persistence, theming,
// address-bar resolution, engine profile and environment, error page, load probe.

pub mod engine_env;
pub mod engine_profile;
pub mod error_page;
#[cfg(feature = "network")]
pub mod load_probe;
pub mod settings_engine;
pub mod theme_engine;
pub mod url_resolver;
