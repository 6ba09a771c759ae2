// Configuration (TOML file + env overrides)
pub mod config;

// Devices, scenes, rooms and their labels
pub mod entity;

// Locales and translation catalogs
pub mod i18n;

// GraphQL backend client
pub mod backend;

// Label → entity resolution
pub mod resolver;

// Intent handlers
pub mod intent;

// Dispatcher wrapping handlers with catalog selection and error speech
pub mod skill;

// Authorization header parsing
pub mod auth;

// HTTP API
pub mod api;
