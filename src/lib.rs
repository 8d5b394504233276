//! pathmark - clickable `namespace::dotted.path` references for editors
//!
//! Scans buffers for references such as `route::users.show`, underlines them
//! grouped by lexical scope, keeps the decorations in sync as buffers change,
//! and opens the file a reference names.
//!
//! The editor itself is reached only through the ports in [`host`].

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod coordinator;
pub mod headless;
pub mod highlighter;
pub mod host;
pub mod open_path;
pub mod resources;
pub mod scanner;
pub mod state;
pub mod tracing;

// Re-export commonly used types
pub use config::HighlightSettings;
pub use coordinator::{BufferEvent, CycleOutcome, HighlightCoordinator};
pub use headless::HeadlessHost;
pub use host::{BufferId, EditorHost};
pub use open_path::OpenOutcome;
pub use scanner::{scan, PathMatch};
