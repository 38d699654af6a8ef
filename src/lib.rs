//! Filter a bundler plugin's hook callbacks with per-invocation predicates.
//!
//! esbuild-style hosts scope hook *registration* with a regex filter, but
//! once a callback is registered there is no per-invocation escape hatch.
//! [`FilterCallbackPlugin`] adds one without touching the delegate plugin:
//! it intercepts the delegate's `setup`, swaps each registered resolve/load
//! callback for a gating closure, and answers "not handled" for candidates
//! the configured predicates reject, so the host falls through exactly as if
//! the delegate had declined.
//!
//! ```rust
//! use std::borrow::Cow;
//!
//! use filter_callback::{
//!     FilterCallbackPlugin, FilterCallbacks, HookArgs, Plugin, PluginBuild,
//! };
//!
//! #[derive(Debug)]
//! struct StubLoader;
//!
//! impl Plugin for StubLoader {
//!     fn name(&self) -> Cow<'static, str> {
//!         "stub-loader".into()
//!     }
//!
//!     fn setup(&self, _build: &mut dyn PluginBuild) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let wrapped = FilterCallbackPlugin::new(
//!     StubLoader,
//!     FilterCallbacks::uniform(|args: &dyn HookArgs| args.path().ends_with(".txt")),
//! );
//! assert_eq!(wrapped.name(), "filter-callback(stub-loader)");
//! ```

pub mod api;
pub mod config;
pub mod filter_plugin;

pub use crate::api::{
    DisposeCallback, HookArgs, ImportKind, ModuleType, OnLoadArgs, OnLoadCallback, OnLoadOptions,
    OnLoadResult, OnLoadReturn, OnResolveArgs, OnResolveCallback, OnResolveOptions,
    OnResolveResult, OnResolveReturn, OnStartCallback, Plugin, PluginBuild, SharedPlugin,
    FILE_NAMESPACE,
};
pub use crate::config::{FilterCallbacks, GeneralFilter, HookFilters, LoadFilter, ResolveFilter};
pub use crate::filter_plugin::FilterCallbackPlugin;

/// Errors produced while building hook registrations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A registration filter pattern failed to compile.
    #[error("invalid registration filter pattern `{pattern}`: {source}")]
    InvalidFilter {
        pattern: String,
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
