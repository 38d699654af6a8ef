//! Filter callback configuration.
//!
//! Callers supply either one general predicate for both hook kinds, or a
//! record of two optional per-hook predicates. Both shapes collapse into
//! [`HookFilters`] when the wrapper is constructed, so hook invocations only
//! ever see two plain optional predicate slots.

use std::fmt;
use std::sync::Arc;

use crate::api::{HookArgs, OnLoadArgs, OnResolveArgs};

/// Predicate applied to both hook kinds through the [`HookArgs`] view.
pub type GeneralFilter = Arc<dyn Fn(&dyn HookArgs) -> bool + Send + Sync>;

/// Predicate gating resolve callbacks only.
pub type ResolveFilter = Arc<dyn Fn(&OnResolveArgs) -> bool + Send + Sync>;

/// Predicate gating load callbacks only.
pub type LoadFilter = Arc<dyn Fn(&OnLoadArgs) -> bool + Send + Sync>;

/// Two optional, independently-settable predicate slots.
///
/// An absent slot means "do not filter that hook kind at all": the wrapper
/// forwards such registrations to the host untouched.
///
/// # Example
///
/// ```rust
/// use filter_callback::{HookFilters, OnLoadArgs};
///
/// let filters = HookFilters::new()
///     .with_on_load(|args: &OnLoadArgs| args.namespace == "virtual");
/// assert!(!filters.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct HookFilters {
    /// Predicate for the resolve hook, absent to leave it unfiltered.
    pub on_resolve: Option<ResolveFilter>,
    /// Predicate for the load hook, absent to leave it unfiltered.
    pub on_load: Option<LoadFilter>,
}

impl HookFilters {
    /// Configuration with both slots absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resolve predicate.
    pub fn with_on_resolve<F>(mut self, filter: F) -> Self
    where
        F: Fn(&OnResolveArgs) -> bool + Send + Sync + 'static,
    {
        self.on_resolve = Some(Arc::new(filter));
        self
    }

    /// Set the load predicate.
    pub fn with_on_load<F>(mut self, filter: F) -> Self
    where
        F: Fn(&OnLoadArgs) -> bool + Send + Sync + 'static,
    {
        self.on_load = Some(Arc::new(filter));
        self
    }

    /// True when neither hook kind has a predicate.
    pub fn is_empty(&self) -> bool {
        self.on_resolve.is_none() && self.on_load.is_none()
    }
}

impl fmt::Debug for HookFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookFilters")
            .field("on_resolve", &self.on_resolve.is_some())
            .field("on_load", &self.on_load.is_some())
            .finish()
    }
}

/// The two configuration shapes a caller can supply.
///
/// # Example
///
/// ```rust
/// use filter_callback::{FilterCallbacks, HookArgs};
///
/// // One predicate for both hook kinds.
/// let uniform = FilterCallbacks::uniform(|args: &dyn HookArgs| args.path().ends_with(".ts"));
/// # let _ = uniform;
/// ```
#[derive(Clone)]
pub enum FilterCallbacks {
    /// One predicate applied to resolve and load candidates alike.
    Uniform(GeneralFilter),
    /// Independent optional predicates per hook kind.
    PerHook(HookFilters),
}

impl FilterCallbacks {
    /// One predicate for both hook kinds.
    pub fn uniform<F>(filter: F) -> Self
    where
        F: Fn(&dyn HookArgs) -> bool + Send + Sync + 'static,
    {
        Self::Uniform(Arc::new(filter))
    }

    /// Collapse the configuration into per-hook predicate slots.
    ///
    /// This is the only place the shape is inspected; a uniform predicate is
    /// cloned into both slots, each adapting its concrete argument type to
    /// the [`HookArgs`] view.
    pub(crate) fn resolve(self) -> HookFilters {
        match self {
            FilterCallbacks::Uniform(filter) => {
                let for_resolve = Arc::clone(&filter);
                HookFilters {
                    on_resolve: Some(Arc::new(move |args: &OnResolveArgs| for_resolve(args))),
                    on_load: Some(Arc::new(move |args: &OnLoadArgs| filter(args))),
                }
            }
            FilterCallbacks::PerHook(filters) => filters,
        }
    }
}

impl From<HookFilters> for FilterCallbacks {
    fn from(filters: HookFilters) -> Self {
        Self::PerHook(filters)
    }
}

impl fmt::Debug for FilterCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCallbacks::Uniform(_) => f.write_str("FilterCallbacks::Uniform"),
            FilterCallbacks::PerHook(filters) => {
                f.debug_tuple("FilterCallbacks::PerHook").field(filters).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts_only(args: &dyn HookArgs) -> bool {
        args.path().ends_with(".ts")
    }

    #[test]
    fn uniform_fills_both_slots() {
        let filters = FilterCallbacks::uniform(ts_only).resolve();
        assert!(filters.on_resolve.is_some());
        assert!(filters.on_load.is_some());
    }

    #[test]
    fn uniform_applies_to_both_arg_kinds() {
        let filters = FilterCallbacks::uniform(ts_only).resolve();
        let resolve = filters.on_resolve.unwrap();
        let load = filters.on_load.unwrap();

        assert!(resolve(&OnResolveArgs::new("a.ts")));
        assert!(!resolve(&OnResolveArgs::new("a.js")));
        assert!(load(&OnLoadArgs::new("b.ts")));
        assert!(!load(&OnLoadArgs::new("b.css")));
    }

    #[test]
    fn per_hook_slots_stay_independent() {
        let filters = FilterCallbacks::from(
            HookFilters::new().with_on_load(|args: &OnLoadArgs| args.namespace == "virtual"),
        )
        .resolve();

        assert!(filters.on_resolve.is_none());
        let load = filters.on_load.unwrap();
        assert!(load(&OnLoadArgs::new("x").with_namespace("virtual")));
        assert!(!load(&OnLoadArgs::new("x")));
    }

    #[test]
    fn empty_configuration_is_detected() {
        assert!(HookFilters::new().is_empty());
        assert!(!HookFilters::new()
            .with_on_resolve(|_: &OnResolveArgs| true)
            .is_empty());
    }

    #[test]
    fn debug_reports_configured_slots() {
        let filters = HookFilters::new().with_on_resolve(|_: &OnResolveArgs| true);
        let rendered = format!("{:?}", filters);
        assert!(rendered.contains("on_resolve: true"));
        assert!(rendered.contains("on_load: false"));
    }
}
