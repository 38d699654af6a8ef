//! The filtering wrapper plugin.
//!
//! [`FilterCallbackPlugin`] wraps a delegate [`Plugin`] and intercepts its
//! `setup`: the delegate registers hooks as usual, but against a decorated
//! build context that swaps each resolve/load callback for a gating closure.
//! The gate consults the configured predicate per invocation and either
//! forwards to the delegate's callback or answers "not handled" so the host
//! falls through to the next plugin.

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use tracing::{debug, trace, warn};

use crate::api::{
    DisposeCallback, OnLoadArgs, OnLoadCallback, OnLoadOptions, OnLoadReturn, OnResolveArgs,
    OnResolveCallback, OnResolveOptions, OnResolveReturn, OnStartCallback, Plugin, PluginBuild,
    SharedPlugin,
};
use crate::config::{FilterCallbacks, HookFilters};

/// Wraps a delegate plugin so its resolve/load callbacks only fire for
/// candidates the configured predicates accept.
///
/// The wrapper is itself a [`Plugin`]; hosts register it in place of the
/// delegate. Its name is the delegate's name decorated as
/// `filter-callback({delegate})`, so build diagnostics attribute hook
/// activity to the wrapped plugin.
///
/// # Example
///
/// ```rust,ignore
/// let wrapped = FilterCallbackPlugin::new(
///     sass_loader(),
///     FilterCallbacks::uniform(|args: &dyn HookArgs| args.path().ends_with(".scss")),
/// );
/// bundler.register(wrapped);
/// ```
#[derive(Debug)]
pub struct FilterCallbackPlugin {
    delegate: SharedPlugin,
    name: String,
    filters: HookFilters,
}

impl FilterCallbackPlugin {
    /// Wrap `plugin`, gating its hook callbacks with `filters`.
    ///
    /// Accepts either shape of [`FilterCallbacks`] or a bare [`HookFilters`];
    /// the configuration is collapsed to per-hook slots here, once.
    pub fn new<P>(plugin: P, filters: impl Into<FilterCallbacks>) -> Self
    where
        P: Plugin + 'static,
    {
        Self::from_shared(Arc::new(plugin), filters)
    }

    /// Wrap an already-shared plugin handle, as held by a plugin registry.
    pub fn from_shared(plugin: SharedPlugin, filters: impl Into<FilterCallbacks>) -> Self {
        let name = format!("filter-callback({})", plugin.name());
        Self {
            delegate: plugin,
            name,
            filters: filters.into().resolve(),
        }
    }
}

impl Plugin for FilterCallbackPlugin {
    fn name(&self) -> Cow<'static, str> {
        self.name.clone().into()
    }

    fn setup(&self, build: &mut dyn PluginBuild) -> anyhow::Result<()> {
        if self.filters.is_empty() {
            warn!(
                plugin = %self.name,
                "no filter callbacks configured; wrapper only decorates the delegate name"
            );
        }
        debug!(
            plugin = %self.name,
            delegate = %self.delegate.name(),
            filters = ?self.filters,
            "setting up filtered delegate"
        );

        let mut filtered = FilteredBuild {
            inner: build,
            filters: &self.filters,
            plugin_name: &self.name,
        };
        self.delegate.setup(&mut filtered)
    }
}

/// Build context handed to the delegate's `setup` in place of the host's.
///
/// Interposes on resolve/load registration when the matching predicate slot
/// is set; every other capability forwards to the host unchanged.
struct FilteredBuild<'a> {
    inner: &'a mut dyn PluginBuild,
    filters: &'a HookFilters,
    plugin_name: &'a str,
}

impl PluginBuild for FilteredBuild<'_> {
    fn on_resolve(&mut self, options: OnResolveOptions, callback: OnResolveCallback) {
        match self.filters.on_resolve.clone() {
            Some(filter) => {
                let plugin = self.plugin_name.to_owned();
                let gated: OnResolveCallback = Box::new(
                    move |args: OnResolveArgs| -> BoxFuture<'static, OnResolveReturn> {
                        if filter(&args) {
                            trace!(plugin = %plugin, path = %args.path, "resolve candidate accepted");
                            callback(args)
                        } else {
                            trace!(plugin = %plugin, path = %args.path, "resolve candidate suppressed");
                            Box::pin(future::ready(Ok(None)))
                        }
                    },
                );
                self.inner.on_resolve(options, gated);
            }
            // No predicate for this hook kind: hand the delegate's callback
            // to the host untouched.
            None => self.inner.on_resolve(options, callback),
        }
    }

    fn on_load(&mut self, options: OnLoadOptions, callback: OnLoadCallback) {
        match self.filters.on_load.clone() {
            Some(filter) => {
                let plugin = self.plugin_name.to_owned();
                let gated: OnLoadCallback = Box::new(
                    move |args: OnLoadArgs| -> BoxFuture<'static, OnLoadReturn> {
                        if filter(&args) {
                            trace!(plugin = %plugin, path = %args.path, "load candidate accepted");
                            callback(args)
                        } else {
                            trace!(plugin = %plugin, path = %args.path, "load candidate suppressed");
                            Box::pin(future::ready(Ok(None)))
                        }
                    },
                );
                self.inner.on_load(options, gated);
            }
            None => self.inner.on_load(options, callback),
        }
    }

    fn on_start(&mut self, callback: OnStartCallback) {
        self.inner.on_start(callback);
    }

    fn on_dispose(&mut self, callback: DisposeCallback) {
        self.inner.on_dispose(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HookArgs, OnLoadResult, OnResolveResult};

    /// Delegate that registers one hook of every kind.
    #[derive(Debug)]
    struct EchoPlugin;

    impl Plugin for EchoPlugin {
        fn name(&self) -> Cow<'static, str> {
            "echo".into()
        }

        fn setup(&self, build: &mut dyn PluginBuild) -> anyhow::Result<()> {
            build.on_resolve(
                OnResolveOptions::match_all(),
                Box::new(|args| {
                    Box::pin(future::ready(Ok(Some(OnResolveResult {
                        path: args.path,
                        ..Default::default()
                    }))))
                }),
            );
            build.on_load(
                OnLoadOptions::match_all(),
                Box::new(|args| {
                    Box::pin(future::ready(Ok(Some(OnLoadResult {
                        code: format!("// {}", args.path),
                        ..Default::default()
                    }))))
                }),
            );
            build.on_start(Box::new(|| Box::pin(future::ready(Ok(())))));
            build.on_dispose(Box::new(|| {}));
            Ok(())
        }
    }

    /// Host that only counts registrations.
    #[derive(Default)]
    struct CountingBuild {
        resolves: usize,
        loads: usize,
        starts: usize,
        disposes: usize,
    }

    impl PluginBuild for CountingBuild {
        fn on_resolve(&mut self, _options: OnResolveOptions, _callback: OnResolveCallback) {
            self.resolves += 1;
        }

        fn on_load(&mut self, _options: OnLoadOptions, _callback: OnLoadCallback) {
            self.loads += 1;
        }

        fn on_start(&mut self, _callback: OnStartCallback) {
            self.starts += 1;
        }

        fn on_dispose(&mut self, _callback: DisposeCallback) {
            self.disposes += 1;
        }
    }

    #[test]
    fn decorates_the_delegate_name() {
        let wrapped = FilterCallbackPlugin::new(
            EchoPlugin,
            FilterCallbacks::uniform(|args: &dyn HookArgs| args.path().ends_with(".ts")),
        );
        assert_eq!(wrapped.name(), "filter-callback(echo)");
    }

    #[test]
    fn from_shared_accepts_registry_handles() {
        let shared: SharedPlugin = Arc::new(EchoPlugin);
        let wrapped = FilterCallbackPlugin::from_shared(shared, HookFilters::new());
        assert_eq!(wrapped.name(), "filter-callback(echo)");
    }

    #[test]
    fn registers_exactly_one_host_hook_per_delegate_registration() {
        let wrapped = FilterCallbackPlugin::new(
            EchoPlugin,
            FilterCallbacks::uniform(|_: &dyn HookArgs| true),
        );
        let mut build = CountingBuild::default();
        wrapped.setup(&mut build).unwrap();

        assert_eq!(build.resolves, 1);
        assert_eq!(build.loads, 1);
        assert_eq!(build.starts, 1);
        assert_eq!(build.disposes, 1);
    }

    #[test]
    fn empty_filter_still_registers_every_hook() {
        let wrapped = FilterCallbackPlugin::new(EchoPlugin, HookFilters::new());
        let mut build = CountingBuild::default();
        wrapped.setup(&mut build).unwrap();

        assert_eq!(build.resolves, 1);
        assert_eq!(build.loads, 1);
        assert_eq!(build.starts, 1);
        assert_eq!(build.disposes, 1);
    }

    #[test]
    fn debug_output_names_the_wrapper() {
        let wrapped = FilterCallbackPlugin::new(EchoPlugin, HookFilters::new());
        let rendered = format!("{:?}", wrapped);
        assert!(rendered.contains("FilterCallbackPlugin"));
        assert!(rendered.contains("EchoPlugin"));
    }
}
