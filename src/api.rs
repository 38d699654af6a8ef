//! The host bundler's plugin contract.
//!
//! This module models the interface an esbuild-style host exposes to its
//! plugins: a plugin is a named value with a `setup` procedure, and `setup`
//! receives a build context it registers hook callbacks against. The crate
//! does not implement resolution or loading itself; hosts (and the test
//! suite's mock host) implement [`PluginBuild`], plugins implement
//! [`Plugin`], and the filtering wrapper sits between the two.
//!
//! Registration is synchronous; the registered callbacks are asynchronous
//! and return boxed futures, so a callback may complete immediately or
//! suspend without the registration API caring which.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use regex::Regex;

use crate::{Error, Result};

/// Namespace the host places ordinary filesystem modules in.
pub const FILE_NAMESPACE: &str = "file";

const MATCH_ALL_PATTERN: &str = ".*";

/// What kind of import triggered a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportKind {
    /// Build entry point, no importer.
    EntryPoint,
    /// Static `import` statement.
    #[default]
    ImportStatement,
    /// CommonJS `require()` call.
    RequireCall,
    /// `import()` expression.
    DynamicImport,
}

/// How the host should interpret loaded module source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleType {
    #[default]
    Js,
    Jsx,
    Ts,
    Tsx,
    Css,
    Json,
    Text,
}

impl ModuleType {
    /// Infer a module type from a path's extension, defaulting to JavaScript.
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("jsx") => ModuleType::Jsx,
            Some("ts") | Some("mts") | Some("cts") => ModuleType::Ts,
            Some("tsx") => ModuleType::Tsx,
            Some("css") => ModuleType::Css,
            Some("json") => ModuleType::Json,
            Some("txt") => ModuleType::Text,
            _ => ModuleType::Js,
        }
    }
}

/// Arguments for one resolution attempt, supplied by the host per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnResolveArgs {
    /// Module specifier as written in the importing module.
    pub path: String,
    /// Module doing the importing, absent for entry points.
    pub importer: Option<String>,
    /// Namespace the importing module lives in.
    pub namespace: String,
    /// What kind of import is being resolved.
    pub kind: ImportKind,
    /// Directory to resolve relative specifiers against.
    pub resolve_dir: Option<String>,
}

impl OnResolveArgs {
    /// Resolution attempt for `path` in the default file namespace.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            importer: None,
            namespace: FILE_NAMESPACE.to_string(),
            kind: ImportKind::default(),
            resolve_dir: None,
        }
    }

    pub fn with_importer(mut self, importer: impl Into<String>) -> Self {
        self.importer = Some(importer.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_kind(mut self, kind: ImportKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Arguments for one load attempt, supplied by the host per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnLoadArgs {
    /// Path of the module being loaded, as produced by resolution.
    pub path: String,
    /// Namespace the module was resolved into.
    pub namespace: String,
    /// Query-string suffix carried through resolution, if any.
    pub suffix: Option<String>,
}

impl OnLoadArgs {
    /// Load attempt for `path` in the default file namespace.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: FILE_NAMESPACE.to_string(),
            suffix: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// Read-only view common to resolve and load candidates.
///
/// Uniform filter callbacks are written against this view, which is how one
/// predicate can gate both hook kinds without caring which it is looking at.
pub trait HookArgs {
    /// Candidate path: the specifier for resolution, the module path for load.
    fn path(&self) -> &str;
    /// Namespace of the candidate.
    fn namespace(&self) -> &str;
}

impl HookArgs for OnResolveArgs {
    fn path(&self) -> &str {
        &self.path
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl HookArgs for OnLoadArgs {
    fn path(&self) -> &str {
        &self.path
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

fn compile_filter(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidFilter {
        pattern: pattern.to_string(),
        source,
    })
}

/// Options a plugin passes when registering a resolve callback.
///
/// The host applies `filter` (and `namespace`, when set) before invoking the
/// callback; plugins use it to scope their hook to the paths they care about.
#[derive(Debug, Clone)]
pub struct OnResolveOptions {
    /// Pattern candidate paths must match for the callback to run.
    pub filter: Regex,
    /// Restrict the registration to candidates in one namespace.
    pub namespace: Option<String>,
}

impl OnResolveOptions {
    /// Registration scoped to paths matching `filter`.
    pub fn new(filter: &str) -> Result<Self> {
        Ok(Self {
            filter: compile_filter(filter)?,
            namespace: None,
        })
    }

    /// Registration that matches every candidate path.
    pub fn match_all() -> Self {
        // ".*" always compiles.
        Self {
            filter: Regex::new(MATCH_ALL_PATTERN).unwrap(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl Default for OnResolveOptions {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Options a plugin passes when registering a load callback.
#[derive(Debug, Clone)]
pub struct OnLoadOptions {
    /// Pattern module paths must match for the callback to run.
    pub filter: Regex,
    /// Restrict the registration to modules in one namespace.
    pub namespace: Option<String>,
}

impl OnLoadOptions {
    /// Registration scoped to paths matching `filter`.
    pub fn new(filter: &str) -> Result<Self> {
        Ok(Self {
            filter: compile_filter(filter)?,
            namespace: None,
        })
    }

    /// Registration that matches every module path.
    pub fn match_all() -> Self {
        // ".*" always compiles.
        Self {
            filter: Regex::new(MATCH_ALL_PATTERN).unwrap(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl Default for OnLoadOptions {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnResolveResult {
    /// Resolved module path.
    pub path: String,
    /// Namespace to place the resolved module in; host default when absent.
    pub namespace: Option<String>,
    /// Mark the module external, leaving it out of the bundle.
    pub external: bool,
    /// Side-effect annotation override for tree shaking.
    pub side_effects: Option<bool>,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnLoadResult {
    /// Module source for the host to parse.
    pub code: String,
    /// How to interpret `code`; inferred from the path when absent.
    pub module_type: Option<ModuleType>,
}

/// Return of a resolve callback. `Ok(None)` means "not handled": the host
/// falls through to the next plugin or its default resolution.
pub type OnResolveReturn = anyhow::Result<Option<OnResolveResult>>;

/// Return of a load callback. `Ok(None)` means "not handled".
pub type OnLoadReturn = anyhow::Result<Option<OnLoadResult>>;

/// Async resolve callback registered through [`PluginBuild::on_resolve`].
pub type OnResolveCallback =
    Box<dyn Fn(OnResolveArgs) -> BoxFuture<'static, OnResolveReturn> + Send + Sync>;

/// Async load callback registered through [`PluginBuild::on_load`].
pub type OnLoadCallback =
    Box<dyn Fn(OnLoadArgs) -> BoxFuture<'static, OnLoadReturn> + Send + Sync>;

/// Async callback invoked when a build starts.
pub type OnStartCallback =
    Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Callback invoked when the host discards the plugin instance.
pub type DisposeCallback = Box<dyn Fn() + Send + Sync>;

/// Build context the host hands to [`Plugin::setup`].
///
/// Hosts implement all of it; decorators that want to interpose on one
/// capability must still forward the rest, which the trait bounds enforce at
/// compile time.
pub trait PluginBuild {
    /// Register a callback for module resolution attempts.
    fn on_resolve(&mut self, options: OnResolveOptions, callback: OnResolveCallback);

    /// Register a callback for module load attempts.
    fn on_load(&mut self, options: OnLoadOptions, callback: OnLoadCallback);

    /// Register a callback that runs when a build starts.
    fn on_start(&mut self, callback: OnStartCallback);

    /// Register a callback that runs when the plugin instance is discarded.
    fn on_dispose(&mut self, callback: DisposeCallback);
}

/// A host plugin: a name plus a setup procedure that registers hooks.
pub trait Plugin: fmt::Debug + Send + Sync {
    /// Plugin name used in diagnostics and log output.
    fn name(&self) -> Cow<'static, str>;

    /// Register hooks against the build context. Called once per build.
    fn setup(&self, build: &mut dyn PluginBuild) -> anyhow::Result<()>;
}

/// Shared plugin handle, the form plugin registries hold.
pub type SharedPlugin = Arc<dyn Plugin>;
