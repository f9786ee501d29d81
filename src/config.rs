//! Run configuration.
//!
//! Every setting resolves in the same order: command-line flag, then environment
//! variable, then built-in default. The resolved [`StubgenConfig`] is passed explicitly
//! to each stage; nothing reads global state after startup.
//!
//! | Setting | Flag | Environment | Default |
//! |---|---|---|---|
//! | common namespace | `--ns-common` | `STUBGEN_NS_COMMON` | `common` |
//! | variant A namespace | `--ns-a` | `STUBGEN_NS_A` | `game_a` |
//! | variant B namespace | `--ns-b` | `STUBGEN_NS_B` | `game_b` |
//! | tuple expansion limit | `--tuple-limit` | `STUBGEN_TUPLE_LIMIT` | `120` |
//! | object root token | `--root-token` | `STUBGEN_ROOT_TOKEN` | `UClass` |
//! | commonization policy | `--policy` | `STUBGEN_POLICY` | `veto` |
//! | parallel stages | `--sequential` | `STUBGEN_PARALLEL` | on |

use clap::Args;
use serde::Serialize;

use stubgen_reconciler::{CommonizationPolicy, ReconcileOptions};
use stubgen_renderer::{RenderOptions, DEFAULT_ROOT_TOKEN};
use stubgen_types::env_utils::{env_bool_or, env_string_or, env_var};
use stubgen_types::{Namespaces, DEFAULT_TUPLE_LIMIT};

pub const ENV_NS_COMMON: &str = "STUBGEN_NS_COMMON";
pub const ENV_NS_A: &str = "STUBGEN_NS_A";
pub const ENV_NS_B: &str = "STUBGEN_NS_B";
pub const ENV_TUPLE_LIMIT: &str = "STUBGEN_TUPLE_LIMIT";
pub const ENV_ROOT_TOKEN: &str = "STUBGEN_ROOT_TOKEN";
pub const ENV_POLICY: &str = "STUBGEN_POLICY";
pub const ENV_PARALLEL: &str = "STUBGEN_PARALLEL";

/// Configuration flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Namespace token for the common collection.
    #[arg(long, global = true, value_name = "NAME")]
    pub ns_common: Option<String>,

    /// Namespace token for variant A.
    #[arg(long, global = true, value_name = "NAME")]
    pub ns_a: Option<String>,

    /// Namespace token for variant B.
    #[arg(long, global = true, value_name = "NAME")]
    pub ns_b: Option<String>,

    /// Longest fixed-size tuple expansion, in characters, before falling back to an
    /// annotated sequence.
    #[arg(long, global = true, value_name = "CHARS")]
    pub tuple_limit: Option<usize>,

    /// Supertype written for the root of the object hierarchy.
    #[arg(long, global = true, value_name = "TOKEN")]
    pub root_token: Option<String>,

    /// How classes with differing supertypes are treated: veto | member-level.
    #[arg(long, global = true, value_name = "POLICY")]
    pub policy: Option<CommonizationPolicy>,

    /// Run reconciliation and rendering on a single thread.
    #[arg(long, global = true, default_value_t = false)]
    pub sequential: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubgenConfig {
    pub namespaces: Namespaces,
    pub tuple_limit: usize,
    pub root_token: String,
    pub policy: CommonizationPolicy,
    pub parallel: bool,
}

impl Default for StubgenConfig {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::default(),
            tuple_limit: DEFAULT_TUPLE_LIMIT,
            root_token: DEFAULT_ROOT_TOKEN.to_string(),
            policy: CommonizationPolicy::default(),
            parallel: true,
        }
    }
}

impl StubgenConfig {
    /// Defaults overridden by any `STUBGEN_*` variables that are set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            namespaces: Namespaces::new(
                env_string_or(ENV_NS_COMMON, &defaults.namespaces.common),
                env_string_or(ENV_NS_A, &defaults.namespaces.variant_a),
                env_string_or(ENV_NS_B, &defaults.namespaces.variant_b),
            ),
            tuple_limit: env_var(ENV_TUPLE_LIMIT).unwrap_or(defaults.tuple_limit),
            root_token: env_string_or(ENV_ROOT_TOKEN, &defaults.root_token),
            policy: env_var(ENV_POLICY).unwrap_or(defaults.policy),
            parallel: env_bool_or(ENV_PARALLEL, defaults.parallel),
        }
    }

    /// Environment configuration with command-line flags applied on top.
    pub fn resolve(args: &ConfigArgs) -> Self {
        Self::from_env().with_args(args)
    }

    pub fn with_args(mut self, args: &ConfigArgs) -> Self {
        if let Some(ns) = &args.ns_common {
            self.namespaces.common = ns.clone();
        }
        if let Some(ns) = &args.ns_a {
            self.namespaces.variant_a = ns.clone();
        }
        if let Some(ns) = &args.ns_b {
            self.namespaces.variant_b = ns.clone();
        }
        if let Some(limit) = args.tuple_limit {
            self.tuple_limit = limit;
        }
        if let Some(token) = &args.root_token {
            self.root_token = token.clone();
        }
        if let Some(policy) = args.policy {
            self.policy = policy;
        }
        if args.sequential {
            self.parallel = false;
        }
        self
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            policy: self.policy,
            parallel: self.parallel,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            namespaces: self.namespaces.clone(),
            tuple_limit: self.tuple_limit,
            root_token: self.root_token.clone(),
            parallel: self.parallel,
        }
    }
}
