//! # rlsperf-rewrite
//!
//! Rewrites calls to auth helper functions in a SQL schema so Postgres
//! evaluates them once per query instead of once per row.
//!
//! ## How It Works
//!
//! Each configured function call is wrapped in a scalar subquery:
//!
//! **Before:**
//! ```sql
//! CREATE POLICY own_rows ON items USING (owner_id = auth.uid());
//! ```
//!
//! **After:**
//! ```sql
//! CREATE POLICY own_rows ON items USING (owner_id = (select auth.uid()));
//! ```
//!
//! ## Rules
//!
//! | Rule | Effect |
//! |------|--------|
//! | `Wrap` | Word-boundary match of the call, replaced by its wrapped form |
//! | `Literal` | Exact substring replacement restoring `CREATE OR REPLACE FUNCTION` / `DROP FUNCTION` declarations |
//!
//! A target with a schema expands to one `Wrap` followed by two `Literal`
//! corrections. Rules run in order over the whole text.

pub mod error;
pub mod report;
pub mod rewriter;
pub mod rule;
mod site;

pub use error::RewriteError;
pub use report::{RewriteReport, RuleOutcome};
pub use rewriter::{Rewritten, Rewriter};
pub use rule::{RewriteRule, RuleKind, RuleSet};
