//! Clauses in a rule's premise share logic variables, and the
//! external matcher can only consume a variable once something has
//! bound it.  Stratification partitions such a set of clauses into an
//! ordered sequence of levels: level 0 may be evaluated with nothing
//! bound, and level `k` may assume every variable bound by levels
//! `0..k`.
//!
//! This is a restricted topological sort over the implicit bipartite
//! graph of clauses that produce and consume variables.  Computation
//! clauses, `(CPU operator input output)`, consume their whole input
//! before producing their output; generic clauses only produce.
//!
//! Stratification never fails.  Clauses that can never be scheduled
//! are reported separately, and callers that need full coverage
//! should check `Stratification::is_complete`.
mod clause;
mod level;
mod planner;

pub use clause::Clause;
pub use level::Level;
pub use level::Stratification;
pub use planner::stratify;
pub use planner::stratify_clauses;
