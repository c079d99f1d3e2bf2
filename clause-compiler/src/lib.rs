//! A small expression compiler between a symbolic reasoning engine and
//! an external positional pattern matcher.
//!
//! Text enters `term::parse`, and comes out as a `Term` tree.  Sets of
//! clauses that share logic variables go through
//! `stratify::stratify`, which orders them in levels such that no
//! clause consumes a variable before an earlier level binds it.
//! Individual terms go through `wire::encode_pair`, which yields the
//! pattern and template encodings the matcher consumes.  `Compiler`
//! strings these steps together for compiled rules and queries.
//!
//! Every operation is a pure function of its input: there is no shared
//! state, and no state survives a call.
pub mod compile;
pub mod config;
pub mod error;
pub mod stratify;
pub mod term;
pub mod wire;

pub use compile::{Compiler, Restructured};
pub use config::{CompilerConfig, FunctorRename};
pub use error::{CompileError, ConfigError, SyntaxError};
pub use stratify::{stratify, stratify_clauses, Clause, Level, Stratification};
pub use term::{is_variable, parse, parse_all, variables_of, variables_of_all, Term};
pub use wire::{encode, encode_pair, encode_str, AddressingMode, WireEncoding};
