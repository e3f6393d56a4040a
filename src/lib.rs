//! # Stratalog: Datalog Clause Lowering
//!
//! Lowers typed Datalog clauses into RAM (relational algebra machine)
//! operation trees. Each clause becomes a nested query that scans its
//! body relations, filters on the clause's constraints, nests its
//! aggregators and multi-result functors, and projects derived tuples
//! into the head relation. Recursive clauses additionally lower once per
//! semi-naïve version, reading one body atom at a time from its delta
//! relation and subtracting tuples that earlier rounds already derived.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! Datalog Source
//!     ↓
//! [Parser + Type Analysis]     → typed clause AST      (upstream)
//!     ↓
//! [SCC Analysis]               → recursive strata      (upstream)
//!     ↓
//! [RAM Builder]                → RAM statement trees   (this crate)
//!     ↓
//! [RAM Optimizer + Evaluator]  → derived tuples        (downstream)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use stratalog::ast::builders::{atom, var, ClauseBuilder};
//! use stratalog::{ClauseLowerer, LowerContext, RelationCatalog, SymbolTable};
//!
//! let mut catalog = RelationCatalog::new();
//! catalog.register_relation("path", 2);
//! catalog.register_relation("edge", 2);
//!
//! let symbols = SymbolTable::new();
//! let context = LowerContext::new(&catalog, &symbols);
//!
//! // path(x, z) :- path(x, y), edge(y, z).
//! let clause = ClauseBuilder::new(atom("path", [var("x"), var("z")]))
//!     .atom(atom("path", [var("x"), var("y")]))
//!     .atom(atom("edge", [var("y"), var("z")]))
//!     .build();
//!
//! let statement = ClauseLowerer::new(&context).lower(&clause)?;
//! println!("{}", statement.pretty_print(0));
//! # Ok::<(), stratalog::LowerError>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `ast` | typed clause AST + fluent builders |
//! | `ram` | RAM statement/operation/condition/expression trees |
//! | `ram_builder` | clause indexing, operation building, version driver |
//! | `catalog` | relation arities and delta/new/concrete naming |
//! | `symbol_table` | string interning into the RAM domain |

pub mod ast;
pub mod catalog;
pub mod error;
pub mod ram;
pub mod ram_builder;
pub mod symbol_table;

// Re-export the lowering surface
pub use crate::catalog::{concrete_name, delta_name, new_name, RelationCatalog, RelationInfo};
pub use crate::error::LowerError;
pub use crate::ram_builder::{ClauseLowerer, LowerContext};
pub use crate::symbol_table::SymbolTable;
