//! kvtree: Valve KeyValues parser and serializer
//!
//! A KeyValues document (`gameinfo.txt` style) is a line-oriented,
//! brace-delimited tree of quoted or bare key/value pairs:
//!
//! ```text
//! "GameInfo"
//! {
//!     "game"    "Half-Life 2"
//!     "Tools"
//!     {
//!         "platform" "Windows"
//!     }
//! }
//! ```
//!
//! Architecture:
//! - `domain`: tokenizer, arena tree, builder and serializer (no I/O)
//! - `application`: services for documents and toolset definitions
//! - `infrastructure`: filesystem, process launcher, DI container
//! - `cli`: command-line interface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{parse, Branch, DomainError, Index, KvTree, Leaf, Token, TreeBuilder};
