//! Dialect-aware block-structure parser.
//!
//! Parses Markdown-family markup into a lossless [`SyntaxNode`] tree of
//! block nodes, emulating one of four historically divergent dialect
//! families. Inline spans, rendering, and formatting are out of scope:
//! this crate only decides, line by line, which open block each line
//! continues, which blocks close, and which open.
//!
//! ```no_run
//! use stanza::{BlockParser, Config};
//!
//! let config = Config::default();
//! let (tree, lists) = BlockParser::new("- one\n- two\n", &config).parse();
//! assert_eq!(tree.text(), "- one\n- two\n");
//! assert_eq!(lists.len(), 1);
//! ```

pub mod block_parser;
pub mod config;
pub mod syntax;

pub use block_parser::BlockParser;
pub use block_parser::lists::{ListData, ListInfo, ListMarker, ListRegistry, markers_match};
pub use config::{Config, ConfigBuilder, DefaultListPolicy, Emulation, ListPolicy};
pub use syntax::{SyntaxKind, SyntaxNode};
