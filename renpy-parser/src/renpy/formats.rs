//! Debug renderers
//!
//!     Pure functions from the front end's products to text, used by the CLI and by tests.
//!
//!     - [`tokens`]: one line per token, with positions.
//!     - [`treeviz`]: one line per AST node, nesting shown as indentation.
//!
//!     The source round trip is [`TokenStream::reconstruct`](crate::renpy::token::TokenStream::reconstruct).

pub mod tokens;
pub mod treeviz;

pub use tokens::to_token_listing;
pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params, TreevizParams};
