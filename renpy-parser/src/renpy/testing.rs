//! Testing utilities
//!
//!     Two rules keep the parser tests maintainable:
//!
//!         1. Prefer the curated sample scripts (via [`Sample`]) over ad-hoc source strings
//!            when a test is about realistic documents. Small, targeted strings are fine for
//!            unit tests of a single rule.
//!         2. Check AST shape with the fluent assertions (via [assert_ast](fn@assert_ast))
//!            rather than by walking nodes by hand.
//!
//!     Walking the AST by hand ties every test to the exact node layout; the assertion API
//!     keeps that knowledge in one place.
//!
//! Usage Example
//!
//!     ```rust,ignore
//!     use renpy_parser::renpy::testing::{assert_ast, Sample};
//!
//!     let output = Sample::TheQuestion.parse();
//!     assert_ast(&output.document)
//!         .statement(0, |s| s.assert_define().target("s").priority("0"))
//!         .statement(3, |s| {
//!             s.assert_label()
//!                 .name("start")
//!                 .body(0, |b| b.assert_python().code("points = 0"))
//!         });
//!     ```

mod ast_assertions;
mod samples;

pub use ast_assertions::{
    assert_ast, BindingAssertion, DocumentAssertion, LabelAssertion, PythonAssertion,
    StatementAssertion, TargetAssertion,
};
pub use samples::Sample;
