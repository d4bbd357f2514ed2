//! Curated sample scripts

use crate::renpy::analysis::{analyze, Analysis, AnalysisOptions};
use crate::renpy::lexing::tokenize;
use crate::renpy::parsing::{parse_document, ParseOutput};
use crate::renpy::token::TokenStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// A small but complete game: defines, labels with parameters, calls, jumps and lines
    /// the grammar skips (dialogue, menus, displayables). Produces no diagnostics.
    TheQuestion,
    /// One of each recoverable error.
    Broken,
}

impl Sample {
    pub const ALL: &'static [Sample] = &[Sample::TheQuestion, Sample::Broken];

    pub fn name(&self) -> &'static str {
        match self {
            Sample::TheQuestion => "the_question.rpy",
            Sample::Broken => "broken.rpy",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Sample::TheQuestion => include_str!("../../../samples/the_question.rpy"),
            Sample::Broken => include_str!("../../../samples/broken.rpy"),
        }
    }

    pub fn tokenize(&self) -> TokenStream {
        tokenize(self.source())
    }

    pub fn parse(&self) -> ParseOutput {
        parse_document(self.source())
    }

    pub fn analyze(&self) -> Analysis {
        analyze(self.source(), &AnalysisOptions::default())
    }
}
