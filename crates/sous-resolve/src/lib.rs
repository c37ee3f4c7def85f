//! # sous-resolve
//!
//! The recipe resolution pipeline: parse a freeform query, rank stored
//! recipes against it, and when nothing matches, generate a new
//! candidate, embed it, and persist it as an unapproved draft.
//!
//! The [`Resolver`] orchestrates the stages over the repository and
//! inference traits from `sous-core`; the parser, matcher, and prompt
//! builder are pure and independently testable.

pub mod matcher;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

pub use matcher::{find_matches, rank_candidates, MatchOutcome, RankedMatch};
pub use orchestrator::{Resolution, ResolutionState, Resolver, ResolveRequest};
pub use parser::parse;
pub use prompt::build_composite_prompt;
