// Move-selection core: style book + aggression heuristics + engine blending
pub mod board;
pub mod book;
pub mod chooser;
pub mod corpus;
pub mod decider;
pub mod engine;
pub mod style;
