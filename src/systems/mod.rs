//! Systems - the stages of a step, each operating on the body/constraint arenas

pub mod collision;
pub mod constraint_solver;
pub mod pairs;
pub mod resolver;
pub mod sleeping;
