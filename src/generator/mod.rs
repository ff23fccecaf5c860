pub mod context;
pub mod outlet;
pub mod planner;
pub mod prompt;
pub mod resolver;
pub mod selection;
pub mod synthesis;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
