pub(crate) mod bootstrap;
mod gameplay;
mod layout;
pub(crate) mod loop_runner;
