//! Example problem domains built on the solver, used by the demos and
//! the end-to-end tests.

pub mod spelling;
