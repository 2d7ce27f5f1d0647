// Parameterized SELECT passthrough endpoints; no business logic lives here.

pub mod catalog;
pub mod expenses;
pub mod fixed;
pub mod food;
pub mod investments;
pub mod settings;
