// Models shared between the decision engine and any market-data or execution
// adapter built on top of it.
pub mod models;
