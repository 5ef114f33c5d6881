//! Terminal presentation: draws the store's state and asks for confirmation.

pub mod terminal;
pub mod views;
