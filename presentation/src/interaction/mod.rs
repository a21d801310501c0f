//! Interaction channels for the patient interview

pub mod console;

pub use console::ConsoleInteraction;
