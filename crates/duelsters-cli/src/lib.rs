//! # Duelsters CLI
//!
//! Terminal collaborators for the duel engine in `duelsters_core`:
//!
//! - **Input**: line prompts for human players ([`input`])
//! - **Narration**: arena commentary for resolved rounds ([`narration`])
//! - **Display**: round header, character sheets, menus and batch
//!   reports ([`display`])
//!
//! The `duelsters` binary wires these to stdin and stdout. Logs go to
//! stderr so they never interleave with prompts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod display;
pub mod input;
pub mod narration;

pub use input::{Console, HumanSource};
pub use narration::Narrator;
