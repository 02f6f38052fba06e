//! # Duelsters Core
//!
//! Deterministic resolution engine for two-combatant, turn-based duels.
//!
//! Each round both sides commit a directional action (attack, guard, evade)
//! or a heal. The pair is classified into a single [`Outcome`], the outcome
//! is applied to both combatants, and the round counter advances until one
//! side falls.
//!
//! ## Architecture
//!
//! Data flows one way: actions in, outcome out, state mutation, next round.
//!
//! - **Combatants**: stats, health, status flags ([`combatant`])
//! - **Resolver**: pure action-pair classification ([`resolver::resolve`])
//! - **Processor**: applies an outcome with dice ([`resolver::OutcomeProcessor`])
//! - **Match**: per-round state machine ([`simulation::Match`])
//!
//! Input, narration and display are external collaborators; see the
//! [`controller::ActionSource`] seam.
//!
//! ## Usage
//!
//! ```
//! use duelsters_core::combatant::{ClassArchetype, Combatant, ControllerKind};
//! use duelsters_core::config::DuelRules;
//! use duelsters_core::controller::ComputerPolicy;
//! use duelsters_core::simulation::Match;
//!
//! let rules = DuelRules::default();
//! let one = Combatant::new("Ada", ClassArchetype::Acrobat, ControllerKind::Computer, &rules)?;
//! let two = Combatant::new("Bo", ClassArchetype::Support, ControllerKind::Computer, &rules)?;
//!
//! let mut duel = Match::seeded(7, one, two, rules)?;
//! let summary = duel.play_to_completion(&mut ComputerPolicy::new(), &mut ComputerPolicy::new(), 1_000)?;
//! assert!(summary.rounds > 0);
//! # Ok::<(), duelsters_core::error::DuelError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod batch;
pub mod combatant;
pub mod config;
pub mod controller;
pub mod dice;
pub mod error;
pub mod hash;
pub mod outcome;
pub mod resolver;
pub mod simulation;
pub mod stats;

pub use action::Action;
pub use combatant::{ClassArchetype, Combatant, ControllerKind, Side};
pub use config::DuelRules;
pub use error::{DuelError, Result};
pub use outcome::Outcome;
pub use simulation::{Match, MatchResult, RoundPhase, RoundReport};

#[cfg(test)]
mod tests;
