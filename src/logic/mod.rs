//! Bracket engine: topology, construction, result progression, tournament setup.

mod builder;
mod progression;
mod repository;
mod setup;
mod topology;

pub use builder::{build_bracket, BracketLayout};
pub use progression::{plan_progression, report_result, LoserFate, MatchReport, Progression};
pub use repository::{BracketStore, StatsSink};
pub use setup::{create_tournament, register_player, NewTournament};
pub use topology::{is_valid_field, BracketTopology, Slot};
