//! Domain model: game enumerations, characters and the roster.
//!
//! All types in this module are immutable once the roster is loaded.

pub use self::{
    armor::*, character::*, class::*, player_set::*, role::*, roster::*, roster_index::*,
    token::*,
};

mod armor;
mod character;
mod class;
mod player_set;
mod role;
mod roster;
mod roster_index;
mod token;
