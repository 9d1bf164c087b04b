//! Attack resolution.
//!
//! [`resolve_attack`] decides what an attack intent does from the arsenal and
//! the melee recovery window without touching any state. The session then
//! applies the outcome: heals go straight to the player, strikes become a
//! short-lived [`Hitbox`] that [`apply_hitboxes`] tests against the field on
//! the attack frame and on every following frame until it expires.
//!
//! Kill points use the obstacle HP *before* the lethal hit, see [`kill_score`].

mod hitbox;
mod resolve;

pub use hitbox::{Hit, Hitbox, apply_hitboxes};
pub use resolve::{AttackOutcome, Strike, kill_score, resolve_attack};
