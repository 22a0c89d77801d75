//! Exploration gameplay: a fixed-anchor player over a scrolling world,
//! carryable pickups that combine, patrolling NPCs and proximity prompts.

mod content;
mod entity;
mod interactables;
mod npc;
mod pickup;
mod player;
mod scene;
mod tooltip;
mod viewport;

pub(crate) use content::{load_world_content, ContentError};
pub(crate) use scene::ExplorationScene;
