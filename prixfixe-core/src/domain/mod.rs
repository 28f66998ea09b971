//! Domain models for Prixfixe Core

pub mod common;
pub mod filter;
pub mod ingredient;
pub mod ingredient_tag_mapping;
pub mod instrument;
pub mod invitation;
pub mod iteration_media;
pub mod oauth2_client;
pub mod preparation;
pub mod recipe;
pub mod recipe_iteration;
pub mod recipe_iteration_step;
pub mod recipe_step;
pub mod recipe_step_event;
pub mod recipe_step_ingredient;
pub mod valid_ingredient;
pub mod valid_ingredient_preparation;

pub use common::*;
pub use filter::*;
pub use ingredient::*;
pub use ingredient_tag_mapping::*;
pub use instrument::*;
pub use invitation::*;
pub use iteration_media::*;
pub use oauth2_client::*;
pub use preparation::*;
pub use recipe::*;
pub use recipe_iteration::*;
pub use recipe_iteration_step::*;
pub use recipe_step::*;
pub use recipe_step_event::*;
pub use recipe_step_ingredient::*;
pub use valid_ingredient::*;
pub use valid_ingredient_preparation::*;
