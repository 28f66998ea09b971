//! Data access layer (Repository pattern)
//!
//! Every entity table gets a trait describing its operations and an
//! implementation backed by a shared [`crud::TableRepository`].

pub mod crud;
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
pub mod scanner;
pub mod table;
pub mod valid_ingredient;
pub mod valid_ingredient_preparation;

pub use crud::{Entity, TableRepository};
pub use ingredient::{IngredientRepository, IngredientRepositoryImpl};
pub use ingredient_tag_mapping::{
    IngredientTagMappingRepository, IngredientTagMappingRepositoryImpl,
};
pub use instrument::{InstrumentRepository, InstrumentRepositoryImpl};
pub use invitation::{InvitationRepository, InvitationRepositoryImpl};
pub use iteration_media::{IterationMediaRepository, IterationMediaRepositoryImpl};
pub use oauth2_client::{OAuth2ClientRepository, OAuth2ClientRepositoryImpl};
pub use preparation::{PreparationRepository, PreparationRepositoryImpl};
pub use recipe::{RecipeRepository, RecipeRepositoryImpl};
pub use recipe_iteration::{RecipeIterationRepository, RecipeIterationRepositoryImpl};
pub use recipe_iteration_step::{
    RecipeIterationStepRepository, RecipeIterationStepRepositoryImpl,
};
pub use recipe_step::{RecipeStepRepository, RecipeStepRepositoryImpl};
pub use recipe_step_event::{RecipeStepEventRepository, RecipeStepEventRepositoryImpl};
pub use recipe_step_ingredient::{
    RecipeStepIngredientRepository, RecipeStepIngredientRepositoryImpl,
};
pub use table::{Link, ListCount, Owner, Table};
pub use valid_ingredient::{ValidIngredientRepository, ValidIngredientRepositoryImpl};
pub use valid_ingredient_preparation::{
    ValidIngredientPreparationRepository, ValidIngredientPreparationRepositoryImpl,
};
