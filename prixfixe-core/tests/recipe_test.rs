//! Recipe tree integration tests

use pretty_assertions::assert_eq;
use prixfixe_core::domain::{
    IterationMediaCreationInput, QueryFilter, Recipe, RecipeCreationInput,
    RecipeIterationCreationInput, RecipeIterationStepCreationInput, RecipeStep,
    RecipeStepCreationInput, RecipeStepEventCreationInput, RecipeStepIngredientCreationInput,
};
use prixfixe_core::repository::{
    IterationMediaRepository, RecipeIterationRepository, RecipeIterationStepRepository,
    RecipeRepository, RecipeStepEventRepository, RecipeStepIngredientRepository,
    RecipeStepRepository,
};
use prixfixe_core::Postgres;
use tokio_test::{assert_err, assert_ok};

#[macro_use]
mod common;

async fn recipe(postgres: &Postgres, user_id: u64, name: &str) -> Recipe {
    assert_ok!(
        postgres
            .recipes
            .create(&RecipeCreationInput {
                name: name.to_string(),
                source: "grandma".to_string(),
                belongs_to_user: user_id,
                ..Default::default()
            })
            .await
    )
}

async fn step(postgres: &Postgres, recipe_id: u64, index: u64) -> RecipeStep {
    assert_ok!(
        postgres
            .recipe_steps
            .create(&RecipeStepCreationInput {
                index,
                preparation_id: 1,
                min_estimated_time_in_seconds: 60,
                max_estimated_time_in_seconds: 120,
                temperature_in_celsius: Some(180),
                notes: "stir occasionally".to_string(),
                recipe_id,
                belongs_to_recipe: recipe_id,
                ..Default::default()
            })
            .await
    )
}

#[tokio::test]
async fn test_step_event_requires_the_whole_chain() {
    let postgres = postgres_or_skip!();
    let user = common::create_user(&postgres, "chef").await.unwrap();

    let soup = recipe(&postgres, user, "soup").await;
    let stew = recipe(&postgres, user, "stew").await;
    let simmer = step(&postgres, soup.base.id, 0).await;

    let event = assert_ok!(
        postgres
            .recipe_step_events
            .create(&RecipeStepEventCreationInput {
                event_type: "started".to_string(),
                done: false,
                recipe_iteration_id: 1,
                recipe_step_id: simmer.base.id,
                belongs_to_recipe_step: simmer.base.id,
            })
            .await
    );

    let events = &postgres.recipe_step_events;
    let fetched = assert_ok!(events.get(soup.base.id, simmer.base.id, event.base.id).await);
    assert_eq!(fetched, event);

    // the step exists, but not under this recipe
    let err = assert_err!(events.get(stew.base.id, simmer.base.id, event.base.id).await);
    assert!(err.is_not_found());
    assert!(!assert_ok!(
        events.exists(stew.base.id, simmer.base.id, event.base.id).await
    ));

    let listed = assert_ok!(
        events
            .list(stew.base.id, simmer.base.id, &QueryFilter::default())
            .await
    );
    assert!(listed.items.is_empty());
    assert_eq!(listed.pagination.total_count, 0);
}

#[tokio::test]
async fn test_iteration_media_archive_is_not_repeatable() {
    let postgres = postgres_or_skip!();
    let user = common::create_user(&postgres, "baker").await.unwrap();
    let bread = recipe(&postgres, user, "bread").await;

    let iteration = assert_ok!(
        postgres
            .recipe_iterations
            .create(&RecipeIterationCreationInput {
                recipe_id: bread.base.id,
                end_difficulty_rating: 2.5,
                end_complexity_rating: 3.0,
                end_taste_rating: 4.5,
                end_overall_rating: 4.0,
                belongs_to_recipe: bread.base.id,
            })
            .await
    );
    let fetched = assert_ok!(
        postgres
            .recipe_iterations
            .get(bread.base.id, iteration.base.id)
            .await
    );
    assert_eq!(fetched.end_taste_rating, 4.5);

    let photo = assert_ok!(
        postgres
            .iteration_medias
            .create(&IterationMediaCreationInput {
                path: "crumb.jpg".to_string(),
                mimetype: "image/jpeg".to_string(),
                recipe_iteration_id: iteration.base.id,
                recipe_step_id: None,
                belongs_to_recipe_iteration: iteration.base.id,
            })
            .await
    );

    let medias = &postgres.iteration_medias;
    assert_ok!(medias.archive(iteration.base.id, photo.base.id).await);
    let err = assert_err!(medias.archive(iteration.base.id, photo.base.id).await);
    assert!(err.is_not_found());
    assert!(assert_err!(
        medias
            .get(bread.base.id, iteration.base.id, photo.base.id)
            .await
    )
    .is_not_found());
}

#[tokio::test]
async fn test_grouped_list_counts_matching_rows() {
    let postgres = postgres_or_skip!();
    let user = common::create_user(&postgres, "cook").await.unwrap();
    let curry = recipe(&postgres, user, "curry").await;
    let other = recipe(&postgres, user, "rice").await;

    for state in ["prep", "cook", "rest"] {
        assert_ok!(
            postgres
                .recipe_iteration_steps
                .create(&RecipeIterationStepCreationInput {
                    started_on: Some(1_600_000_000),
                    ended_on: None,
                    state: state.to_string(),
                    belongs_to_recipe: curry.base.id,
                })
                .await
        );
    }
    assert_ok!(
        postgres
            .recipe_iteration_steps
            .create(&RecipeIterationStepCreationInput {
                state: "elsewhere".to_string(),
                belongs_to_recipe: other.base.id,
                ..Default::default()
            })
            .await
    );

    let steps = &postgres.recipe_iteration_steps;
    let listed = assert_ok!(steps.list(curry.base.id, &QueryFilter::default()).await);
    assert_eq!(listed.items.len(), 3);
    assert_eq!(listed.pagination.total_count, 3);
    let mut states: Vec<&str> = listed.items.iter().map(|s| s.state.as_str()).collect();
    states.sort_unstable();
    assert_eq!(states, vec!["cook", "prep", "rest"]);
    assert!(listed.items.iter().all(|s| s.ended_on.is_none()));

    let second_page = assert_ok!(
        steps
            .list(
                curry.base.id,
                &QueryFilter {
                    page: 2,
                    limit: 2,
                    ..Default::default()
                }
            )
            .await
    );
    assert_eq!(second_page.items.len(), 1);
    assert_eq!(second_page.pagination.total_count, 3);
}

#[tokio::test]
async fn test_recipe_archive_is_owner_scoped() {
    let postgres = postgres_or_skip!();
    let owner = common::create_user(&postgres, "owner").await.unwrap();
    let stranger = common::create_user(&postgres, "stranger").await.unwrap();

    let mut pie = recipe(&postgres, owner, "pie").await;
    let recipes = &postgres.recipes;

    // reads are not scoped to the owner
    assert!(assert_ok!(recipes.exists(pie.base.id).await));
    assert_eq!(assert_ok!(recipes.get(pie.base.id).await), pie);

    pie.description = "lattice top".to_string();
    assert_ok!(recipes.update(&mut pie).await);
    assert!(pie.base.last_updated_on.is_some());

    assert!(assert_err!(recipes.archive(stranger, pie.base.id).await).is_not_found());
    assert_ok!(recipes.archive(owner, pie.base.id).await);
    assert!(!assert_ok!(recipes.exists(pie.base.id).await));
}

#[tokio::test]
async fn test_step_ingredients_round_trip() {
    let postgres = postgres_or_skip!();
    let user = common::create_user(&postgres, "saucier").await.unwrap();
    let sauce = recipe(&postgres, user, "sauce").await;
    let reduce = step(&postgres, sauce.base.id, 0).await;

    let butter = assert_ok!(
        postgres
            .recipe_step_ingredients
            .create(&RecipeStepIngredientCreationInput {
                ingredient_id: None,
                quantity_type: "grams".to_string(),
                quantity_value: 42.5,
                quantity_notes: "cold".to_string(),
                product_of_recipe: false,
                ingredient_notes: "cubed".to_string(),
                belongs_to_recipe_step: reduce.base.id,
            })
            .await
    );

    let ingredients = &postgres.recipe_step_ingredients;
    let fetched = assert_ok!(
        ingredients
            .get(sauce.base.id, reduce.base.id, butter.base.id)
            .await
    );
    assert_eq!(fetched, butter);

    let steps = &postgres.recipe_steps;
    let listed = assert_ok!(steps.list(sauce.base.id, &QueryFilter::default()).await);
    assert_eq!(listed.items, vec![reduce.clone()]);
    assert_eq!(listed.items[0].temperature_in_celsius, Some(180));

    assert!(assert_err!(steps.archive(sauce.base.id + 1, reduce.base.id).await).is_not_found());
    assert_ok!(steps.archive(sauce.base.id, reduce.base.id).await);
}
