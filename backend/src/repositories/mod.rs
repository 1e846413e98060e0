//! Database repositories
//!
//! Unit structs with associated functions over a `PgPool`; every query is
//! scoped to the owning user.

pub mod preferences;
pub mod product;
pub mod recipe;
pub mod user;

pub use preferences::{PreferencesRecord, PreferencesRepository, SavePreferences};
pub use product::{CreateProduct, ProductCounts, ProductRecord, ProductRepository};
pub use recipe::{RecipeCounts, RecipeRecord, RecipeRepository, SaveRecipe, StoredStep};
pub use user::{UserRecord, UserRepository};
