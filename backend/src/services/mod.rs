//! Business logic services
//!
//! Services validate input, coordinate repositories and catalog clients, and
//! map failures into `ApiError`.

pub mod export;
pub mod preferences;
pub mod product;
pub mod profile;
pub mod recipe;
pub mod user;

pub use export::ExportService;
pub use preferences::PreferencesService;
pub use product::ProductService;
pub use profile::ProfileService;
pub use recipe::RecipeService;
pub use user::UserService;
