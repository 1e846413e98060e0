//! Recipe filter tags, the filter accumulator and onboarding stages
//!
//! Tag wire names follow the recipe catalog's vocabulary so a filter can be
//! forwarded to the search endpoint unchanged.

use crate::errors::TagError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every tag in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Catalog wire name
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().replace(['_', '-'], " ").to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|tag| tag.as_str().replace('-', " ").to_lowercase() == normalized)
                    .ok_or_else(|| TagError::Unknown {
                        kind: $kind,
                        tag: s.to_string(),
                    })
            }
        }

        // Request bodies accept the same spellings as `FromStr`
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

tag_enum!(
    /// Diet restriction
    Diet, "diet", {
        GlutenFree => "gluten free",
        Ketogenic => "ketogenic",
        Vegetarian => "vegetarian",
        LactoVegetarian => "lacto-vegetarian",
        OvoVegetarian => "ovo-vegetarian",
        Vegan => "vegan",
        Pescetarian => "pescetarian",
        Paleo => "paleo",
        Primal => "primal",
        LowFodmap => "low FODMAP",
        Whole30 => "whole30",
    }
);

tag_enum!(
    /// Cuisine
    Cuisine, "cuisine", {
        African => "african",
        Asian => "asian",
        American => "american",
        British => "british",
        Cajun => "cajun",
        Caribbean => "caribbean",
        Chinese => "chinese",
        EasternEuropean => "eastern european",
        European => "european",
        French => "french",
        German => "german",
        Greek => "greek",
        Indian => "indian",
        Irish => "irish",
        Italian => "italian",
        Japanese => "japanese",
        Jewish => "jewish",
        Korean => "korean",
        LatinAmerican => "latin american",
        Mediterranean => "mediterranean",
        Mexican => "mexican",
        MiddleEastern => "middle eastern",
        Nordic => "nordic",
        Southern => "southern",
        Spanish => "spanish",
        Thai => "thai",
        Vietnamese => "vietnamese",
    }
);

tag_enum!(
    /// Meal type
    MealType, "meal type", {
        MainCourse => "main course",
        SideDish => "side dish",
        Dessert => "dessert",
        Appetizer => "appetizer",
        Salad => "salad",
        Bread => "bread",
        Breakfast => "breakfast",
        Soup => "soup",
        Beverage => "beverage",
        Sauce => "sauce",
        Marinade => "marinade",
        Fingerfood => "fingerfood",
        Snack => "snack",
        Drink => "drink",
    }
);

tag_enum!(
    /// Food intolerance / allergy
    Intolerance, "intolerance", {
        Dairy => "dairy",
        Egg => "egg",
        Gluten => "gluten",
        Grain => "grain",
        Peanut => "peanut",
        Seafood => "seafood",
        Sesame => "sesame",
        Shellfish => "shellfish",
        Soy => "soy",
        Sulfite => "sulfite",
        TreeNut => "tree nut",
        Wheat => "wheat",
    }
);

/// Filter category a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Diet,
    Cuisine,
    MealType,
    Intolerance,
}

/// A single tag of any category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTag {
    Diet(Diet),
    Cuisine(Cuisine),
    MealType(MealType),
    Intolerance(Intolerance),
}

impl FilterTag {
    /// Parse a tag of the given category from its wire name
    pub fn parse(category: TagCategory, tag: &str) -> Result<Self, TagError> {
        Ok(match category {
            TagCategory::Diet => FilterTag::Diet(tag.parse()?),
            TagCategory::Cuisine => FilterTag::Cuisine(tag.parse()?),
            TagCategory::MealType => FilterTag::MealType(tag.parse()?),
            TagCategory::Intolerance => FilterTag::Intolerance(tag.parse()?),
        })
    }

    pub fn category(&self) -> TagCategory {
        match self {
            FilterTag::Diet(_) => TagCategory::Diet,
            FilterTag::Cuisine(_) => TagCategory::Cuisine,
            FilterTag::MealType(_) => TagCategory::MealType,
            FilterTag::Intolerance(_) => TagCategory::Intolerance,
        }
    }
}

/// Selected recipe filter tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilter {
    #[serde(default)]
    pub diets: BTreeSet<Diet>,
    #[serde(default)]
    pub cuisines: BTreeSet<Cuisine>,
    #[serde(default)]
    pub meal_types: BTreeSet<MealType>,
    #[serde(default)]
    pub intolerances: BTreeSet<Intolerance>,
}

/// Add `value` if absent, remove it if present; returns whether it is now in the set
pub fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

fn join_tags<T: Copy + fmt::Display>(set: &BTreeSet<T>) -> Option<String> {
    if set.is_empty() {
        return None;
    }
    Some(set.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(","))
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the tag if absent, remove it if present
    ///
    /// Returns whether the tag is selected afterwards.
    pub fn toggle(&mut self, tag: FilterTag) -> bool {
        match tag {
            FilterTag::Diet(t) => toggle_in(&mut self.diets, t),
            FilterTag::Cuisine(t) => toggle_in(&mut self.cuisines, t),
            FilterTag::MealType(t) => toggle_in(&mut self.meal_types, t),
            FilterTag::Intolerance(t) => toggle_in(&mut self.intolerances, t),
        }
    }

    pub fn contains(&self, tag: FilterTag) -> bool {
        match tag {
            FilterTag::Diet(t) => self.diets.contains(&t),
            FilterTag::Cuisine(t) => self.cuisines.contains(&t),
            FilterTag::MealType(t) => self.meal_types.contains(&t),
            FilterTag::Intolerance(t) => self.intolerances.contains(&t),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diets.is_empty()
            && self.cuisines.is_empty()
            && self.meal_types.is_empty()
            && self.intolerances.is_empty()
    }

    /// Union of both filters
    pub fn merge(&mut self, other: &RecipeFilter) {
        self.diets.extend(other.diets.iter().copied());
        self.cuisines.extend(other.cuisines.iter().copied());
        self.meal_types.extend(other.meal_types.iter().copied());
        self.intolerances.extend(other.intolerances.iter().copied());
    }

    /// Query parameters for the catalog search endpoint
    ///
    /// Empty categories are omitted; tags are comma-joined in sorted order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(diet) = join_tags(&self.diets) {
            params.push(("diet", diet));
        }
        if let Some(cuisine) = join_tags(&self.cuisines) {
            params.push(("cuisine", cuisine));
        }
        if let Some(meal_type) = join_tags(&self.meal_types) {
            params.push(("type", meal_type));
        }
        if let Some(intolerances) = join_tags(&self.intolerances) {
            params.push(("intolerances", intolerances));
        }
        params
    }
}

/// How far a user has progressed through preference onboarding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    #[default]
    Intolerances,
    Diets,
    Cuisines,
    Complete,
}

impl OnboardingStage {
    /// Next stage; `Complete` is terminal
    pub fn advance(self) -> Self {
        match self {
            OnboardingStage::Intolerances => OnboardingStage::Diets,
            OnboardingStage::Diets => OnboardingStage::Cuisines,
            OnboardingStage::Cuisines | OnboardingStage::Complete => OnboardingStage::Complete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingStage::Intolerances => "intolerances",
            OnboardingStage::Diets => "diets",
            OnboardingStage::Cuisines => "cuisines",
            OnboardingStage::Complete => "complete",
        }
    }
}

impl FromStr for OnboardingStage {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intolerances" => Ok(OnboardingStage::Intolerances),
            "diets" => Ok(OnboardingStage::Diets),
            "cuisines" => Ok(OnboardingStage::Cuisines),
            "complete" => Ok(OnboardingStage::Complete),
            other => Err(TagError::Unknown {
                kind: "onboarding stage",
                tag: other.to_string(),
            }),
        }
    }
}

/// Parse a list of wire names, failing on the first unknown tag
pub fn parse_tags<T: FromStr<Err = TagError> + Ord>(tags: &[String]) -> Result<BTreeSet<T>, TagError> {
    tags.iter().map(|t| t.parse()).collect()
}

/// Wire names of a tag set, in sorted order
pub fn tag_names<T: Copy + fmt::Display>(set: &BTreeSet<T>) -> Vec<String> {
    set.iter().map(|t| t.to_string()).collect()
}
