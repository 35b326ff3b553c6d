use std::fmt;

/// Food categories the classifier can predict, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Bread,
    DairyProduct,
    Dessert,
    Egg,
    FriedFood,
    Meat,
    NoodlesPasta,
    Rice,
    Seafood,
    Soup,
    VegetableFruit,
}

impl Category {
    /// All categories ordered by class index.
    pub const ALL: [Category; 11] = [
        Category::Bread,
        Category::DairyProduct,
        Category::Dessert,
        Category::Egg,
        Category::FriedFood,
        Category::Meat,
        Category::NoodlesPasta,
        Category::Rice,
        Category::Seafood,
        Category::Soup,
        Category::VegetableFruit,
    ];

    /// Resolve a classifier output index. Out-of-range indices return `None`.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Bread => "Bread",
            Category::DairyProduct => "Dairy product",
            Category::Dessert => "Dessert",
            Category::Egg => "Egg",
            Category::FriedFood => "Fried food",
            Category::Meat => "Meat",
            Category::NoodlesPasta => "Noodles-Pasta",
            Category::Rice => "Rice",
            Category::Seafood => "Seafood",
            Category::Soup => "Soup",
            Category::VegetableFruit => "Vegetable-Fruit",
        }
    }

    /// Search phrase sent to the nutrition service for this category.
    pub fn search_phrase(self) -> &'static str {
        match self {
            Category::Bread => "whole wheat bread",
            Category::DairyProduct => "cheddar cheese",
            Category::Dessert => "chocolate cake",
            Category::Egg => "egg",
            Category::FriedFood => "fried chicken",
            Category::Meat => "grilled chicken breast",
            Category::NoodlesPasta => "cooked spaghetti",
            Category::Rice => "white rice cooked",
            Category::Seafood => "grilled salmon",
            Category::Soup => "tomato soup",
            Category::VegetableFruit => "mixed vegetables cooked",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
