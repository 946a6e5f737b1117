//! Fixed catalogue of listing categories.

use serde::{Deserialize, Serialize};

/// One entry of the category catalogue shown by the category picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        label: "Beach",
        description: "This property is close to the beach!",
    },
    Category {
        label: "Windmills",
        description: "This property has windmills!",
    },
    Category {
        label: "Modern",
        description: "This property is modern!",
    },
    Category {
        label: "Countryside",
        description: "This property is in the countryside!",
    },
    Category {
        label: "Pools",
        description: "This property has a pool!",
    },
    Category {
        label: "Island",
        description: "This property is on an island!",
    },
    Category {
        label: "Lake",
        description: "This property is close to a lake!",
    },
    Category {
        label: "Ski",
        description: "This property has skiing activities!",
    },
    Category {
        label: "Castle",
        description: "This property is in a castle!",
    },
    Category {
        label: "Camping",
        description: "This property has camping activities!",
    },
    Category {
        label: "Arctic",
        description: "This property is in an arctic environment!",
    },
    Category {
        label: "Cave",
        description: "This property is in a cave!",
    },
    Category {
        label: "Desert",
        description: "This property is in the desert!",
    },
    Category {
        label: "Barn",
        description: "This property is in a barn!",
    },
    Category {
        label: "Lux",
        description: "This property is brand new and luxurious!",
    },
];

impl Category {
    /// Case-insensitive lookup by label.
    pub fn find(label: &str) -> Option<&'static Category> {
        let label = label.trim();
        CATEGORIES
            .iter()
            .find(|category| category.label.eq_ignore_ascii_case(label))
    }

    pub fn labels() -> Vec<&'static str> {
        CATEGORIES.iter().map(|category| category.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_fifteen_unique_labels() {
        let mut labels = Category::labels();
        assert_eq!(labels.len(), 15);
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 15);
    }

    #[test]
    fn find_ignores_case_and_whitespace() {
        let beach = Category::find("  bEaCh ").expect("beach");
        assert_eq!(beach.label, "Beach");
        assert!(Category::find("Volcano").is_none());
    }
}
