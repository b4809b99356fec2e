use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::CatalogIndex;
use crate::models::MenuItem;

/// What `filter` does when only one of category/flavor is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// The missing dimension matches everything.
    #[default]
    Wildcard,
    /// Both dimensions must be given, otherwise nothing matches.
    RequireBoth,
}

impl FromStr for FilterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "wildcard" => Ok(FilterPolicy::Wildcard),
            "require_both" => Ok(FilterPolicy::RequireBoth),
            other => Err(format!(
                "unknown filter policy '{}', expected wildcard or require_both",
                other
            )),
        }
    }
}

/// Read-only queries over one consistent item set and its index.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    items: &'a [MenuItem],
    index: &'a CatalogIndex,
    policy: FilterPolicy,
}

impl<'a> QueryEngine<'a> {
    pub fn new(items: &'a [MenuItem], index: &'a CatalogIndex, policy: FilterPolicy) -> Self {
        Self {
            items,
            index,
            policy,
        }
    }

    pub fn categories_available(&self) -> &'a [String] {
        self.index.categories()
    }

    pub fn flavors_for(&self, category: &str) -> &'a [String] {
        self.index.flavors_for(category.trim())
    }

    pub fn all_items(&self) -> &'a [MenuItem] {
        self.items
    }

    /// Items matching a category and flavor selection.
    ///
    /// Blank inputs count as unset. Both unset returns everything; the
    /// all-categories entry ignores category and matches on flavor only.
    /// When exactly one side is set the result depends on `FilterPolicy`.
    pub fn filter(&self, category: &str, flavor: &str) -> Vec<&'a MenuItem> {
        let category = category.trim();
        let flavor = flavor.trim();
        let any_category = self.index.is_sentinel(category);

        match (category.is_empty(), flavor.is_empty()) {
            (true, true) => self.items.iter().collect(),
            (false, false) if any_category => self.matching(|item| item.has_flavor(flavor)),
            (false, false) => {
                self.matching(|item| item.in_category(category) && item.has_flavor(flavor))
            }
            _ if self.policy == FilterPolicy::RequireBoth => Vec::new(),
            (false, true) if any_category => self.items.iter().collect(),
            (false, true) => self.matching(|item| item.in_category(category)),
            (true, false) => self.matching(|item| item.has_flavor(flavor)),
        }
    }

    fn matching(&self, predicate: impl Fn(&MenuItem) -> bool) -> Vec<&'a MenuItem> {
        self.items.iter().filter(|item| predicate(*item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_index;
    use pretty_assertions::assert_eq;

    fn menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new("Espresso", "Beverage", "Strong"),
            MenuItem::new("Tea", "Beverage", "Refreshing"),
            MenuItem::new("Pizza", "Food", "Savory"),
            MenuItem::new("Chili", "Food", "Strong"),
        ]
    }

    fn names(items: &[&MenuItem]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn both_dimensions() {
        let items = menu();
        let index = build_index(&items, true, "All Categories");
        let engine = QueryEngine::new(&items, &index, FilterPolicy::Wildcard);

        assert_eq!(names(&engine.filter("Beverage", "Strong")), vec!["Espresso"]);
        assert_eq!(names(&engine.filter(" Food ", " Savory")), vec!["Pizza"]);
        assert!(engine.filter("Food", "Refreshing").is_empty());
        assert!(engine.filter("Dessert", "Sweet").is_empty());
    }

    #[test]
    fn sentinel_ignores_category() {
        let items = menu();
        let index = build_index(&items, true, "All Categories");
        let engine = QueryEngine::new(&items, &index, FilterPolicy::Wildcard);

        assert_eq!(
            names(&engine.filter("All Categories", "Strong")),
            vec!["Espresso", "Chili"]
        );
    }

    #[test]
    fn sentinel_is_plain_text_when_disabled() {
        let items = menu();
        let index = build_index(&items, false, "All Categories");
        let engine = QueryEngine::new(&items, &index, FilterPolicy::Wildcard);

        assert!(engine.filter("All Categories", "Strong").is_empty());
    }

    #[test]
    fn nothing_selected_returns_everything() {
        let items = menu();
        let index = build_index(&items, true, "All Categories");

        for policy in [FilterPolicy::Wildcard, FilterPolicy::RequireBoth] {
            let engine = QueryEngine::new(&items, &index, policy);
            assert_eq!(engine.filter("", "  ").len(), 4);
        }
    }

    #[test]
    fn wildcard_policy_for_one_dimension() {
        let items = menu();
        let index = build_index(&items, true, "All Categories");
        let engine = QueryEngine::new(&items, &index, FilterPolicy::Wildcard);

        assert_eq!(names(&engine.filter("Food", "")), vec!["Pizza", "Chili"]);
        assert_eq!(names(&engine.filter("", "Strong")), vec!["Espresso", "Chili"]);
        assert_eq!(engine.filter("All Categories", "").len(), 4);
    }

    #[test]
    fn require_both_policy_for_one_dimension() {
        let items = menu();
        let index = build_index(&items, true, "All Categories");
        let engine = QueryEngine::new(&items, &index, FilterPolicy::RequireBoth);

        assert!(engine.filter("Food", "").is_empty());
        assert!(engine.filter("", "Strong").is_empty());
        assert!(engine.filter("All Categories", "").is_empty());
        assert_eq!(names(&engine.filter("Food", "Strong")), vec!["Chili"]);
    }

    #[test]
    fn flavors_for_unknown_category_is_empty() {
        let items = menu();
        let index = build_index(&items, true, "All Categories");
        let engine = QueryEngine::new(&items, &index, FilterPolicy::Wildcard);

        assert!(engine.flavors_for("Nope").is_empty());
        assert_eq!(engine.flavors_for("Food"), engine.flavors_for("Food"));
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("require-both".parse::<FilterPolicy>(), Ok(FilterPolicy::RequireBoth));
        assert_eq!("Wildcard".parse::<FilterPolicy>(), Ok(FilterPolicy::Wildcard));
        assert!("strict".parse::<FilterPolicy>().is_err());
    }
}
