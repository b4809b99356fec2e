use menu_recommender::{
    parse_menu, CatalogOptions, Delimiter, FieldRules, MenuItem, MenuStore, RawRow,
};
use pretty_assertions::assert_eq;

fn load(store: &MenuStore, text: &str) {
    let normalized = parse_menu(text, Delimiter::Comma, &FieldRules::default()).unwrap();
    let ticket = store.begin_load();
    store.commit(ticket, "test.csv", normalized).unwrap();
}

fn names(items: &[MenuItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

const THREE_ITEMS: &str = "Name,Category,Flavor\nEspresso,Beverage,Strong\nTea,Beverage,Refreshing\nPizza,Food,Savory\n";

#[test]
fn three_item_menu() {
    let store = MenuStore::default();
    load(&store, THREE_ITEMS);

    assert_eq!(store.categories(), vec!["All Categories", "Beverage", "Food"]);
    assert_eq!(store.flavors_for("Beverage"), vec!["Strong", "Refreshing"]);
    assert_eq!(names(&store.filter("Beverage", "Strong")), vec!["Espresso"]);
    assert_eq!(names(&store.filter("All Categories", "Savory")), vec!["Pizza"]);
    assert!(store.filter("Food", "Strong").is_empty());
}

#[test]
fn row_without_category_leaves_only_sentinel() {
    let store = MenuStore::default();
    load(&store, "Name,Category,Flavor\nX,,A\n");

    assert!(store.all_items().is_empty());
    assert_eq!(store.categories(), vec!["All Categories"]);

    let plain = MenuStore::new(CatalogOptions {
        include_all_sentinel: false,
        ..CatalogOptions::default()
    });
    load(&plain, "Name,Category,Flavor\nX,,A\n");
    assert!(plain.categories().is_empty());
}

#[test]
fn each_category_listed_once_in_first_seen_order() {
    let store = MenuStore::new(CatalogOptions {
        include_all_sentinel: false,
        ..CatalogOptions::default()
    });
    load(
        &store,
        "Name,Category,Flavor\nA,Food,Savory\nB,Drinks,Sweet\nC, Food ,Spicy\nD,Dessert,Sweet\nE,Drinks,Sour\n",
    );

    assert_eq!(store.categories(), vec!["Food", "Drinks", "Dessert"]);
}

#[test]
fn filter_results_always_match_both_dimensions() {
    let store = MenuStore::default();
    load(
        &store,
        "Name,Category,Flavor\nA,Food,Savory\nB,Drinks,Sweet\nC,Food,Spicy\nD,Food,Savory\nE,Drinks,Savory\n",
    );

    for category in store.categories().iter().skip(1) {
        for flavor in store.flavors_for(category) {
            let results = store.filter(category, &flavor);
            assert!(!results.is_empty());
            for item in results {
                assert_eq!(&item.category, category);
                assert_eq!(item.flavor, flavor);
            }
        }
    }
}

#[test]
fn sentinel_filter_matches_flavor_across_categories() {
    let store = MenuStore::default();
    load(
        &store,
        "Name,Category,Flavor\nA,Food,Savory\nB,Drinks,Sweet\nC,Snacks,Savory\nD,Sides, Savory \n",
    );

    let expected: Vec<_> = store
        .all_items()
        .into_iter()
        .filter(|i| i.flavor.trim() == "Savory")
        .collect();

    assert_eq!(store.filter("All Categories", "Savory"), expected);
    assert_eq!(names(&expected), vec!["A", "C", "D"]);
}

#[test]
fn flavors_for_is_stable_between_loads() {
    let store = MenuStore::default();
    load(&store, THREE_ITEMS);

    assert_eq!(store.flavors_for("Beverage"), store.flavors_for("Beverage"));
    assert!(store.flavors_for("Nope").is_empty());
}

#[test]
fn blank_names_never_surface() {
    let store = MenuStore::default();
    load(
        &store,
        "Name,Category,Flavor\n   ,Food,Savory\nPizza,Food,Savory\n\"\",Food,Spicy\n",
    );

    assert_eq!(names(&store.filter("", "")), vec!["Pizza"]);
    assert_eq!(store.flavors_for("Food"), vec!["Savory"]);
    assert!(store.all_items().iter().all(|i| !i.name.trim().is_empty()));
}

#[test]
fn reload_replaces_everything() {
    let store = MenuStore::default();
    load(&store, THREE_ITEMS);
    load(&store, "Name,Category,Flavor\nSoup,Starters,Warm\n");

    assert_eq!(store.categories(), vec!["All Categories", "Starters"]);
    assert!(store.flavors_for("Beverage").is_empty());
    assert_eq!(names(&store.filter("", "")), vec!["Soup"]);
}

#[test]
fn normalizer_accepts_hand_built_rows() {
    let rows: Vec<RawRow> = vec![
        [(" Name", " Latte "), ("Category ", "Beverage"), ("Flavor", "Creamy")]
            .into_iter()
            .collect(),
    ];
    let normalized = menu_recommender::normalize(&rows, &FieldRules::default());

    assert_eq!(normalized.items, vec![MenuItem::new("Latte", "Beverage", "Creamy")]);
}
