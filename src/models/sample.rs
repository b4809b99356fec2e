use super::MenuItem;

/// Built-in demonstration menu, used when no menu file is available.
pub fn sample_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("Espresso", "Beverage", "Strong").with_description(
            "Concentrated coffee brewed by forcing hot water under pressure through finely ground coffee beans.",
        ),
        MenuItem::new("Cappuccino", "Beverage", "Sweet").with_description(
            "Coffee drink with steamed milk foam, typically containing equal parts of espresso, steamed milk, and milk foam.",
        ),
        MenuItem::new("Iced Tea", "Beverage", "Refreshing").with_description(
            "Chilled tea served with ice, sometimes with flavoring like lemon or peach.",
        ),
        MenuItem::new("Margherita Pizza", "Food", "Savory").with_description(
            "Classic pizza with tomato sauce, mozzarella cheese, and fresh basil.",
        ),
        MenuItem::new("Buffalo Wings", "Food", "Spicy").with_description(
            "Chicken wings coated in a spicy sauce, typically served with celery and blue cheese dressing.",
        ),
        MenuItem::new("Pasta Alfredo", "Food", "Creamy").with_description(
            "Fettuccine pasta tossed with a rich sauce made from butter, cream, and Parmesan cheese.",
        ),
    ]
}
