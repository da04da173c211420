//! Table naming.
//!
//! Entity names are PascalCase; tables are snake_case plurals
//! (`User` → `users`, `OrderItem` → `order_items`). Field names are already
//! snake_case and pass through unchanged.

/// Convert an entity name to its table name.
pub fn entity_to_table(entity_name: &str) -> String {
    let mut snake = String::with_capacity(entity_name.len() + 4);
    let mut prev_lower = false;

    for ch in entity_name.chars() {
        if ch.is_uppercase() {
            // Runs of capitals (acronyms) stay together.
            if prev_lower {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            snake.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }

    snake.push('s');
    snake
}
