pub mod api;
pub mod events;
pub mod models;

/// Canonical listing categories. Items and swap preferences are constrained
/// to this set, and the recommendation prompts enumerate it verbatim.
pub const CATEGORIES: &[&str] = &[
    "Electronics",
    "Books",
    "Clothing & Accessories",
    "Home & Garden",
    "Sports Equipment",
    "Musical Instruments",
    "Outdoor Gear",
    "Toys & Games",
    "Other",
];
