//! Embedded default product table.
//!
//! Ids share the detector's class-id namespace; id 0 (hand) is reserved and
//! intentionally absent. Weights are nominal unit weights in grams, prices
//! in currency minor units.

use super::Category;

pub(super) struct BuiltinProduct {
    pub id: u32,
    pub name: &'static str,
    pub category: Category,
    pub weight_g: f64,
    pub price: u32,
}

const fn entry(
    id: u32,
    name: &'static str,
    category: Category,
    weight_g: f64,
    price: u32,
) -> BuiltinProduct {
    BuiltinProduct {
        id,
        name,
        category,
        weight_g,
        price,
    }
}

pub(super) const BUILTIN_PRODUCTS: &[BuiltinProduct] = &[
    // Beverages (1-10)
    entry(1, "pulmuone_spring_water_500", Category::Beverage, 520.0, 1200),
    entry(2, "samdasoo_500", Category::Beverage, 520.0, 1000),
    entry(3, "evian_500", Category::Beverage, 530.0, 2500),
    entry(4, "coca_cola_350", Category::Beverage, 380.0, 1800),
    entry(5, "sprite_350", Category::Beverage, 380.0, 1800),
    entry(6, "fanta_orange_350", Category::Beverage, 385.0, 1800),
    entry(7, "pocari_sweat_500", Category::Beverage, 540.0, 2000),
    entry(8, "gatorade_600", Category::Beverage, 640.0, 2500),
    entry(9, "vita500", Category::Beverage, 130.0, 1200),
    entry(10, "hot6", Category::Beverage, 260.0, 1500),
    // Snacks (11-20)
    entry(11, "pepero_original", Category::Snack, 69.0, 1500),
    entry(12, "pepero_almond", Category::Snack, 72.0, 1700),
    entry(13, "choco_pie", Category::Snack, 39.0, 800),
    entry(14, "orion_pie", Category::Snack, 35.0, 700),
    entry(15, "honey_butter_chip", Category::Snack, 60.0, 2000),
    entry(16, "potato_chip_original", Category::Snack, 65.0, 1800),
    entry(17, "shrimp_chip", Category::Snack, 90.0, 1500),
    entry(18, "onion_ring", Category::Snack, 84.0, 1600),
    entry(19, "cheese_ball", Category::Snack, 70.0, 1400),
    entry(20, "pringles_original", Category::Snack, 53.0, 2500),
    // Chocolate and candy (21-25)
    entry(21, "snickers", Category::Candy, 52.0, 1500),
    entry(22, "twix", Category::Candy, 50.0, 1500),
    entry(23, "kitkat", Category::Candy, 45.0, 1200),
    entry(24, "m_and_m", Category::Candy, 45.0, 2000),
    entry(25, "ferrero_rocher", Category::Candy, 37.0, 2500),
    // Convenience food (26-35)
    entry(26, "chickenmayo_rice", Category::Food, 365.0, 3500),
    entry(27, "tuna_rice", Category::Food, 350.0, 3200),
    entry(28, "spam_rice", Category::Food, 380.0, 3800),
    entry(29, "egg_sandwich", Category::Food, 170.0, 2800),
    entry(30, "ham_sandwich", Category::Food, 180.0, 3200),
    entry(31, "tuna_sandwich", Category::Food, 175.0, 3500),
    entry(32, "cup_noodle_small", Category::Food, 65.0, 1200),
    entry(33, "cup_noodle_big", Category::Food, 110.0, 1800),
    entry(34, "instant_rice", Category::Food, 210.0, 2000),
    entry(35, "kimbap", Category::Food, 250.0, 2500),
    // Dairy (36-42)
    entry(36, "seoul_milk_200", Category::Dairy, 210.0, 1200),
    entry(37, "banana_milk", Category::Dairy, 245.0, 1500),
    entry(38, "strawberry_milk", Category::Dairy, 245.0, 1500),
    entry(39, "chocolate_milk", Category::Dairy, 250.0, 1500),
    entry(40, "yogurt_plain", Category::Dairy, 85.0, 1000),
    entry(41, "yogurt_strawberry", Category::Dairy, 90.0, 1200),
    entry(42, "cheese_slice_pack", Category::Dairy, 200.0, 3500),
    // Health (43-47)
    entry(43, "protein_bar", Category::Health, 50.0, 2500),
    entry(44, "energy_bar", Category::Health, 45.0, 2000),
    entry(45, "granola_bar", Category::Health, 40.0, 1800),
    entry(46, "vitamin_c", Category::Health, 35.0, 1500),
    entry(47, "multivitamin", Category::Health, 30.0, 2000),
    // Everything else (48-50)
    entry(48, "gum_pack", Category::Etc, 25.0, 1000),
    entry(49, "mint_candy", Category::Etc, 15.0, 800),
    entry(50, "wet_tissue", Category::Etc, 50.0, 1000),
];
