pub mod categories;
pub mod order_items;
pub mod order_status_changes;
pub mod orders;
pub mod products;
pub mod restaurant_tables;
pub mod settings;
pub mod users;

pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use order_status_changes::Entity as OrderStatusChanges;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use restaurant_tables::Entity as RestaurantTables;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
