pub mod audit_logs;
pub mod cart_items;
pub mod order_items;
pub mod orders;
pub mod product_categories;
pub mod products;
pub mod promo_codes;
pub mod sav_tickets;
pub mod service_categories;
pub mod services;
pub mod suggestions;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_categories::Entity as ProductCategories;
pub use products::Entity as Products;
pub use promo_codes::Entity as PromoCodes;
pub use sav_tickets::Entity as SavTickets;
pub use service_categories::Entity as ServiceCategories;
pub use services::Entity as Services;
pub use suggestions::Entity as Suggestions;
pub use users::Entity as Users;
