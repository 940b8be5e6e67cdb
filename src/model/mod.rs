mod category;
mod order_item;
mod product;

pub use category::CategoryModel;
pub use order_item::{OrderItemKey, OrderItemModel};
pub use product::{ProductId, ProductModel};
