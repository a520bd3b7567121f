pub mod data;
pub mod repository;

pub use data::{FlaskSize, Order, OrderStatus, OrderType, Strategy};
pub use repository::{load_orders, parse_orders};
