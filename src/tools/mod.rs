//! Tools module containing tool abstractions and the finance tools

pub mod exchange_rate;
pub mod function_factory;
pub mod maps_link;
pub mod stock_index;
pub mod tool;

pub use exchange_rate::ExchangeRateTool;
pub use function_factory::FunctionFactory;
pub use maps_link::{hq_location_link, HqLocationTool};
pub use stock_index::{index_ticker, StockIndexTool};
pub use tool::{Tool, ToolRegistry};
