mod category;
mod command;
mod generate;
mod pool;
mod replace;
mod selector;
pub mod sheet;
mod store;
mod types;

pub use category::*;
pub use command::*;
pub use generate::*;
pub use pool::*;
pub use replace::*;
pub use selector::*;
pub use store::*;
pub use types::*;
