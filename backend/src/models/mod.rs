mod cart;
mod product;

pub use cart::*;
pub use product::*;
