pub mod error;
pub mod expression;

pub use error::AstError;
pub use expression::Expr;
