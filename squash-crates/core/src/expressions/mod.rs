//! Expression trees, partial constraints and the conditions which complete them.
mod arithmetic;
mod condition;
mod expression;
mod functions;
mod operator;
mod partial;
mod term;

pub use condition::*;
pub(crate) use expression::apply_operator;
pub(crate) use expression::Names;
pub use expression::Expression;
pub use expression::Node;
pub use functions::*;
pub use operator::Operator;
pub use partial::*;
pub use term::Term;
