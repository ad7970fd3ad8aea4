//! Rule metadata: issue categories and the chart compatibility table.

mod category;
mod compatibility;

pub use category::Category;
pub use compatibility::{
    KindRequirement, compatible_chart_types, is_compatible, requirement_for, requirement_text,
};
