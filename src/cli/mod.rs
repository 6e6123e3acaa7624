//! Native CLI support for the gentype binary.

pub mod args;
pub mod catalog_file;
pub mod driver;
pub mod reporter;
pub mod type_expr;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/catalog_file_tests.rs"]
mod catalog_file_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
#[cfg(test)]
#[path = "tests/type_expr_tests.rs"]
mod type_expr_tests;
