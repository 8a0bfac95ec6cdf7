pub mod archive;
pub mod args;
pub mod convert;
pub mod load;
pub mod logs;
pub mod table;
pub mod wrangle;

#[cfg(test)]
mod tests;
