pub mod assemble;
pub mod fx;
pub mod logo;
pub mod provider;
pub mod types;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod testutil;
