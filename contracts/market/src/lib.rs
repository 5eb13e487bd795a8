pub mod contract;
pub mod swap;

#[cfg(test)]
mod multitest;
