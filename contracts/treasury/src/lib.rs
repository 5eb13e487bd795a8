pub mod contract;
pub mod policy;
