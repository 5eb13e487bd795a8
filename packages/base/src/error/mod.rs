pub mod market;
pub mod mint;
pub mod oracle;
pub mod treasury;
