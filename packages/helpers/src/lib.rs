pub mod answer;
pub mod reply;
pub mod testing;
