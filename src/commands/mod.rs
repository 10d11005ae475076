pub mod extract;
pub mod labels;
pub mod status;
