pub mod collaborators;
pub mod logging;
pub mod print;
pub mod promo;
pub mod report;
pub mod storage;
pub mod workspace;
