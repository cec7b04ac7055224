pub mod category;
pub mod location;
pub mod report;
pub mod subscription;
pub mod user;
