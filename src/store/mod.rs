pub mod event_repo;
pub mod user_repo;

pub use event_repo::EventRepo;
pub use user_repo::UserRepo;
