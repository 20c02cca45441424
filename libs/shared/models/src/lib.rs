pub mod actor;
pub mod error;

pub use actor::CurrentActor;
pub use error::AppError;
