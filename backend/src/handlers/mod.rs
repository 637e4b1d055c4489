pub mod assignments;
pub mod companies;
pub mod jobs;
pub mod shifts;
pub mod timesheets;
pub mod users;

pub use assignments::*;
pub use companies::*;
pub use jobs::*;
pub use shifts::*;
pub use timesheets::*;
pub use users::*;
