// User domain module
// Email value object and the form submission rule set

pub mod submission;
pub mod value_objects;

pub use submission::UserSubmission;
pub use value_objects::Email;
