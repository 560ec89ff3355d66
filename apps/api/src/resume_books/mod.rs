// Resume books: time-windowed collections of member resumes shared with
// sponsor companies. Members submit once per book and may edit until it closes.

pub mod format;
pub mod handlers;
pub mod queries;
pub mod selection;
pub mod status;
pub mod upload;
pub mod validation;
pub mod view;
