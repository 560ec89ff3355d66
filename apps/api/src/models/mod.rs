pub mod member;
pub mod resume_book;
