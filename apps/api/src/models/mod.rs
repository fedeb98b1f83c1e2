pub mod ai_record;
pub mod student;
pub mod ticket;
