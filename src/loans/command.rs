pub mod get_loans_cmd;
pub mod get_overdue_cmd;
