pub mod get_summary_cmd;
pub mod get_transactions_cmd;
pub mod pay_fine_cmd;
pub mod waive_fine_cmd;
