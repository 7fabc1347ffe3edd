pub mod add_patron_cmd;
pub mod get_patron_cmd;
pub mod update_patron_cmd;
