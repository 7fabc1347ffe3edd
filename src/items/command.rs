pub mod add_item_cmd;
pub mod get_item_cmd;
