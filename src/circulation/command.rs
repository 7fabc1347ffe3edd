pub mod cancel_hold_cmd;
pub mod checkout_items_cmd;
pub mod expire_holds_cmd;
pub mod place_hold_cmd;
pub mod renew_loan_cmd;
pub mod return_item_cmd;
