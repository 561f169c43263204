pub mod card_list;
pub mod header;
pub mod help_overlay;
pub mod log_panel;
