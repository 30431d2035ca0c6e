pub mod event_popup;
pub mod match_tree;
