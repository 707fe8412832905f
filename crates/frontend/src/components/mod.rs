pub mod help_overlay;
pub mod map_view;
pub mod result_grid;
pub mod scanner;
pub mod search_box;
pub mod sidebar;
