pub mod body;
pub mod collision;
pub mod grid;
pub mod intent;
pub mod rect;
pub mod tile;
