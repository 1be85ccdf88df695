pub mod apply;
pub mod role;
pub mod tenant;
