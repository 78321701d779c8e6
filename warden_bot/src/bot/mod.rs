pub mod answers;
pub mod dto;
pub mod handler;
pub mod handler_tree;
