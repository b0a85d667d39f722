pub mod memory_post_repository;
pub mod post_repository;
