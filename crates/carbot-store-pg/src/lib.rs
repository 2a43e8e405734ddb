//! Carbot — PostgreSQL-backed prompt repository.
//!
//! The relational alternative to the JSON file store, for deployments
//! where several processes read the same prompt data. Schema lives in
//! the workspace `migrations/` directory.

pub mod pg_prompt_repository;

pub use pg_prompt_repository::PgPromptRepository;
