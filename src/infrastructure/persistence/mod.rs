mod pg_pool;
mod pg_preference_repository;

pub use pg_pool::create_pool;
pub use pg_preference_repository::PgPreferenceRepository;
