pub mod database;
pub mod product;
pub mod user;

pub use product::PostgresProductRepository;
pub use product::SqliteProductRepository;
pub use user::PostgresUserRepository;
pub use user::SqliteUserRepository;
