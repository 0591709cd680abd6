pub mod connection;
pub mod entry_repository;
pub mod girl_repository;

pub use connection::CsvConnection;
pub use entry_repository::EntryRepository;
pub use girl_repository::GirlRepository;
