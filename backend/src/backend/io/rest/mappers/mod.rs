pub mod entry_mapper;
pub mod girl_mapper;

pub use entry_mapper::EntryMapper;
pub use girl_mapper::GirlMapper;
