//! Domain-level command types.
//! These are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs from the
//! `shared` crate onto them.

pub mod girl {
    /// Input for creating a new girl.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateGirlCommand {
        pub name: String,
        pub age: u32,
        pub nationality: Option<String>,
        pub ethnicity: Option<String>,
        pub hair_color: Option<String>,
        pub rating: f64,
    }

    /// Full-field replacement of a girl's editable attributes.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UpdateGirlCommand {
        pub name: String,
        pub age: u32,
        pub nationality: Option<String>,
        pub ethnicity: Option<String>,
        pub hair_color: Option<String>,
        pub rating: f64,
    }
}

pub mod entry {
    /// Input for creating a new entry. `date` is YYYY-MM-DD.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateEntryCommand {
        pub girl_id: String,
        pub date: String,
        pub amount_spent: f64,
        pub duration_minutes: u32,
        pub number_of_nuts: u32,
    }

    /// Full-field replacement of an entry.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UpdateEntryCommand {
        pub girl_id: String,
        pub date: String,
        pub amount_spent: f64,
        pub duration_minutes: u32,
        pub number_of_nuts: u32,
    }
}

pub mod data {
    use shared::ExportFormat;

    /// What to include in an export.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ExportOptions {
        pub format: ExportFormat,
        pub include_girls: bool,
        pub include_entries: bool,
        pub include_metrics: bool,
    }

    /// A rendered export ready to be saved by the caller.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ExportedFile {
        pub filename: String,
        pub mime_type: String,
        pub content: String,
    }

    /// Result of wiping all stored data.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeletedData {
        pub girls: usize,
        pub entries: usize,
    }
}
