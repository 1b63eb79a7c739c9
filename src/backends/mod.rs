//! Codec adapters, one per third-party backend.

#[cfg(feature = "calamine")]
pub mod calamine;
#[cfg(feature = "csv")]
pub mod csv;
#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "umya")]
pub mod xlsx;

#[cfg(feature = "calamine")]
pub use calamine::CalamineCodec;
#[cfg(feature = "csv")]
pub use csv::CsvCodec;
#[cfg(feature = "json")]
pub use json::JsonCodec;
#[cfg(feature = "umya")]
pub use xlsx::XlsxCodec;
