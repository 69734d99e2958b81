pub mod error;
pub mod jikan;
pub mod traits;
pub mod translate;

pub use error::FetchError;
pub use jikan::{JikanClient, PAGE_SIZE};
pub use traits::{CatalogSource, PageFetch};
pub use translate::{GoogleWeb, MyMemory, ProviderChain, TranslationBackend};
