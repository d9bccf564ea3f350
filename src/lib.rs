//! Client for reading and editing MediaWiki pages through the action API.
//!
//! Pages are fetched whole; their wikitext is split into sections that can be
//! read by position or by (unique) heading name and edited one at a time.
//!
//! ```no_run
//! # async fn demo() -> wikimate::Result<()> {
//! use wikimate::{ClientConfig, Wikimate};
//!
//! let wiki = Wikimate::from_config(&ClientConfig::for_api("https://wiki.example.org/w/api.php")?)?;
//! let mut page = wiki.get_page("Sausages").await?;
//! if let Some(meat) = page.section("Meat") {
//!     println!("{meat}");
//! }
//! page.set_section("Still tasty.\n", 0usize, Some("intro"), true).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod definitions;
pub mod errors;
pub mod file;
pub mod mediawiki_api;
pub mod page;
pub mod reqwest_client;
pub mod sections;

#[cfg(test)]
mod test_support;

pub use client::Wikimate;
pub use errors::{ErrorInfo, Result, WikiError};
pub use file::WikiFile;
pub use mediawiki_api::{Params, WikiApi};
pub use page::{PageState, WikiPage};
pub use reqwest_client::{ClientConfig, ClientConfigBuilder, HttpApi};
pub use sections::{KeyMode, Section, SectionIndex, SectionRef};
