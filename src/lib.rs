// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `pmid`: PMID newtype and validation of what the user types.
// - `record`: parsing of Entrez efetch XML into a raw `Citation`.
// - `article`: normalisation into a row-ready `Article`, with placeholders
//   and error notes for anything missing.
// - `api`: the blocking Entrez client behind the `RecordSource` trait.
// - `sheet`: the in-memory spreadsheet and its xlsx output.
// - `session`: state shared by the UI commands.
// - `ui`: prompts and the command loop.
// - `config` / `error`: runtime settings, saved profile and error types.
//
// Everything except `ui` is free of terminal I/O, so it can be tested with
// canned records instead of the network.
pub mod api;
pub mod article;
pub mod config;
pub mod error;
pub mod pmid;
pub mod record;
pub mod session;
pub mod sheet;
pub mod ui;

pub use api::{EntrezClient, RecordSource};
pub use article::{Article, PubYear};
pub use pmid::{Pmid, PmidInput};
pub use record::{Citation, CitationAuthor};
pub use session::Session;
pub use sheet::ArticleSheet;
