// Program state driven by the UI: one record source and one sheet.

use crate::api::RecordSource;
use crate::article::Article;
use crate::error::SheetError;
use crate::pmid::Pmid;
use crate::sheet::ArticleSheet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct Session<S> {
    source: S,
    sheet: ArticleSheet,
}

impl<S: RecordSource> Session<S> {
    pub fn new(source: S, sheet: ArticleSheet) -> Self {
        Session { source, sheet }
    }

    /// Fetch and normalise a record. Lookup failures never escape: they end
    /// up as notes on the returned article.
    pub fn lookup(&self, pmid: Pmid) -> Article {
        let lookup = self.source.fetch_citation(pmid);
        match &lookup {
            Ok(Some(_)) => info!(%pmid, "article found"),
            Ok(None) => warn!(%pmid, "article not found"),
            Err(e) => warn!(%pmid, error = %e, "lookup failed"),
        }
        Article::from_lookup(pmid, lookup)
    }

    /// Add a confirmed article; returns its row.
    pub fn accept(&mut self, article: Article) -> u32 {
        self.sheet.insert(article)
    }

    pub fn save_in(&mut self, dir: &Path) -> Result<PathBuf, SheetError> {
        self.sheet.save_in(dir)
    }

    pub fn article_count(&self) -> usize {
        self.sheet.len()
    }

    pub fn sheet_name(&self) -> &str {
        self.sheet.name()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.sheet.has_unsaved_changes()
    }

    pub fn unsaved_count(&self) -> usize {
        self.sheet.unsaved_count()
    }

    pub fn sheet(&self) -> &ArticleSheet {
        &self.sheet
    }
}
