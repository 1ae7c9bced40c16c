// Normalised article: the row-ready form of a lookup. Every field is filled,
// either from the citation or with a placeholder, and every substitution is
// recorded as a note in the error summary.

use crate::error::FetchError;
use crate::pmid::Pmid;
use crate::record::{Citation, CitationAuthor};
use std::fmt;

/// Prefix of the PubMed search link stored with each article.
pub const LINK_BASE: &str = "https://www.ncbi.nlm.nih.gov/pubmed/?term=";

/// Values written in place of missing fields.
pub mod placeholder {
    pub const TITLE: &str = "TITLE";
    pub const AUTHORS: &str = "AUTHORS";
    pub const LAST_NAME: &str = "LAST";
    pub const INITIALS: &str = "FIRST";
    pub const JOURNAL: &str = "JOURN";
    pub const LANGUAGE: &str = "LANG";
    pub const ABSTRACT: &str = "ABSTRACT";
    pub const LINK: &str = "URL";
    /// Year written when the record carries no `PubDate/Year`.
    pub const YEAR: i32 = 0;
}

/// Notes collected into the error summary.
pub mod note {
    pub const NOT_FOUND: &str = "Article may not have been found ... Review Carefully";
    pub const TITLE: &str = "Title not found";
    pub const AUTHORS: &str = "Authors not found";
    pub const NON_NUMERIC_DATE: &str = "Non numeric date";
    pub const DATE: &str = "Date not found";
    pub const JOURNAL: &str = "Journal not found";
    pub const LANGUAGE: &str = "Language not found";
    pub const ABSTRACT: &str = "Abstract not found";
    pub const NONE: &str = "No errors";
}

/// Publication year as it ends up in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubYear {
    Numeric(i32),
    /// Year text that did not parse as an integer, kept verbatim.
    Raw(String),
    /// No year in the record; rendered as [`placeholder::YEAR`].
    Missing,
}

impl fmt::Display for PubYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(year) => write!(f, "{year}"),
            Self::Raw(raw) => f.write_str(raw),
            Self::Missing => write!(f, "{}", placeholder::YEAR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub pmid: Pmid,
    pub title: String,
    pub authors: String,
    pub year: PubYear,
    pub journal: String,
    pub language: String,
    pub abstract_text: String,
    pub link: String,
    /// Comma-separated notes, or [`note::NONE`].
    pub errors: String,
}

impl Article {
    /// Build from the result of a lookup. A failed lookup is treated as a
    /// missing article, with the failure reason as the first note.
    pub fn from_lookup(pmid: Pmid, lookup: Result<Option<Citation>, FetchError>) -> Self {
        match lookup {
            Ok(citation) => Self::build(pmid, citation, Vec::new()),
            Err(e) => Self::build(pmid, None, vec![format!("Lookup failed: {e}")]),
        }
    }

    /// Build from a parsed citation; `None` means the PMID was not found.
    pub fn from_citation(pmid: Pmid, citation: Option<Citation>) -> Self {
        Self::build(pmid, citation, Vec::new())
    }

    fn build(pmid: Pmid, citation: Option<Citation>, mut notes: Vec<String>) -> Self {
        let Some(citation) = citation else {
            notes.push(note::NOT_FOUND.to_string());
            return Self {
                pmid,
                title: placeholder::TITLE.to_string(),
                authors: placeholder::AUTHORS.to_string(),
                year: PubYear::Missing,
                journal: placeholder::JOURNAL.to_string(),
                language: placeholder::LANGUAGE.to_string(),
                abstract_text: placeholder::ABSTRACT.to_string(),
                link: placeholder::LINK.to_string(),
                errors: summarize(&notes),
            };
        };

        let title = or_note(citation.title, placeholder::TITLE, note::TITLE, &mut notes);
        let authors = or_note(
            citation.authors.as_deref().map(join_authors),
            placeholder::AUTHORS,
            note::AUTHORS,
            &mut notes,
        );
        let year = match citation.year {
            Some(raw) => parse_year(raw, &mut notes),
            None => {
                notes.push(note::DATE.to_string());
                PubYear::Missing
            }
        };
        let journal = or_note(citation.journal, placeholder::JOURNAL, note::JOURNAL, &mut notes);
        let language = or_note(citation.language, placeholder::LANGUAGE, note::LANGUAGE, &mut notes);
        let abstract_text = or_note(
            citation.abstract_text,
            placeholder::ABSTRACT,
            note::ABSTRACT,
            &mut notes,
        );

        Self {
            pmid,
            title,
            authors,
            year,
            journal,
            language,
            abstract_text,
            link: format!("{LINK_BASE}{pmid}"),
            errors: summarize(&notes),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors != note::NONE
    }
}

fn or_note(value: Option<String>, default: &str, missing: &str, notes: &mut Vec<String>) -> String {
    value.unwrap_or_else(|| {
        notes.push(missing.to_string());
        default.to_string()
    })
}

fn parse_year(raw: String, notes: &mut Vec<String>) -> PubYear {
    match raw.trim().parse::<i32>() {
        Ok(year) => PubYear::Numeric(year),
        Err(_) => {
            notes.push(note::NON_NUMERIC_DATE.to_string());
            PubYear::Raw(raw)
        }
    }
}

fn summarize(notes: &[String]) -> String {
    if notes.is_empty() {
        note::NONE.to_string()
    } else {
        notes.join(", ")
    }
}

/// Join authors as `"Last Initials"`, in input order, separated by `", "`.
pub fn join_authors(authors: &[CitationAuthor]) -> String {
    authors
        .iter()
        .map(|author| {
            format!(
                "{} {}",
                author.last_name.as_deref().unwrap_or(placeholder::LAST_NAME),
                author.initials.as_deref().unwrap_or(placeholder::INITIALS)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PMID: {}", self.pmid)?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author(s): {}", self.authors)?;
        writeln!(f, "Date: {}", self.year)?;
        writeln!(f, "Journal: {}", self.journal)?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Abstract: {}", self.abstract_text)?;
        writeln!(f, "Link: {}", self.link)?;
        write!(f, "Errors: {}", self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn pmid() -> Pmid {
        Pmid::new(30_049_270).unwrap()
    }

    fn complete() -> Citation {
        Citation {
            title: Some("A title".to_string()),
            authors: Some(vec![
                CitationAuthor::new("Smith", "JA"),
                CitationAuthor::new("Doe", "J"),
            ]),
            year: Some("2018".to_string()),
            journal: Some("BMC bioinformatics".to_string()),
            language: Some("eng".to_string()),
            abstract_text: Some("Abstract body.".to_string()),
        }
    }

    #[test]
    fn test_complete_citation() {
        let article = Article::from_citation(pmid(), Some(complete()));
        assert_eq!(
            article,
            Article {
                pmid: pmid(),
                title: "A title".to_string(),
                authors: "Smith JA, Doe J".to_string(),
                year: PubYear::Numeric(2018),
                journal: "BMC bioinformatics".to_string(),
                language: "eng".to_string(),
                abstract_text: "Abstract body.".to_string(),
                link: "https://www.ncbi.nlm.nih.gov/pubmed/?term=30049270".to_string(),
                errors: "No errors".to_string(),
            }
        );
        assert!(!article.has_errors());
    }

    #[test]
    fn test_not_found_uses_every_placeholder() {
        let article = Article::from_citation(pmid(), None);
        assert_eq!(article.title, "TITLE");
        assert_eq!(article.authors, "AUTHORS");
        assert_eq!(article.year, PubYear::Missing);
        assert_eq!(article.year.to_string(), "0");
        assert_eq!(article.journal, "JOURN");
        assert_eq!(article.language, "LANG");
        assert_eq!(article.abstract_text, "ABSTRACT");
        assert_eq!(article.link, "URL");
        // only the not-found note, no per-field notes
        assert_eq!(
            article.errors,
            "Article may not have been found ... Review Carefully"
        );
    }

    #[test]
    fn test_lookup_failure_is_reported_first() {
        let failure = FetchError::Status {
            status: 503,
            message: "busy".to_string(),
        };
        let article = Article::from_lookup(pmid(), Err(failure));
        assert_eq!(
            article.errors,
            "Lookup failed: Entrez returned 503: busy, \
             Article may not have been found ... Review Carefully"
        );
        assert_eq!(article.link, "URL");
    }

    #[test]
    fn test_all_fields_missing_notes_in_order() {
        let article = Article::from_citation(pmid(), Some(Citation::default()));
        assert_eq!(
            article.errors,
            "Title not found, Authors not found, Date not found, Journal not found, \
             Language not found, Abstract not found"
        );
        assert_eq!(article.link, "https://www.ncbi.nlm.nih.gov/pubmed/?term=30049270");
    }

    #[rstest]
    #[case("2018", PubYear::Numeric(2018), "No errors")]
    #[case(" 1999 ", PubYear::Numeric(1999), "No errors")]
    #[case("2018-2019", PubYear::Raw("2018-2019".to_string()), "Non numeric date")]
    #[case("Spring", PubYear::Raw("Spring".to_string()), "Non numeric date")]
    fn test_year(#[case] raw: &str, #[case] expected: PubYear, #[case] errors: &str) {
        let citation = Citation {
            year: Some(raw.to_string()),
            ..complete()
        };
        let article = Article::from_citation(pmid(), Some(citation));
        assert_eq!(article.year, expected);
        assert_eq!(article.errors, errors);
    }

    #[test]
    fn test_single_missing_field() {
        let citation = Citation {
            language: None,
            ..complete()
        };
        let article = Article::from_citation(pmid(), Some(citation));
        assert_eq!(article.language, "LANG");
        assert_eq!(article.errors, "Language not found");
    }

    #[rstest]
    #[case(vec![], "")]
    #[case(vec![CitationAuthor::new("Smith", "J")], "Smith J")]
    #[case(
        vec![
            CitationAuthor::new("Zhang", "Y"),
            CitationAuthor { last_name: Some("Alber".to_string()), initials: None },
            CitationAuthor { last_name: None, initials: Some("DA".to_string()) },
            CitationAuthor::default(),
        ],
        "Zhang Y, Alber FIRST, LAST DA, LAST FIRST"
    )]
    fn test_join_authors(#[case] authors: Vec<CitationAuthor>, #[case] expected: &str) {
        assert_eq!(join_authors(&authors), expected);
    }

    #[test]
    fn test_preview() {
        let article = Article::from_citation(pmid(), Some(complete()));
        let preview = article.to_string();
        assert!(preview.starts_with("PMID: 30049270\nTitle: A title\n"));
        assert!(preview.contains("Author(s): Smith JA, Doe J\n"));
        assert!(preview.ends_with("Errors: No errors"));
    }
}
