// Parsing of Entrez `efetch` XML (db=pubmed, retmode=xml) into a raw
// `Citation`. Only the first `PubmedArticle` of a response is read; fields
// that are absent stay `None` so that `article` can substitute placeholders.

use crate::error::FetchError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Fields pulled out of `PubmedArticle/MedlineCitation/Article`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Citation {
    pub title: Option<String>,
    /// `None` when the record has no `AuthorList` at all.
    pub authors: Option<Vec<CitationAuthor>>,
    /// Raw `PubDate/Year` text, not yet checked for being numeric.
    pub year: Option<String>,
    pub journal: Option<String>,
    pub language: Option<String>,
    pub abstract_text: Option<String>,
}

/// One `Author` entry. Collective authors carry neither field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationAuthor {
    pub last_name: Option<String>,
    pub initials: Option<String>,
}

#[cfg(test)]
impl CitationAuthor {
    pub fn new(last_name: &str, initials: &str) -> Self {
        Self {
            last_name: Some(last_name.to_string()),
            initials: Some(initials.to_string()),
        }
    }
}

/// Parse an efetch response. `Ok(None)` means the response holds no
/// `PubmedArticle`, which is what Entrez returns for unknown PMIDs.
pub fn parse_efetch(xml: &str) -> Result<Option<Citation>, FetchError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = EfetchParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(parse_error)? {
            Event::Start(ref e) => parser.open(element_name(e)),
            Event::Empty(ref e) => {
                parser.open(element_name(e));
                parser.close();
            }
            Event::End(_) => parser.close(),
            Event::Text(ref e) => parser.text(&e.unescape().map_err(parse_error)?),
            Event::CData(e) => parser.text(&String::from_utf8_lossy(&e.into_inner())),
            Event::Eof => break,
            _ => {}
        }
        if parser.finished {
            break;
        }
        buf.clear();
    }

    Ok(parser.citation)
}

fn parse_error(e: impl std::fmt::Display) -> FetchError {
    FetchError::Parse(e.to_string())
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    LastName,
    Initials,
    Year,
    Journal,
    Language,
    Abstract,
}

enum Element {
    AuthorList,
    Author,
    Field(Field),
}

/// Classify an element by its path below `PubmedArticle/MedlineCitation/Article`.
fn classify(relative: &[&str]) -> Option<Element> {
    let element = match relative {
        ["ArticleTitle"] => Element::Field(Field::Title),
        ["AuthorList"] => Element::AuthorList,
        ["AuthorList", "Author"] => Element::Author,
        ["AuthorList", "Author", "LastName"] => Element::Field(Field::LastName),
        ["AuthorList", "Author", "Initials"] => Element::Field(Field::Initials),
        ["Journal", "JournalIssue", "PubDate", "Year"] => Element::Field(Field::Year),
        ["Journal", "Title"] => Element::Field(Field::Journal),
        ["Language"] => Element::Field(Field::Language),
        ["Abstract", "AbstractText"] => Element::Field(Field::Abstract),
        _ => return None,
    };
    Some(element)
}

fn article_relative(path: &[String]) -> Option<Vec<&str>> {
    let start = path.windows(3).position(|w| {
        w[0] == "PubmedArticle" && w[1] == "MedlineCitation" && w[2] == "Article"
    })?;
    Some(path[start + 3..].iter().map(String::as_str).collect())
}

struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct EfetchParser {
    path: Vec<String>,
    citation: Option<Citation>,
    capture: Option<Capture>,
    finished: bool,
}

impl EfetchParser {
    fn open(&mut self, name: String) {
        let is_article = name == "PubmedArticle";
        self.path.push(name);

        if is_article {
            self.citation.get_or_insert_with(Citation::default);
            return;
        }
        let Some(citation) = self.citation.as_mut() else {
            return;
        };
        let Some(element) = article_relative(&self.path).and_then(|rel| classify(&rel)) else {
            return;
        };

        match element {
            Element::AuthorList => {
                citation.authors.get_or_insert_with(Vec::new);
            }
            Element::Author => citation
                .authors
                .get_or_insert_with(Vec::new)
                .push(CitationAuthor::default()),
            // inline markup inside a captured field (<i>, <sup>) is flattened
            Element::Field(field) if self.capture.is_none() => {
                self.capture = Some(Capture {
                    field,
                    depth: self.path.len(),
                    text: String::new(),
                });
            }
            Element::Field(_) => {}
        }
    }

    fn close(&mut self) {
        if self
            .capture
            .as_ref()
            .is_some_and(|c| c.depth == self.path.len())
        {
            if let Some(capture) = self.capture.take() {
                self.store(capture);
            }
        }
        if self.path.pop().as_deref() == Some("PubmedArticle") && self.citation.is_some() {
            self.finished = true;
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn store(&mut self, capture: Capture) {
        let Some(citation) = self.citation.as_mut() else {
            return;
        };
        let value = capture.text.trim().to_string();
        let author = citation.authors.as_mut().and_then(|a| a.last_mut());

        match (capture.field, author) {
            (Field::Title, _) => set_first(&mut citation.title, value),
            (Field::Year, _) => set_first(&mut citation.year, value),
            (Field::Journal, _) => set_first(&mut citation.journal, value),
            (Field::Language, _) => set_first(&mut citation.language, value),
            (Field::Abstract, _) => set_first(&mut citation.abstract_text, value),
            (Field::LastName, Some(author)) => set_first(&mut author.last_name, value),
            (Field::Initials, Some(author)) => set_first(&mut author.initials, value),
            (Field::LastName | Field::Initials, None) => {}
        }
    }
}

fn set_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}
