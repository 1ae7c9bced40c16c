// End-to-end flow without a terminal or network: efetch XML served from
// memory, looked up through a session, accepted, and saved as xlsx.

use pretty_assertions::assert_eq;
use pubmed_sheet::error::FetchError;
use pubmed_sheet::record::parse_efetch;
use pubmed_sheet::{ArticleSheet, Citation, Pmid, PmidInput, PubYear, RecordSource, Session};
use std::collections::HashMap;

const RECORD_29_Y: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
 <PubmedArticle>
  <MedlineCitation Status="PubMed-not-MEDLINE" Owner="NLM">
   <PMID Version="1">29000001</PMID>
   <Article PubModel="Electronic">
    <Journal>
     <JournalIssue CitedMedium="Internet">
      <PubDate><Year>2017</Year><Month>Oct</Month></PubDate>
     </JournalIssue>
     <Title>Journal of Surgical Research</Title>
    </Journal>
    <ArticleTitle>Outcomes after trauma surgery.</ArticleTitle>
    <Abstract><AbstractText>We studied outcomes.</AbstractText></Abstract>
    <AuthorList CompleteYN="Y">
     <Author ValidYN="Y"><LastName>Alber</LastName><ForeName>Daniel</ForeName><Initials>D</Initials></Author>
     <Author ValidYN="Y"><LastName>Haider</LastName><ForeName>Adil H</ForeName><Initials>AH</Initials></Author>
    </AuthorList>
    <Language>eng</Language>
   </Article>
  </MedlineCitation>
 </PubmedArticle>
</PubmedArticleSet>"#;

const RECORD_NO_YEAR: &str = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
  <Article>
   <Journal><JournalIssue><PubDate><MedlineDate>2001 Winter</MedlineDate></PubDate></JournalIssue><Title>Old Journal</Title></Journal>
   <ArticleTitle>An older record</ArticleTitle>
   <Language>ger</Language>
  </Article>
</MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

const EMPTY_SET: &str = r#"<?xml version="1.0" ?><PubmedArticleSet></PubmedArticleSet>"#;

/// Serves stored efetch bodies by PMID through the real parser.
struct StoredResponses(HashMap<u32, &'static str>);

impl RecordSource for StoredResponses {
    fn fetch_citation(&self, pmid: Pmid) -> Result<Option<Citation>, FetchError> {
        parse_efetch(self.0.get(&pmid.get()).copied().unwrap_or(EMPTY_SET))
    }
}

fn session(name: &str) -> Session<StoredResponses> {
    let responses = HashMap::from([(29_000_001, RECORD_29_Y), (11_000_002, RECORD_NO_YEAR)]);
    Session::new(StoredResponses(responses), ArticleSheet::new(name).unwrap())
}

fn pmid(input: &str) -> Pmid {
    match PmidInput::parse(input).unwrap() {
        PmidInput::Id(pmid) => pmid,
        PmidInput::Done => panic!("expected a PMID"),
    }
}

#[test]
fn complete_record_has_no_errors() {
    let session = session("Complete");
    let article = session.lookup(pmid("29000001"));

    assert_eq!(article.title, "Outcomes after trauma surgery.");
    assert_eq!(article.authors, "Alber D, Haider AH");
    assert_eq!(article.year, PubYear::Numeric(2017));
    assert_eq!(article.journal, "Journal of Surgical Research");
    assert_eq!(article.language, "eng");
    assert_eq!(article.abstract_text, "We studied outcomes.");
    assert_eq!(article.link, "https://www.ncbi.nlm.nih.gov/pubmed/?term=29000001");
    assert_eq!(article.errors, "No errors");
}

#[test]
fn partial_record_gets_placeholders_and_notes() {
    let session = session("Partial");
    let article = session.lookup(pmid("11000002"));

    assert_eq!(article.authors, "AUTHORS");
    assert_eq!(article.year, PubYear::Missing);
    assert_eq!(article.abstract_text, "ABSTRACT");
    assert_eq!(
        article.errors,
        "Authors not found, Date not found, Abstract not found"
    );
}

#[test]
fn unknown_pmid_is_flagged_for_review() {
    let session = session("Unknown");
    let article = session.lookup(pmid("42"));
    assert_eq!(article.link, "URL");
    assert_eq!(
        article.errors,
        "Article may not have been found ... Review Carefully"
    );
}

#[test]
fn add_then_save() {
    let mut session = session("Workflow");
    let entries = ["29000001", "42", "11000002", "done"];

    let mut rows = Vec::new();
    for entry in entries {
        let pmid = match PmidInput::parse(entry).unwrap() {
            PmidInput::Done => break,
            PmidInput::Id(pmid) => pmid,
        };
        let article = session.lookup(pmid);
        // the user declines anything that needs review
        if !article.has_errors() || article.title != "TITLE" {
            rows.push(session.accept(article));
        }
    }

    assert_eq!(rows, vec![2, 3]);
    assert_eq!(session.article_count(), 2);
    assert!(session.has_unsaved_changes());

    let dir = tempfile::tempdir().unwrap();
    let path = session.save_in(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("Workflow.xlsx"));
    assert!(path.is_file());
    assert!(!session.has_unsaved_changes());

    // rows keep increasing after a save
    let again = session.lookup(pmid("29000001"));
    assert_eq!(session.accept(again), 4);
}
