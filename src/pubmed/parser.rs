//! EFetch XML parser
//!
//! Walks a `PubmedArticleSet` document with a streaming quick-xml reader and
//! produces one [`RawArticleRecord`] per `PubmedArticle`. Only the fields the
//! affiliation report needs are read: PMID, title, publication year, author
//! names and author affiliations.
//!
//! A `PubmedArticle` without a PMID is skipped with a warning. A document that
//! is not well-formed XML, or has no `PubmedArticleSet` element, fails as a
//! whole.

use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::{PaperFetchError, Result};
use crate::pubmed::models::{
    Author, MISSING_TITLE, MISSING_YEAR, RawArticleRecord, UNKNOWN_AUTHOR,
};

/// Parse every `PubmedArticle` in an EFetch response
///
/// # Example
///
/// ```
/// use pubmed_paper_fetcher::pubmed::parse_articles_from_xml;
///
/// let xml = r#"<PubmedArticleSet>
///   <PubmedArticle>
///     <MedlineCitation>
///       <PMID>12345678</PMID>
///       <Article><ArticleTitle>Example</ArticleTitle></Article>
///     </MedlineCitation>
///   </PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let records = parse_articles_from_xml(xml).unwrap();
/// assert_eq!(records[0].pmid, "12345678");
/// assert_eq!(records[0].publication_year, "Unknown");
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles_from_xml(xml: &str) -> Result<Vec<RawArticleRecord>> {
    let cleaned_xml = strip_inline_markup(xml);

    let mut reader = Reader::from_reader(cleaned_xml.as_bytes());
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut saw_article_set = false;
    let mut buf = Vec::new();

    let mut current: Option<ArticleBuilder> = None;
    let mut author: Option<AuthorBuilder> = None;

    let mut in_pmid = false;
    let mut in_title = false;
    let mut in_pub_date = false;
    let mut in_year = false;
    let mut in_medline_date = false;
    let mut in_author_list = false;
    let mut in_last_name = false;
    let mut in_fore_name = false;
    let mut in_initials = false;
    let mut in_collective_name = false;
    let mut in_affiliation = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"PubmedArticleSet" => {
                saw_article_set = true;
            }
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticleSet" => saw_article_set = true,
                b"PubmedArticle" => current = Some(ArticleBuilder::default()),
                b"PMID" if current.as_ref().is_some_and(|a| a.pmid.is_none()) => in_pmid = true,
                b"ArticleTitle" if current.is_some() => in_title = true,
                b"PubDate" if current.is_some() => in_pub_date = true,
                b"Year" if in_pub_date => in_year = true,
                b"MedlineDate" if in_pub_date => in_medline_date = true,
                b"AuthorList" if current.is_some() => in_author_list = true,
                b"Author" if in_author_list => author = Some(AuthorBuilder::default()),
                b"LastName" if author.is_some() => in_last_name = true,
                b"ForeName" if author.is_some() => in_fore_name = true,
                b"Initials" if author.is_some() => in_initials = true,
                b"CollectiveName" if author.is_some() => in_collective_name = true,
                b"Affiliation" if author.is_some() => {
                    in_affiliation = true;
                    if let Some(a) = author.as_mut() {
                        a.affiliations.push(String::new());
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    if let Some(article) = current.take() {
                        match article.build() {
                            Some(record) => records.push(record),
                            None => {
                                skipped += 1;
                                warn!("Skipping PubmedArticle without a PMID");
                            }
                        }
                    }
                    in_author_list = false;
                    author = None;
                }
                b"PMID" => in_pmid = false,
                b"ArticleTitle" => in_title = false,
                b"PubDate" => in_pub_date = false,
                b"Year" => in_year = false,
                b"MedlineDate" => in_medline_date = false,
                b"AuthorList" => in_author_list = false,
                b"Author" => {
                    if let (Some(finished), Some(article)) = (author.take(), current.as_mut()) {
                        article.authors.push(finished.build());
                    }
                }
                b"LastName" => in_last_name = false,
                b"ForeName" => in_fore_name = false,
                b"Initials" => in_initials = false,
                b"CollectiveName" => in_collective_name = false,
                b"Affiliation" => in_affiliation = false,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| PaperFetchError::XmlParseError {
                        message: format!("Failed to decode XML text: {}", err),
                    })?
                    .into_owned();
                push_text(
                    &text,
                    &mut current,
                    &mut author,
                    TextTarget {
                        pmid: in_pmid,
                        title: in_title,
                        year: in_year,
                        medline_date: in_medline_date,
                        last_name: in_last_name,
                        fore_name: in_fore_name,
                        initials: in_initials,
                        collective_name: in_collective_name,
                        affiliation: in_affiliation,
                    },
                );
            }
            Ok(Event::CData(e)) if in_title => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if let Some(article) = current.as_mut() {
                    append(&mut article.title, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PaperFetchError::XmlParseError {
                    message: format!(
                        "XML parsing error at position {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_article_set {
        return Err(PaperFetchError::XmlParseError {
            message: "Response is not a PubmedArticleSet document".to_string(),
        });
    }

    debug!(
        parsed = records.len(),
        skipped = skipped,
        "Completed EFetch XML parsing"
    );

    Ok(records)
}

/// Which element the reader is currently inside
#[derive(Clone, Copy)]
struct TextTarget {
    pmid: bool,
    title: bool,
    year: bool,
    medline_date: bool,
    last_name: bool,
    fore_name: bool,
    initials: bool,
    collective_name: bool,
    affiliation: bool,
}

fn push_text(
    text: &str,
    current: &mut Option<ArticleBuilder>,
    author: &mut Option<AuthorBuilder>,
    target: TextTarget,
) {
    if let Some(a) = author.as_mut() {
        if target.affiliation {
            if let Some(last) = a.affiliations.last_mut() {
                append(last, text);
            }
            return;
        }
        if target.last_name {
            append(&mut a.last_name, text);
            return;
        }
        if target.fore_name {
            append(&mut a.fore_name, text);
            return;
        }
        if target.initials {
            append(&mut a.initials, text);
            return;
        }
        if target.collective_name {
            append(&mut a.collective_name, text);
            return;
        }
    }

    let Some(article) = current.as_mut() else {
        return;
    };

    if target.pmid {
        article.pmid = Some(text.trim().to_string());
    } else if target.title {
        append(&mut article.title, text);
    } else if target.year {
        article.year = Some(text.trim().to_string());
    } else if target.medline_date {
        append(&mut article.medline_date, text);
    }
}

fn append(dest: &mut String, text: &str) {
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text.trim());
}

#[derive(Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: String,
    year: Option<String>,
    medline_date: String,
    authors: Vec<Author>,
}

impl ArticleBuilder {
    /// `None` when the record has no usable PMID
    fn build(self) -> Option<RawArticleRecord> {
        let pmid = self.pmid.filter(|p| !p.is_empty())?;

        let title = if self.title.trim().is_empty() {
            MISSING_TITLE.to_string()
        } else {
            self.title.trim().to_string()
        };

        let publication_year = self
            .year
            .filter(|y| !y.is_empty())
            .or_else(|| medline_year(&self.medline_date))
            .unwrap_or_else(|| MISSING_YEAR.to_string());

        Some(RawArticleRecord {
            pmid,
            title,
            publication_year,
            authors: self.authors,
        })
    }
}

#[derive(Default)]
struct AuthorBuilder {
    last_name: String,
    fore_name: String,
    initials: String,
    collective_name: String,
    affiliations: Vec<String>,
}

impl AuthorBuilder {
    fn build(self) -> Author {
        let full_name = format_author_name(
            &self.last_name,
            &self.fore_name,
            &self.initials,
            &self.collective_name,
        );
        let affiliations = self
            .affiliations
            .into_iter()
            .filter(|a| !a.is_empty())
            .collect();

        Author::new(full_name, affiliations)
    }
}

/// Leading four-digit year of a free-form `MedlineDate` such as "1998 Dec-1999 Jan"
fn medline_year(medline_date: &str) -> Option<String> {
    let year = medline_date.trim().get(..4)?;
    if year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}

/// Format an author name from components
fn format_author_name(last_name: &str, fore_name: &str, initials: &str, collective: &str) -> String {
    match (fore_name.is_empty(), last_name.is_empty()) {
        (false, false) => format!("{} {}", fore_name, last_name),
        (true, false) if !initials.is_empty() => format!("{} {}", initials, last_name),
        (true, false) => last_name.to_string(),
        (false, true) => fore_name.to_string(),
        (true, true) if !collective.is_empty() => collective.to_string(),
        (true, true) => UNKNOWN_AUTHOR.to_string(),
    }
}

/// Strip inline formatting tags like `<i>`, `<sup>` or `<b>`
///
/// These split titles and affiliations into several text events.
fn strip_inline_markup(xml: &str) -> String {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold)>")
            .expect("inline tag regex is valid")
    });

    let cleaned = re.replace_all(xml, "");

    if cleaned.len() != xml.len() {
        debug!(
            "Stripped inline markup: {} bytes -> {} bytes",
            xml.len(),
            cleaned.len()
        );
    }

    cleaned.into_owned()
}
