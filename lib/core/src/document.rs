use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// A named piece of text: either the query or one candidate.
/// Empty text is allowed and stands for a failed or blank source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    name: String,
    text: String,
}

impl Document {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// A document whose text could not be obtained
    #[inline]
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The documents of one ranking request.
///
/// Index 0 is always the query, indices 1.. are the candidates in the
/// order the caller supplied them. A corpus is built per request and
/// never shared between requests.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Shorthand for `CorpusBuilder::new().query(..).candidates(..).build()`
    pub fn build(query: &str, candidates: &[Document]) -> Result<Self> {
        CorpusBuilder::new()
            .query(query)
            .candidates(candidates.iter().cloned())
            .build()
    }

    #[inline]
    pub fn query(&self) -> &Document {
        &self.documents[0]
    }

    #[inline]
    pub fn candidates(&self) -> &[Document] {
        &self.documents[1..]
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Texts in corpus order, query first
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(Document::text).collect()
    }

    pub fn candidate_names(&self) -> Vec<String> {
        self.candidates().iter().map(|d| d.name().to_string()).collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false: a built corpus holds at least the query and one candidate
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Assembles a [`Corpus`], validating the query and candidate list.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    query: Option<String>,
    candidates: Vec<Document>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, text: impl Into<String>) -> Self {
        self.query = Some(text.into());
        self
    }

    pub fn candidate(mut self, document: Document) -> Self {
        self.candidates.push(document);
        self
    }

    pub fn candidates(mut self, documents: impl IntoIterator<Item = Document>) -> Self {
        self.candidates.extend(documents);
        self
    }

    /// Fails with [`Error::NoCandidates`] before looking at the query, so an
    /// empty selection stays a silent no-op even when the query is blank too.
    pub fn build(self) -> Result<Corpus> {
        if self.candidates.is_empty() {
            return Err(Error::NoCandidates);
        }

        let query = self.query.unwrap_or_default();
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("query text is empty".to_string()));
        }

        let mut documents = Vec::with_capacity(self.candidates.len() + 1);
        documents.push(Document::new("query", query));
        documents.extend(self.candidates);

        Ok(Corpus { documents })
    }
}
