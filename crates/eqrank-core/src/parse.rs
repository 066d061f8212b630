//! Structured sentence parses returned by the NLP service.
//!
//! The layout follows the CoreNLP JSON-RPC wrapper: a list of sentences, each
//! with tagged words and dependency triples. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Full parse of one problem text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl ParseResult {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Index of the question sentence: the last one ending in `?`, else the last one.
    pub fn question_index(&self) -> Option<usize> {
        self.sentences
            .iter()
            .rposition(|s| s.is_question())
            .or_else(|| self.sentences.len().checked_sub(1))
    }
}

/// One parsed sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub parsetree: String,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Sentence {
    /// Builds a sentence from tagged words, joining them as its text.
    pub fn from_words(words: Vec<Word>) -> Self {
        let text = words
            .iter()
            .map(|w| w.text())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            parsetree: String::new(),
            words,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn is_question(&self) -> bool {
        self.words.last().is_some_and(|w| w.text() == "?") || self.text.trim_end().ends_with('?')
    }

    /// Lowercased lemmas of all words.
    pub fn lemmas(&self) -> Vec<String> {
        self.words.iter().map(Word::lemma).collect()
    }

    /// Lowercased lemmas within `radius` tokens of `token`, the token itself excluded.
    pub fn window(&self, token: usize, radius: usize) -> Vec<String> {
        let start = token.saturating_sub(radius);
        let end = (token + radius + 1).min(self.words.len());
        (start..end)
            .filter(|i| *i != token)
            .map(|i| self.words[i].lemma())
            .collect()
    }

    /// Dependencies in which the word at `token` takes part.
    pub fn dependencies_of(&self, token: usize) -> impl Iterator<Item = &Dependency> {
        let word = self.words.get(token).map(|w| w.text().to_string());
        self.dependencies
            .iter()
            .filter(move |d| word.as_deref().is_some_and(|w| d.governor() == w || d.dependent() == w))
    }
}

/// A token with its tags, serialized as `[text, {attributes}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word(pub String, pub WordAttributes);

impl Word {
    pub fn new(text: impl Into<String>, pos: impl Into<String>) -> Self {
        Word(
            text.into(),
            WordAttributes {
                pos: pos.into(),
                ..WordAttributes::default()
            },
        )
    }

    pub fn with_ner(mut self, ner: impl Into<String>) -> Self {
        self.1.ner = ner.into();
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.1.lemma = lemma.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn pos(&self) -> &str {
        &self.1.pos
    }

    pub fn ner(&self) -> &str {
        &self.1.ner
    }

    /// Lowercased lemma, falling back to the word itself.
    pub fn lemma(&self) -> String {
        if self.1.lemma.is_empty() {
            self.0.to_lowercase()
        } else {
            self.1.lemma.to_lowercase()
        }
    }

    /// Cardinal number tag.
    pub fn is_number(&self) -> bool {
        self.pos() == "CD"
    }

    pub fn is_noun(&self) -> bool {
        self.pos().starts_with("NN")
    }
}

/// Tags attached to a word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordAttributes {
    #[serde(rename = "PartOfSpeech", default)]
    pub pos: String,
    #[serde(rename = "NamedEntityTag", default)]
    pub ner: String,
    #[serde(rename = "Lemma", default)]
    pub lemma: String,
}

/// A `(relation, governor, dependent)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency(pub String, pub String, pub String);

impl Dependency {
    pub fn relation(&self) -> &str {
        &self.0
    }

    pub fn governor(&self) -> &str {
        &self.1
    }

    pub fn dependent(&self) -> &str {
        &self.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_corenlp_layout() {
        let json = r#"{
            "sentences": [{
                "text": "John has 5 apples .",
                "parsetree": "(ROOT ...)",
                "dependencies": [["nsubj", "has", "John"], ["num", "apples", "5"]],
                "words": [
                    ["John", {"PartOfSpeech": "NNP", "NamedEntityTag": "PERSON", "Lemma": "John"}],
                    ["has", {"PartOfSpeech": "VBZ", "Lemma": "have"}],
                    ["5", {"PartOfSpeech": "CD", "NamedEntityTag": "NUMBER", "CharacterOffsetBegin": "9"}],
                    ["apples", {"PartOfSpeech": "NNS", "Lemma": "apple"}],
                    [".", {"PartOfSpeech": "."}]
                ]
            }],
            "coref": []
        }"#;
        let parse: ParseResult = serde_json::from_str(json).unwrap();
        let sentence = parse.sentence(0).unwrap();
        assert_eq!(sentence.words.len(), 5);
        assert!(sentence.words[2].is_number());
        assert_eq!(sentence.words[1].lemma(), "have");
        assert_eq!(sentence.words[2].lemma(), "5");
        assert_eq!(sentence.dependencies_of(2).count(), 1);
        assert_eq!(sentence.window(2, 1), vec!["have", "apple"]);
    }

    #[test]
    fn test_question_index() {
        let statement = Sentence::from_words(vec![Word::new("Tom", "NNP"), Word::new(".", ".")]);
        let question = Sentence::from_words(vec![Word::new("How", "WRB"), Word::new("?", ".")]);
        let parse = ParseResult::new(vec![statement.clone(), question, statement]);
        assert_eq!(parse.question_index(), Some(1));
        assert_eq!(ParseResult::default().question_index(), None);
    }
}
