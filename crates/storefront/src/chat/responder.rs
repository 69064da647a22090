//! Canned-reply lookup for the chat widget.
//!
//! A message is matched against an ordered keyword table in three passes:
//!
//! 1. the whole trimmed, lowercased message equals a keyword;
//! 2. a keyword occurs anywhere in the message;
//! 3. a synonym trigger occurs in the message, answering with the reply of
//!    the keyword it stands for.
//!
//! Within a pass the first keyword in table order wins. Anything else gets
//! the default reply.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a custom response table.
#[derive(Debug, Error)]
pub enum ResponseTableError {
    /// The table file could not be read.
    #[error("failed to read response table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The table file is not valid JSON of the expected shape.
    #[error("invalid response table: {0}")]
    Parse(#[from] serde_json::Error),

    /// A keyword is blank and would match every message.
    #[error("response table contains an empty keyword")]
    EmptyKeyword,
}

/// Extra trigger words answered with an existing keyword's reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Synonym {
    /// Substrings that activate this synonym.
    pub triggers: Vec<String>,
    /// Keyword whose reply is returned.
    pub keyword: String,
}

impl Synonym {
    fn new(triggers: &[&str], keyword: &str) -> Self {
        Self {
            triggers: triggers.iter().map(|t| (*t).to_owned()).collect(),
            keyword: keyword.to_owned(),
        }
    }
}

/// The synonym list of the stock table, in match order.
fn standard_synonyms() -> Vec<Synonym> {
    vec![
        Synonym::new(&["ship", "deliver"], "shipping"),
        Synonym::new(&["cost", "how much"], "price"),
        Synonym::new(&["return", "refund"], "return"),
        Synonym::new(&["recommend", "suggest"], "recommend"),
        Synonym::new(&["phone", "email", "call"], "contact"),
    ]
}

const DEFAULT_REPLY: &str =
    "I'm here to help with supplement information, recommendations, shipping, and more. Could you please rephrase your question?";

const STANDARD_RESPONSES: &[(&str, &str)] = &[
    (
        "hello",
        "Hello! I'm VitaBot, your AI health supplement assistant. How can I help you today?",
    ),
    ("hi", "Hi there! What can I help you with?"),
    (
        "hey",
        "Hey! I'm here to help you with your supplement needs.",
    ),
    (
        "product",
        "We have a wide range of supplements including Sea Moss, Moringa, Multi-Vitamins, and more. Which category interests you?",
    ),
    (
        "products",
        "We offer immune support, bone health, superfoods, stress relief, detox, joint support, and daily health supplements.",
    ),
    (
        "price",
        "Our prices range from R159.99 to R379.99. Is there a specific product you'd like pricing for?",
    ),
    (
        "shipping",
        "We ship throughout South Africa, Namibia, and Botswana. Shipping takes 3-5 business days. Express shipping is available.",
    ),
    (
        "delivery",
        "Standard delivery: 3-5 days. Express delivery: 1-2 days (additional fee applies).",
    ),
    (
        "return",
        "We offer a 30-day return policy on all unopened products. Please contact support for returns.",
    ),
    (
        "refund",
        "Refunds are processed within 5-7 business days after we receive the returned items.",
    ),
    (
        "compliance",
        "All products are SAHPRA (SA), MOHSS (Namibia), and BMRA (Botswana) compliant.",
    ),
    (
        "sea moss",
        "Organic Sea Moss is rich in 92 minerals, supports immune system, thyroid function, and digestive health. Price: R249.99",
    ),
    (
        "calcium",
        "Calcium Magnesium supports bone health, muscle function, and nerve transmission. Price: R189.99",
    ),
    (
        "moringa",
        "Moringa Powder is a nutrient-dense superfood with antioxidants. Great for energy and wellness. Price: R179.99",
    ),
    (
        "rhodiola",
        "Rhodiola Extract is an adaptogen that helps manage stress and improve mental performance. Price: R299.99",
    ),
    (
        "charcoal",
        "Activated Charcoal helps detoxify the body and support digestive health. Price: R159.99",
    ),
    (
        "glucosamine",
        "We have Glucosamine HCL (R349.99) and MSM (R379.99) for joint health and mobility.",
    ),
    (
        "vitamin",
        "Our Multi-Vitamin Complex provides essential vitamins and minerals for daily wellness. Price: R279.99",
    ),
    (
        "recommend",
        "I can recommend supplements based on your health goals. Are you looking for energy, immune support, joint health, or something else?",
    ),
    (
        "energy",
        "For energy, I recommend: Moringa Powder, Rhodiola Extract, and our Multi-Vitamin Complex.",
    ),
    (
        "immune",
        "For immune support: Organic Sea Moss, Multi-Vitamin Complex, and Vitamin C would be great.",
    ),
    (
        "joint",
        "For joint health: Glucosamine HCL or MSM, Calcium Magnesium, and Omega-3 supplements.",
    ),
    (
        "stress",
        "For stress relief: Rhodiola Extract, Ashwagandha, and Magnesium supplements work well.",
    ),
    (
        "detox",
        "For detox: Activated Charcoal, Milk Thistle, and our Liver Support formula are excellent.",
    ),
    (
        "bone",
        "For bone health: Calcium Magnesium, Vitamin D3, and our Bone Strength formula.",
    ),
    (
        "contact",
        "You can contact us at info@vitabot.ai or call +27 11 123 4567. We're here Mon-Fri, 9:00-17:00.",
    ),
    (
        "help",
        "I can help with product information, recommendations, shipping, returns, and general questions. What do you need?",
    ),
    (
        "thanks",
        "You're welcome! Is there anything else I can help you with?",
    ),
    (
        "thank you",
        "My pleasure! Let me know if you need anything else.",
    ),
    (
        "bye",
        "Goodbye! Feel free to chat again if you have more questions.",
    ),
];

/// Ordered keyword → reply mapping plus synonyms and a default reply.
///
/// Keywords are stored lowercased. Iteration order is insertion order and
/// decides which keyword wins when several match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    entries: Vec<(String, String)>,
    synonyms: Vec<Synonym>,
    default_reply: String,
}

impl ResponseTable {
    /// An empty table answering everything with `default_reply`.
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            synonyms: Vec::new(),
            default_reply: default_reply.into(),
        }
    }

    /// The stock VitaBot table.
    #[must_use]
    pub fn vitabot() -> Self {
        let table = STANDARD_RESPONSES
            .iter()
            .fold(Self::new(DEFAULT_REPLY), |table, (keyword, reply)| {
                table.with_entry(keyword, reply)
            });
        standard_synonyms()
            .into_iter()
            .fold(table, |table, synonym| table.with_synonym(synonym))
    }

    /// Append a keyword.
    ///
    /// Re-adding a keyword replaces its reply but keeps its position. Blank
    /// keywords are ignored.
    #[must_use]
    pub fn with_entry(mut self, keyword: &str, reply: &str) -> Self {
        let keyword = normalize(keyword);
        if keyword.is_empty() {
            return self;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == keyword) {
            Some((_, existing)) => reply.clone_into(existing),
            None => self.entries.push((keyword, reply.to_owned())),
        }
        self
    }

    /// Append a synonym, tried after all keywords.
    #[must_use]
    pub fn with_synonym(mut self, synonym: Synonym) -> Self {
        self.synonyms.push(Synonym {
            triggers: synonym
                .triggers
                .iter()
                .map(|t| normalize(t))
                .filter(|t| !t.is_empty())
                .collect(),
            keyword: normalize(&synonym.keyword),
        });
        self
    }

    /// Parse a table from JSON.
    ///
    /// ```json
    /// {
    ///   "default": "Sorry, could you rephrase that?",
    ///   "responses": [{"keyword": "hello", "reply": "Hi!"}],
    ///   "synonyms": [{"triggers": ["hey"], "keyword": "hello"}]
    /// }
    /// ```
    ///
    /// `synonyms` may be omitted, in which case the stock synonyms are used.
    ///
    /// # Errors
    ///
    /// Returns `ResponseTableError::Parse` for malformed JSON and
    /// `ResponseTableError::EmptyKeyword` if any keyword is blank.
    pub fn from_json(json: &str) -> Result<Self, ResponseTableError> {
        let file: TableFile = serde_json::from_str(json)?;
        if file.responses.iter().any(|r| r.keyword.trim().is_empty()) {
            return Err(ResponseTableError::EmptyKeyword);
        }

        let table = file
            .responses
            .iter()
            .fold(Self::new(file.default), |table, r| {
                table.with_entry(&r.keyword, &r.reply)
            });
        Ok(file
            .synonyms
            .into_iter()
            .fold(table, |table, synonym| table.with_synonym(synonym)))
    }

    /// Read and parse a table file.
    ///
    /// # Errors
    ///
    /// Returns `ResponseTableError::Io` if the file cannot be read, otherwise
    /// as [`ResponseTable::from_json`].
    pub fn load(path: &Path) -> Result<Self, ResponseTableError> {
        let json = std::fs::read_to_string(path).map_err(|source| ResponseTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reply registered for `keyword`.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&str> {
        let keyword = normalize(keyword);
        self.entries
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, reply)| reply.as_str())
    }

    /// Keywords in match order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reply used when nothing matches.
    #[must_use]
    pub fn default_reply(&self) -> &str {
        &self.default_reply
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self::vitabot()
    }
}

#[derive(Deserialize)]
struct TableFile {
    default: String,
    responses: Vec<TableEntry>,
    #[serde(default = "standard_synonyms")]
    synonyms: Vec<Synonym>,
}

#[derive(Deserialize)]
struct TableEntry {
    keyword: String,
    reply: String,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Which pass produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Synonym,
    Default,
}

/// Answers chat messages from a [`ResponseTable`].
#[derive(Debug, Clone, Default)]
pub struct Responder {
    table: ResponseTable,
}

impl Responder {
    /// Create a responder over `table`.
    #[must_use]
    pub const fn new(table: ResponseTable) -> Self {
        Self { table }
    }

    /// The table replies are drawn from.
    #[must_use]
    pub const fn table(&self) -> &ResponseTable {
        &self.table
    }

    /// Reply to `message`. Never fails; unmatched input gets the default reply.
    #[must_use]
    pub fn respond(&self, message: &str) -> &str {
        self.lookup(message).1
    }

    /// Reply to `message` along with the pass that matched.
    #[must_use]
    pub fn lookup(&self, message: &str) -> (MatchKind, &str) {
        let message = normalize(message);
        let entries = &self.table.entries;

        let found = entries
            .iter()
            .find(|(keyword, _)| *keyword == message)
            .map(|(keyword, reply)| (MatchKind::Exact, keyword.as_str(), reply.as_str()))
            .or_else(|| {
                entries
                    .iter()
                    .find(|(keyword, _)| message.contains(keyword.as_str()))
                    .map(|(keyword, reply)| {
                        (MatchKind::Substring, keyword.as_str(), reply.as_str())
                    })
            })
            .or_else(|| {
                self.table
                    .synonyms
                    .iter()
                    .filter(|s| s.triggers.iter().any(|t| message.contains(t.as_str())))
                    .find_map(|s| {
                        self.table
                            .get(&s.keyword)
                            .map(|reply| (MatchKind::Synonym, s.keyword.as_str(), reply))
                    })
            });

        match found {
            Some((kind, keyword, reply)) => {
                debug!(?kind, keyword, "Matched chat message");
                (kind, reply)
            }
            None => {
                debug!("No keyword matched chat message");
                (MatchKind::Default, self.table.default_reply())
            }
        }
    }
}
