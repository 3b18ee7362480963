// # Event Headers
//
// The host hands notification headers over as a singly linked list of
// name/value pairs. They are folded into a key-unique map at the boundary,
// before any routing logic looks at them. The first occurrence of a
// duplicated name wins; later duplicates are dropped silently.

use std::collections::HashMap;

/// One node of the host's linked header list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHeader {
    /// Header name
    pub name: String,
    /// Header value
    pub value: String,
    /// Next header, `None` at the end of the list
    pub next: Option<Box<EventHeader>>,
}

impl EventHeader {
    /// Create a single header node
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            next: None,
        }
    }

    /// Build a linked list from pairs, preserving order
    pub fn chain<I, K, V>(pairs: I) -> Option<Box<EventHeader>>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: DoubleEndedIterator,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().rev().fold(None, |next, (name, value)| {
            Some(Box::new(EventHeader {
                name: name.into(),
                value: value.into(),
                next,
            }))
        })
    }

    /// Iterate the list starting at this node
    pub fn iter(&self) -> impl Iterator<Item = &EventHeader> {
        std::iter::successors(Some(self), |header| header.next.as_deref())
    }
}

/// Key-unique header map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    values: HashMap<String, String>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a linked header list into a map (first occurrence wins)
    pub fn from_linked(head: Option<&EventHeader>) -> Self {
        let mut headers = Self::new();
        if let Some(head) = head {
            for header in head.iter() {
                headers.insert_first(&header.name, &header.value);
            }
        }
        headers
    }

    /// Fold name/value pairs into a map (first occurrence wins)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.insert_first(name.as_ref(), value.as_ref());
        }
        headers
    }

    fn insert_first(&mut self, name: &str, value: &str) {
        if !self.values.contains_key(name) {
            self.values.insert(name.to_string(), value.to_string());
        }
    }

    /// Value of a header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether a header is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of distinct headers
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no headers
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
