//! top-level definition boundaries
//!
//! `graphql-parser` reads executable and type system documents with separate
//! parsers, so a source mixing both is rejected by each. [`split_definitions`]
//! cuts the text into one slice per top-level definition so that each slice
//! can be parsed on its own.

const DEFINITION_KEYWORDS: [&str; 13] = [
    "query",
    "mutation",
    "subscription",
    "fragment",
    "schema",
    "scalar",
    "type",
    "interface",
    "union",
    "enum",
    "input",
    "directive",
    "extend",
];

const TYPE_SYSTEM_KINDS: [&str; 8] = [
    "schema",
    "scalar",
    "type",
    "interface",
    "union",
    "enum",
    "input",
    "directive",
];

/// type system kinds whose definition does not end with a `{ ... }` body
const BODYLESS_KINDS: [&str; 3] = ["scalar", "union", "directive"];

/// state of the definition being scanned
#[derive(Default)]
struct Splitter<'t> {
    text: &'t str,
    chunks: Vec<&'t str>,
    start: Option<usize>,
    /// depth-0 words of the current definition, `@` standing in for a directive
    header: Vec<&'t str>,
    /// last depth-0 token closed a `{ ... }` body
    closed: bool,
}

impl<'t> Splitter<'t> {
    /// position of the kind keyword, after an optional `extend`
    fn kind_index(&self) -> Option<usize> {
        match self.header.first() {
            Some(&"extend") => (self.header.len() > 1).then_some(1),
            Some(_) => Some(0),
            None => None,
        }
    }

    fn kind(&self) -> Option<&'t str> {
        self.kind_index().map(|idx| self.header[idx])
    }

    /// past the kind keyword and the name slot that follows it
    fn past_name(&self) -> bool {
        self.kind_index()
            .is_some_and(|idx| self.header.len() > idx + 1)
    }

    fn is_type_system(&self) -> bool {
        self.kind().is_some_and(|kind| TYPE_SYSTEM_KINDS.contains(&kind))
    }

    fn is_bodyless(&self) -> bool {
        self.kind().is_some_and(|kind| BODYLESS_KINDS.contains(&kind))
    }

    fn begin(&mut self, at: usize) {
        if self.start.is_none() {
            self.start = Some(at);
        }
    }

    fn split(&mut self, at: usize) {
        self.flush(at);
        self.header.clear();
        self.closed = false;
        self.start = Some(at);
    }

    fn flush(&mut self, end: usize) {
        if let Some(start) = self.start.take() {
            let chunk = self.text[start..end].trim();
            if !chunk.is_empty() {
                self.chunks.push(chunk);
            }
        }
    }

    fn word(&mut self, at: usize, word: &'t str) {
        let boundary = DEFINITION_KEYWORDS.contains(&word)
            && self.start.is_some()
            && (self.closed || (self.is_type_system() && self.past_name()));
        if boundary {
            self.split(at);
        }
        self.begin(at);
        self.header.push(word);
        self.closed = false;
    }

    /// `{` at depth 0: a shorthand query or the body of the current definition
    fn open_body(&mut self, at: usize) {
        let boundary =
            self.start.is_some() && (self.closed || (self.is_bodyless() && self.past_name()));
        if boundary {
            self.split(at);
        }
        self.begin(at);
        self.closed = false;
    }

    /// a string at depth 0 is always the description of the next definition
    fn description(&mut self, at: usize) {
        if self.start.is_some() && (self.closed || !self.header.is_empty()) {
            self.split(at);
        }
        self.begin(at);
        self.closed = false;
    }

    fn directive(&mut self, at: usize) {
        self.begin(at);
        self.header.push("@");
        self.closed = false;
    }

    fn punctuation(&mut self, at: usize) {
        self.begin(at);
        self.closed = false;
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric()
}

fn scan_name(bytes: &[u8], mut at: usize) -> usize {
    while at < bytes.len() && is_name_byte(bytes[at]) {
        at += 1;
    }
    at
}

/// end of the string literal opening at `start`, block strings included
fn skip_string(bytes: &[u8], start: usize) -> usize {
    if bytes[start..].starts_with(b"\"\"\"") {
        let mut at = start + 3;
        while at < bytes.len() {
            if bytes[at] == b'\\' && bytes[at + 1..].starts_with(b"\"\"\"") {
                at += 4;
            } else if bytes[at..].starts_with(b"\"\"\"") {
                return at + 3;
            } else {
                at += 1;
            }
        }
        return bytes.len();
    }

    let mut at = start + 1;
    while at < bytes.len() {
        match bytes[at] {
            b'\\' => at += 2,
            b'"' => return at + 1,
            b'\n' => return at,
            _ => at += 1,
        }
    }
    bytes.len()
}

/// cut a document into its top-level definitions, in source order
///
/// comments and strings are skipped, nesting is tracked over `{}`, `()` and
/// `[]`. descriptions stay attached to the definition they precede.
pub(crate) fn split_definitions(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut splitter = Splitter {
        text,
        ..Splitter::default()
    };
    let mut depth = 0usize;
    let mut at = 0;

    while at < bytes.len() {
        let byte = bytes[at];
        match byte {
            b'#' => {
                while at < bytes.len() && bytes[at] != b'\n' {
                    at += 1;
                }
            }
            b'"' => {
                if depth == 0 {
                    splitter.description(at);
                }
                at = skip_string(bytes, at);
            }
            b'{' | b'(' | b'[' => {
                if depth == 0 {
                    if byte == b'{' {
                        splitter.open_body(at);
                    } else {
                        splitter.punctuation(at);
                    }
                }
                depth += 1;
                at += 1;
            }
            b'}' | b')' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && byte == b'}' {
                    splitter.closed = true;
                }
                at += 1;
            }
            b'@' | b'$' => {
                if depth == 0 {
                    if byte == b'@' {
                        splitter.directive(at);
                    } else {
                        splitter.punctuation(at);
                    }
                }
                at = scan_name(bytes, at + 1);
            }
            _ if byte == b'_' || byte.is_ascii_alphabetic() => {
                let end = scan_name(bytes, at);
                if depth == 0 {
                    splitter.word(at, &text[at..end]);
                }
                at = end;
            }
            _ if byte == b',' || byte.is_ascii_whitespace() => at += 1,
            _ => {
                if depth == 0 {
                    splitter.punctuation(at);
                }
                at += 1;
            }
        }
    }

    splitter.flush(text.len());
    splitter.chunks
}
