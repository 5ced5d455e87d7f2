//! Segregates NMEA text sentences from the non-binary parts of the stream.

use bytes::{Buf, Bytes, BytesMut};
use tracing::debug;

/// Longest partial line carried between chunks.
pub const MAX_LINE_LENGTH: usize = 256;

/// A `$`-prefixed, `*`-terminated text sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    line: String,
    checksum_ok: bool,
}

impl Sentence {
    /// Parse one line (without CRLF). Returns `None` if it is not shaped like
    /// a sentence.
    pub fn parse(line: &str) -> Option<Self> {
        if !line.is_ascii() || !line.starts_with('$') {
            return None;
        }
        let comma = line.find(',')?;
        let address = &line[1..comma];
        if address.is_empty() || !address.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        if line.len() < 3 || line.as_bytes()[line.len() - 3] != b'*' {
            return None;
        }

        let star = line.len() - 3;
        let computed = line.as_bytes()[1..star].iter().fold(0u8, |acc, b| acc ^ b);
        let digits = &line[star + 1..];
        let checksum_ok = digits.bytes().all(|b| b.is_ascii_hexdigit())
            && u8::from_str_radix(digits, 16).is_ok_and(|found| found == computed);

        Some(Self {
            line: line.to_string(),
            checksum_ok,
        })
    }

    /// Full sentence text, without the line terminator.
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Talker + sentence type, e.g. `GNGGA`.
    pub fn address(&self) -> &str {
        let comma = self.line.find(',').unwrap_or(1);
        &self.line[1..comma]
    }

    /// Comma separated data fields after the address.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        let body = &self.line[1..self.line.len() - 3];
        body.split(',').skip(1)
    }

    /// Whether the trailing hex digits match the XOR of the sentence body.
    pub fn checksum_ok(&self) -> bool {
        self.checksum_ok
    }
}

/// One classified piece of non-binary data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextItem {
    Sentence(Sentence),
    /// Anything that is neither a binary frame nor a sentence.
    Unrecognized(Bytes),
}

/// Accumulates non-protocol bytes and splits them into CRLF terminated lines.
#[derive(Debug, Default)]
pub struct NmeaExtractor {
    partial: BytesMut,
}

impl NmeaExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a run of non-protocol bytes and classify every complete line.
    pub fn extract(&mut self, bytes: &[u8]) -> Vec<TextItem> {
        self.partial.extend_from_slice(bytes);
        let mut items = Vec::new();

        while let Some(end) = find_crlf(&self.partial) {
            let line = self.partial.split_to(end).freeze();
            self.partial.advance(2);
            classify(line, &mut items);
        }

        if self.partial.len() > MAX_LINE_LENGTH {
            let overflow = self.partial.split().freeze();
            debug!(bytes = overflow.len(), "discarding unterminated text");
            items.push(TextItem::Unrecognized(overflow));
        }
        items
    }

    /// Bytes waiting for a line terminator.
    pub fn pending(&self) -> usize {
        self.partial.len()
    }

    /// Classify whatever is left without waiting for a terminator.
    pub fn flush(&mut self) -> Vec<TextItem> {
        let mut items = Vec::new();
        if !self.partial.is_empty() {
            let rest = self.partial.split().freeze();
            classify(rest, &mut items);
        }
        items
    }
}

fn classify(mut line: Bytes, items: &mut Vec<TextItem>) {
    if line.is_empty() {
        return;
    }
    if let Some(start) = line.iter().position(|&b| b == b'$') {
        if start > 0 {
            let garbage = line.split_to(start);
            debug!(bytes = garbage.len(), "unrecognized data before sentence");
            items.push(TextItem::Unrecognized(garbage));
        }
    }

    match std::str::from_utf8(&line).ok().and_then(Sentence::parse) {
        Some(sentence) => items.push(TextItem::Sentence(sentence)),
        None => {
            debug!(bytes = line.len(), "unrecognized text line");
            items.push(TextItem::Unrecognized(line));
        }
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|pair| pair == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76";

    fn sentences(items: &[TextItem]) -> Vec<&Sentence> {
        items
            .iter()
            .filter_map(|item| match item {
                TextItem::Sentence(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn parses_valid_sentence() {
        let sentence = Sentence::parse(GGA).unwrap();
        assert!(sentence.checksum_ok());
        assert_eq!(sentence.address(), "GPGGA");
        assert_eq!(sentence.fields().next(), Some("092750.000"));
        assert_eq!(sentence.fields().count(), 14);
    }

    #[test]
    fn bad_checksum_is_flagged() {
        let corrupted = GGA.replace("*76", "*77");
        let sentence = Sentence::parse(&corrupted).unwrap();
        assert!(!sentence.checksum_ok());
    }

    #[test]
    fn checksum_needs_two_hex_digits() {
        assert!(Sentence::parse("$GPTXT,f*05").unwrap().checksum_ok());
        assert!(!Sentence::parse("$GPTXT,f*+5").unwrap().checksum_ok());
        assert!(!Sentence::parse("$GPTXT,f*5 ").unwrap().checksum_ok());
    }

    #[test]
    fn rejects_non_sentences() {
        assert!(Sentence::parse("GPGGA,1*00").is_none());
        assert!(Sentence::parse("$GP1GA,1*00").is_none());
        assert!(Sentence::parse("$GPGGA,1").is_none());
        assert!(Sentence::parse("$GPGGA").is_none());
    }

    #[test]
    fn splits_lines_across_chunks() {
        let mut extractor = NmeaExtractor::new();
        let text = format!("{GGA}\r\n{GGA}\r\n");
        let (a, b) = text.as_bytes().split_at(40);

        let first = extractor.extract(a);
        assert!(first.is_empty());
        let second = extractor.extract(b);
        assert_eq!(sentences(&second).len(), 2);
        assert_eq!(extractor.pending(), 0);
    }

    #[test]
    fn terminator_split_between_chunks() {
        let mut extractor = NmeaExtractor::new();
        let mut chunk = GGA.as_bytes().to_vec();
        chunk.push(b'\r');
        assert!(extractor.extract(&chunk).is_empty());
        let items = extractor.extract(b"\n");
        assert_eq!(sentences(&items).len(), 1);
    }

    #[test]
    fn strips_garbage_before_dollar() {
        let mut extractor = NmeaExtractor::new();
        let items = extractor.extract(format!("\x01\x02{GGA}\r\n").as_bytes());
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            TextItem::Unrecognized(Bytes::from_static(b"\x01\x02"))
        );
        assert!(matches!(&items[1], TextItem::Sentence(s) if s.as_str() == GGA));
    }

    #[test]
    fn truncated_sentence_is_unrecognized() {
        let mut extractor = NmeaExtractor::new();
        let items = extractor.extract(b"$GPGSV,3,1,11,\r\n");
        assert!(matches!(items[0], TextItem::Unrecognized(_)));
    }

    #[test]
    fn unterminated_text_is_bounded() {
        let mut extractor = NmeaExtractor::new();
        let items = extractor.extract(&[b'x'; MAX_LINE_LENGTH + 1]);
        assert_eq!(items.len(), 1);
        assert_eq!(extractor.pending(), 0);
    }

    #[test]
    fn flush_classifies_remainder() {
        let mut extractor = NmeaExtractor::new();
        assert!(extractor.extract(GGA.as_bytes()).is_empty());
        let items = extractor.flush();
        assert_eq!(sentences(&items).len(), 1);
    }
}
