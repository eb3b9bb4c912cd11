//! Spoken sequence model and text flattening
//!
//! One utterance arrives from the host as an ordered mix of text fragments
//! and non-text control markers. The element kind is decided once, when the
//! host-facing adapter builds the sequence; the rest of the crate only
//! pattern-matches on the tagged variant.

/// Separator between text fragments in flattened output.
///
/// Matches the host speech viewer's item separator, so copied text reads the
/// same as the viewer displays it.
pub const FRAGMENT_SEPARATOR: &str = "  ";

/// Non-text directives that can appear inside a spoken sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMarker {
    /// Command the host cancels if focus moves away before it runs
    CancellableCommand,
    /// Pause between fragments, in milliseconds
    Break(u32),
    /// Any other host directive, kept opaque
    Other(String),
}

/// One element of a spoken sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechElement {
    Text(String),
    Marker(ControlMarker),
}

/// One utterance's ordered content
///
/// Markers are kept in storage and stripped only at flatten time, so review
/// playback can hand the host the original utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechSequence {
    elements: Vec<SpeechElement>,
}

impl SpeechSequence {
    pub fn new(elements: Vec<SpeechElement>) -> Self {
        Self { elements }
    }

    /// Convenience constructor for a text-only utterance
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            elements: vec![SpeechElement::Text(text.into())],
        }
    }

    pub fn elements(&self) -> &[SpeechElement] {
        &self.elements
    }

    /// Ordered text fragments, markers skipped
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            SpeechElement::Text(text) => Some(text.as_str()),
            SpeechElement::Marker(_) => None,
        })
    }

    /// Join all text fragments with [`FRAGMENT_SEPARATOR`]
    ///
    /// Returns an empty string when the sequence carries no text.
    pub fn flatten(&self) -> String {
        self.fragments().collect::<Vec<_>>().join(FRAGMENT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_joins_fragments() {
        let seq = SpeechSequence::new(vec![
            SpeechElement::Text("a".to_string()),
            SpeechElement::Text("b".to_string()),
        ]);
        assert_eq!(seq.flatten(), "a  b");
    }

    #[test]
    fn test_flatten_skips_markers() {
        let seq = SpeechSequence::new(vec![
            SpeechElement::Text("Save".to_string()),
            SpeechElement::Marker(ControlMarker::Break(50)),
            SpeechElement::Text("button".to_string()),
            SpeechElement::Marker(ControlMarker::CancellableCommand),
        ]);
        assert_eq!(seq.flatten(), "Save  button");
    }

    #[test]
    fn test_flatten_marker_only_sequence_is_empty() {
        let seq = SpeechSequence::new(vec![
            SpeechElement::Marker(ControlMarker::CancellableCommand),
            SpeechElement::Marker(ControlMarker::Other("beep".to_string())),
        ]);
        assert_eq!(seq.flatten(), "");
    }

    #[test]
    fn test_from_text() {
        let seq = SpeechSequence::from_text("hello");
        assert_eq!(seq.flatten(), "hello");
        assert_eq!(seq.elements().len(), 1);
    }

    #[test]
    fn test_fragments_preserve_order() {
        let seq = SpeechSequence::new(vec![
            SpeechElement::Text("one".to_string()),
            SpeechElement::Marker(ControlMarker::Break(10)),
            SpeechElement::Text("two".to_string()),
            SpeechElement::Text("three".to_string()),
        ]);
        let fragments: Vec<&str> = seq.fragments().collect();
        assert_eq!(fragments, vec!["one", "two", "three"]);
    }
}
