//! Text processing primitives: sentence segmentation, word tokenization and
//! part-of-speech tagging.

pub mod segmenter;
pub mod tagger;
pub mod tokenize;

pub use segmenter::{
    fallback_segmentation, SegmentError, SentenceBoundaryProvider, SentenceSegmenter,
    UnicodeSentenceBoundaries,
};
pub use tagger::{LexiconTagger, PartOfSpeech, PosTagger, TagError, TaggedToken};
pub use tokenize::{unique_tokens, word_tokens};
