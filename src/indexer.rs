pub mod translation_index;

pub use translation_index::{
    DEFAULT_TRANSLATION_FUNCTION,
    TranslationIndex,
};
