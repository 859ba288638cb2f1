//! Natural Language Processing components
//!
//! This module provides text cleaning, spell checking (with hunspell affix
//! expansion) and part-of-speech tagging.

pub mod affix;
pub mod cleaner;
pub mod spelling;
pub mod tagger;
