//! Explicit registry of format-specific converters.
//!
//! No ambient global state: a registry is a plain value, populated at
//! process start (or fresh inside a test) and queried through a pure
//! best-match scoring function. Tags carry the container magic, version,
//! and an optional title id for per-game converter overrides.

use tracing::warn;

use crate::content::ContentResolver;
use crate::error::ConvertResult;
use crate::source::{FormatIdent, STUDIO_IDENT, SourceAsset};

use super::Conversion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterTag {
    pub ident: FormatIdent,
    pub version: u32,
    /// Title/game id for per-title converter variants; `None` registers a
    /// generic handler.
    pub title: Option<u32>,
}

pub type ConvertFn = fn(&SourceAsset, &dyn ContentResolver) -> ConvertResult<Conversion>;

#[derive(Debug, Default)]
pub struct ConverterRegistry {
    entries: Vec<(ConverterTag, ConvertFn)>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the studio-model converters this crate
    /// ships.
    pub fn with_default_converters() -> Self {
        let mut registry = Self::new();
        for version in [44, 45, 46, 47, 49] {
            registry.register(
                ConverterTag {
                    ident: STUDIO_IDENT,
                    version,
                    title: None,
                },
                super::convert_asset,
            );
        }
        registry
    }

    pub fn register(&mut self, tag: ConverterTag, converter: ConvertFn) {
        self.entries.push((tag, converter));
    }

    /// Best-match lookup: ident+version match scores 2, a matching title
    /// adds 1, so a title-specific converter beats the generic one.
    pub fn find(&self, ident: FormatIdent, version: u32, title: Option<u32>) -> Option<ConvertFn> {
        let mut best: Option<(u32, ConvertFn)> = None;
        for (tag, converter) in &self.entries {
            let mut score = 0;
            if tag.ident == ident && tag.version == version {
                score += 2;
                if title.is_some() && tag.title == title {
                    score += 1;
                }
            }
            if score > best.map_or(0, |(s, _)| s) {
                best = Some((score, *converter));
            }
        }
        if best.is_none() {
            warn!(
                ident = %String::from_utf8_lossy(&ident),
                version,
                "no converter registered for format"
            );
        }
        best.map(|(_, converter)| converter)
    }

    /// Convert an asset with the best-matching registered converter.
    /// `None` when no converter claims the asset's format tag.
    pub fn convert(
        &self,
        asset: &SourceAsset,
        resolver: &dyn ContentResolver,
        title: Option<u32>,
    ) -> Option<ConvertResult<Conversion>> {
        let converter = self.find(asset.ident, asset.version, title)?;
        Some(converter(asset, resolver))
    }
}
