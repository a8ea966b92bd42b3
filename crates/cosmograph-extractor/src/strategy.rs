//! Strategy selection and dispatch

use crate::document::{file_name, has_extension};
use crate::error::ExtractorError;
use crate::generic::GenericExtractor;
use crate::legal::LegalExtractor;
use crate::llm::LlmExtractor;
use crate::patterns::PatternConfig;
use crate::pdf::PdfExtractor;
use crate::text::TextExtractor;
use cosmograph_domain::{ExtractionStrategy, ExtractionSummary, Graph, LlmProvider};
use cosmograph_llm::{AnthropicProvider, LlmError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Strategy named by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Hierarchical legal documents
    Legal,
    /// Markdown and plain text
    Text,
    /// Configurable patterns
    Generic,
    /// PDF text layer, handed to the legal extractor
    Pdf,
    /// Language model
    Llm,
    /// Choose by file extension
    #[default]
    Auto,
}

impl StrategyKind {
    /// All kinds, in help order
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Auto,
        StrategyKind::Legal,
        StrategyKind::Text,
        StrategyKind::Generic,
        StrategyKind::Pdf,
        StrategyKind::Llm,
    ];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Legal => "legal",
            StrategyKind::Text => "text",
            StrategyKind::Generic => "generic",
            StrategyKind::Pdf => "pdf",
            StrategyKind::Llm => "llm",
            StrategyKind::Auto => "auto",
        }
    }

    /// Concrete kind for a file: `.pdf` goes to the PDF adapter, the rest
    /// to the legal extractor. Concrete kinds resolve to themselves.
    pub fn resolve(self, path: &Path) -> StrategyKind {
        match self {
            StrategyKind::Auto if has_extension(path, &["pdf"]) => StrategyKind::Pdf,
            StrategyKind::Auto => StrategyKind::Legal,
            kind => kind,
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ExtractorError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the concrete extractors
#[derive(Debug)]
pub enum Strategy<P = AnthropicProvider> {
    /// Legal extractor
    Legal(LegalExtractor),
    /// Text extractor
    Text(TextExtractor),
    /// Generic pattern extractor
    Generic(GenericExtractor),
    /// PDF adapter
    Pdf(PdfExtractor),
    /// Language-model pipeline
    Llm(LlmExtractor<P>),
}

impl<P> Strategy<P> {
    /// Build a pattern strategy
    ///
    /// `patterns` only matters for [`StrategyKind::Generic`]; without it the
    /// bundled defaults apply. The language-model strategy needs a provider
    /// and is built with [`Strategy::Llm`] directly.
    pub fn pattern(kind: StrategyKind, patterns: Option<&PatternConfig>) -> Result<Self, ExtractorError> {
        match kind {
            StrategyKind::Legal => Ok(Strategy::Legal(LegalExtractor::new())),
            StrategyKind::Text => Ok(Strategy::Text(TextExtractor::new())),
            StrategyKind::Pdf => Ok(Strategy::Pdf(PdfExtractor::new())),
            StrategyKind::Generic => {
                let extractor = match patterns {
                    Some(config) => GenericExtractor::new(config)?,
                    None => GenericExtractor::with_defaults()?,
                };
                Ok(Strategy::Generic(extractor))
            }
            StrategyKind::Llm => Err(ExtractorError::Config(
                "the llm strategy requires a language-model provider".to_string(),
            )),
            StrategyKind::Auto => Err(ExtractorError::Config(
                "auto must be resolved against a file before building".to_string(),
            )),
        }
    }

    /// Kind of the wrapped extractor
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Legal(_) => StrategyKind::Legal,
            Strategy::Text(_) => StrategyKind::Text,
            Strategy::Generic(_) => StrategyKind::Generic,
            Strategy::Pdf(_) => StrategyKind::Pdf,
            Strategy::Llm(_) => StrategyKind::Llm,
        }
    }
}

impl<P> ExtractionStrategy for Strategy<P>
where
    P: LlmProvider<Error = LlmError>,
{
    type Error = ExtractorError;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn supports(&self, path: &Path) -> bool {
        match self {
            Strategy::Legal(e) => e.supports(path),
            Strategy::Text(e) => e.supports(path),
            Strategy::Generic(e) => e.supports(path),
            Strategy::Pdf(e) => e.supports(path),
            Strategy::Llm(e) => e.supports(path),
        }
    }

    /// Rejects unsupported files before reading them
    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error> {
        if !self.supports(path) {
            return Err(ExtractorError::UnsupportedFile {
                strategy: self.name().to_string(),
                file: file_name(path),
            });
        }

        debug!("Running {} strategy on {}", self.name(), path.display());
        match self {
            Strategy::Legal(e) => e.extract(path, graph),
            Strategy::Text(e) => e.extract(path, graph),
            Strategy::Generic(e) => e.extract(path, graph),
            Strategy::Pdf(e) => e.extract(path, graph),
            Strategy::Llm(e) => e.extract(path, graph),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmograph_llm::MockProvider;

    #[test]
    fn test_parse_kinds() {
        assert_eq!("legal".parse::<StrategyKind>().unwrap(), StrategyKind::Legal);
        assert_eq!(" LLM ".parse::<StrategyKind>().unwrap(), StrategyKind::Llm);
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
        assert!(matches!(
            "ocr".parse::<StrategyKind>(),
            Err(ExtractorError::UnknownStrategy(name)) if name == "ocr"
        ));
    }

    #[test]
    fn test_auto_resolves_by_extension() {
        assert_eq!(StrategyKind::Auto.resolve(Path::new("code.pdf")), StrategyKind::Pdf);
        assert_eq!(StrategyKind::Auto.resolve(Path::new("code.txt")), StrategyKind::Legal);
        assert_eq!(StrategyKind::Auto.resolve(Path::new("notes.md")), StrategyKind::Legal);
        assert_eq!(StrategyKind::Text.resolve(Path::new("code.pdf")), StrategyKind::Text);
    }

    #[test]
    fn test_pattern_builder() {
        let strategy = Strategy::<MockProvider>::pattern(StrategyKind::Generic, None).unwrap();
        assert_eq!(strategy.kind(), StrategyKind::Generic);
        assert_eq!(strategy.name(), "generic");

        assert!(matches!(
            Strategy::<MockProvider>::pattern(StrategyKind::Llm, None),
            Err(ExtractorError::Config(_))
        ));
        assert!(matches!(
            Strategy::<MockProvider>::pattern(StrategyKind::Auto, None),
            Err(ExtractorError::Config(_))
        ));
    }

    #[test]
    fn test_unsupported_file_is_rejected_without_reading() {
        let strategy = Strategy::<MockProvider>::pattern(StrategyKind::Pdf, None).unwrap();
        let mut graph = Graph::default();

        let result = strategy.extract(Path::new("/nonexistent/notes.txt"), &mut graph);
        assert!(matches!(
            result,
            Err(ExtractorError::UnsupportedFile { ref strategy, ref file })
                if strategy == "pdf" && file == "notes.txt"
        ));
    }

    #[test]
    fn test_llm_variant_dispatches() {
        let provider = MockProvider::default();
        let strategy = Strategy::Llm(
            LlmExtractor::new(provider, crate::config::LlmExtractorConfig::default())
                .with_approval(crate::approval::AutoApprove)
                .with_sleep(|_| {}),
        );
        assert_eq!(strategy.name(), "llm");
        assert!(strategy.supports(Path::new("a.pdf")));
    }
}
